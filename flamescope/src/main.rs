//! # flamescope - Main Entry Point
//!
//! Supports two operational modes:
//! - **TUI** (`flamescope profile.json`): interactive flame graph in the terminal
//! - **Headless** (`--headless --export out.json`): render once, write the display list

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use flamescope::cli::Args;
use flamescope::domain::DataError;
use flamescope::flamebearer::Flamebearer;
use flamescope::tui;
use flamescope::view::FlameGraphView;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_DATAERR: i32 = 65;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.downcast_ref::<DataError>().is_some()) {
        EXIT_DATAERR
    } else if err.to_string().to_lowercase().contains("must be positive") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    if args.width <= 0.0 || args.pixel_ratio <= 0.0 || args.cell_width <= 0.0 {
        anyhow::bail!("--width, --pixel-ratio and --cell-width must be positive");
    }

    let flamebearer = Flamebearer::from_file(&args.profile)
        .with_context(|| format!("Failed to load profile {}", args.profile.display()))?;

    let mut view = FlameGraphView::new(args.render_config());
    view.set_flamebearer(flamebearer);
    if let Some(query) = &args.query {
        view.search(query.as_str());
    }

    if args.headless {
        view.mount(args.width);
        return export_view(&view, &args);
    }

    let title = args
        .profile
        .file_name()
        .map_or_else(|| args.profile.display().to_string(), |n| n.to_string_lossy().into_owned());
    let app = tui::App::new(view, title, args.cell_width);
    let view = app.run()?;

    if args.export.is_some() {
        export_view(&view, &args)?;
    }
    Ok(())
}

fn export_view(view: &FlameGraphView, args: &Args) -> Result<()> {
    let Some(path) = &args.export else {
        return Ok(());
    };
    if view.shows_no_data() {
        info!("Profile has no samples; exporting an empty display list");
    }
    let exporter = view.export(args.pixel_ratio)?;
    exporter.save(path).with_context(|| format!("Failed to export to {}", path.display()))?;

    if !args.quiet {
        let stats = exporter.stats();
        println!(
            "Exported {} bars ({} collapsed runs, {} labels) to {}",
            stats.bars,
            stats.collapsed_runs,
            stats.labels,
            path.display()
        );
    }
    Ok(())
}
