use std::io::Write;

use flamescope::domain::{DataError, FrameRef, SpyName};
use flamescope::flamebearer::Flamebearer;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture(name: &str) -> String {
    format!("{FIXTURES}/{name}")
}

#[test]
fn test_load_simple_profile_from_file() {
    let fb = Flamebearer::from_file(fixture("simple_profile.json")).expect("Failed to load fixture");

    assert_eq!(fb.depth(), 3);
    assert_eq!(fb.num_ticks(), 1000);
    assert_eq!(fb.max_self(), 400);
    assert_eq!(*fb.spy_name(), SpyName::PySpy);
    assert_eq!(fb.units(), "samples");
    assert_eq!(fb.frame_count(), 5);

    let http = fb.frame(FrameRef::new(2, 0)).expect("frame exists");
    assert_eq!(fb.name_of(http), "lib/net/http.py:42");
    assert_eq!((http.start, http.width, http.self_ticks), (0, 400, 400));
    assert!(fb.tick_conservation_violations().is_empty());
}

#[test]
fn test_empty_profile_is_accepted() {
    let fb = Flamebearer::from_file(fixture("empty_profile.json")).expect("Failed to load fixture");
    assert!(fb.is_empty());
    assert_eq!(fb.depth(), 0);
}

#[test]
fn test_truncated_level_is_a_data_error() {
    let err = Flamebearer::from_file(fixture("malformed_level.json")).unwrap_err();
    assert!(matches!(err, DataError::TruncatedLevel { level: 0, len: 3 }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Flamebearer::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DataError::Io(_)));
}

#[test]
fn test_load_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"names":["total","run"],"levels":[[0,50,0,0],[0,50,50,1]],"numTicks":50,"sampleRate":10,"spyName":"rbspy"}}"#
    )
    .unwrap();

    let fb = Flamebearer::from_file(file.path()).unwrap();
    assert_eq!(*fb.spy_name(), SpyName::RbSpy);
    // maxSelf omitted on the wire: derived from the frames
    assert_eq!(fb.max_self(), 50);
}

#[test]
fn test_name_index_out_of_bounds_rejected() {
    let err = Flamebearer::from_json_str(
        r#"{"names":["total"],"levels":[[0,10,0,0],[0,10,10,5]],"numTicks":10,"sampleRate":100}"#,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::NameIndexOutOfBounds { level: 1, offset: 0, index: 5, .. }));
}

#[test]
fn test_unknown_spy_name_is_kept() {
    let fb = Flamebearer::from_json_str(
        r#"{"names":["total"],"levels":[[0,1,1,0]],"numTicks":1,"sampleRate":100,"spyName":"dotnetspy"}"#,
    )
    .unwrap();
    assert_eq!(*fb.spy_name(), SpyName::Other("dotnetspy".to_string()));
}

#[test]
fn test_garbage_is_parse_error() {
    let err = Flamebearer::from_json_str("not json").unwrap_err();
    assert!(matches!(err, DataError::ParseFailed(_)));
}

#[test]
fn test_frames_must_fit_inside_num_ticks() {
    let err = Flamebearer::from_json_str(
        r#"{"names":["total","leak"],"levels":[[0,10,0,0],[5,50,50,1]],"numTicks":10,"sampleRate":100}"#,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::FrameOutOfRange { level: 1, offset: 0, end: 55, num_ticks: 10 }));
}

#[test]
fn test_overflowing_frame_is_rejected_not_panicking() {
    let err = Flamebearer::from_json_str(
        r#"{"names":["total"],"levels":[[0,10,0,0],[18446744073709551610,100,0,0]],"numTicks":10,"sampleRate":100}"#,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::TickOverflow { level: 1, offset: 0 }));
}
