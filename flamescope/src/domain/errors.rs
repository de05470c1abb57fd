//! Structured error types for flamescope
//!
//! Using thiserror for automatic Display implementation and error chaining.

use thiserror::Error;

/// Malformed profile data, detected when a flamebearer is ingested.
///
/// Rendering never runs on data that produced one of these.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to parse flamebearer: {0}")]
    ParseFailed(#[from] serde_json::Error),

    #[error("Profile has no levels but reports {num_ticks} ticks")]
    MissingLevels { num_ticks: u64 },

    #[error("Level {level} has {len} values, expected a multiple of 4")]
    TruncatedLevel { level: usize, len: usize },

    #[error("Level {level}, frame {offset}: name index {index} out of bounds ({names} names)")]
    NameIndexOutOfBounds { level: usize, offset: usize, index: u64, names: usize },

    #[error("Level {level}, frame {offset}: start tick {start} is before previous start {previous}")]
    NonAscendingOffsets { level: usize, offset: usize, start: u64, previous: u64 },

    #[error("Level {level}, frame {offset}: overlaps previous frame ending at tick {previous_end}")]
    OverlappingFrames { level: usize, offset: usize, previous_end: u64 },

    #[error("Level {level}, frame {offset}: start + width overflows the tick counter")]
    TickOverflow { level: usize, offset: usize },

    #[error("Level {level}, frame {offset}: ends at tick {end}, past numTicks {num_ticks}")]
    FrameOutOfRange { level: usize, offset: usize, end: u64, num_ticks: u64 },

    #[error("Profile has frames but numTicks is 0")]
    ZeroTicks,

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No profile loaded")]
    NoProfile,

    #[error("View is not mounted, no surface width to render at")]
    NotMounted,

    #[error("Failed to write display list: {0}")]
    WriteFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Terminal error: {0}")]
    TerminalError(String),
}
