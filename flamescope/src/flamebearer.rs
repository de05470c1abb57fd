//! Flamebearer model - the tick-encoded profile that drives one render.
//!
//! # Encoding
//!
//! A flamebearer is a call-stack tree flattened into levels. Level 0 holds the
//! root, level `n` holds every frame at call depth `n`. Each level is a flat
//! run of 4-tuples on the wire:
//!
//! ```text
//! levels[1] = [ 0, 60, 10, 1,   60, 40, 40, 2 ]
//!               │   │   │  └─ index into `names`
//!               │   │   └──── self ticks
//!               │   └──────── width (total ticks)
//!               └──────────── start tick (absolute)
//! ```
//!
//! In memory every level is a contiguous `Vec<Frame>` of plain tuples, so the
//! render and hit-test loops walk flat slices without allocating or chasing
//! pointers.
//!
//! # Validation
//!
//! All structural checks run once, at ingestion. Everything downstream gets a
//! read-only `&Flamebearer` and trusts it.

use std::io::Read;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::domain::{DataError, FrameRef, SpyName};

/// Values per frame tuple in the wire format
const TUPLE_LEN: usize = 4;

/// One frame tuple: `(start, width, self, name)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Absolute start tick
    pub start: u64,
    /// Total ticks covered by this frame (self + children)
    pub width: u64,
    /// Ticks spent in the frame itself. Not read by the renderer; the table
    /// collaborator aggregates it.
    pub self_ticks: u64,
    /// Index into [`Flamebearer::names`]
    pub name: u32,
}

impl Frame {
    #[must_use]
    pub fn new(start: u64, width: u64, self_ticks: u64, name: u32) -> Self {
        Self { start, width, self_ticks, name }
    }

    /// First tick after this frame. Validated frames never saturate.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.width)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFlamebearer {
    names: Vec<String>,
    levels: Vec<Vec<u64>>,
    num_ticks: u64,
    #[serde(default)]
    max_self: Option<u64>,
    sample_rate: f64,
    #[serde(default)]
    spy_name: SpyName,
    #[serde(default)]
    units: String,
}

/// Parent frame whose children plus self ticks don't add up to its width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConservationViolation {
    pub parent: FrameRef,
    pub expected: u64,
    pub actual: u64,
}

/// Decoded, validated profile (immutable once built)
#[derive(Debug, Clone)]
pub struct Flamebearer {
    names: Vec<String>,
    levels: Vec<Vec<Frame>>,
    num_ticks: u64,
    max_self: u64,
    sample_rate: f64,
    spy_name: SpyName,
    units: String,
}

impl Flamebearer {
    /// Build a flamebearer from already-decoded levels.
    ///
    /// # Errors
    /// Returns a [`DataError`] if the levels violate ordering, overlap or
    /// name-index bounds, or if the tick totals or sample rate are degenerate.
    pub fn from_parts(
        names: Vec<String>,
        levels: Vec<Vec<Frame>>,
        num_ticks: u64,
        sample_rate: f64,
        spy_name: SpyName,
    ) -> Result<Self, DataError> {
        let max_self = derive_max_self(&levels);
        let fb = Self {
            names,
            levels,
            num_ticks,
            max_self,
            sample_rate,
            spy_name,
            units: String::new(),
        };
        fb.validate()?;
        Ok(fb)
    }

    /// Parse and validate a flamebearer JSON document
    ///
    /// # Errors
    /// Returns [`DataError::ParseFailed`] for malformed JSON and the
    /// structural variants for invalid profile data.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let wire: WireFlamebearer = serde_json::from_str(json)?;
        Self::from_wire(wire)
    }

    /// Parse and validate a flamebearer from any reader
    ///
    /// # Errors
    /// See [`Flamebearer::from_json_str`].
    pub fn from_reader(reader: impl Read) -> Result<Self, DataError> {
        let wire: WireFlamebearer = serde_json::from_reader(reader)?;
        Self::from_wire(wire)
    }

    /// Load a flamebearer JSON file from disk
    ///
    /// # Errors
    /// Returns [`DataError::Io`] if the file can't be read, otherwise see
    /// [`Flamebearer::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let fb = Self::from_json_str(&content)?;
        info!(
            "Loaded flamebearer from {}: {} levels, {} names, {} ticks (spy: {})",
            path.as_ref().display(),
            fb.levels.len(),
            fb.names.len(),
            fb.num_ticks,
            fb.spy_name
        );
        Ok(fb)
    }

    fn from_wire(wire: WireFlamebearer) -> Result<Self, DataError> {
        let mut levels = Vec::with_capacity(wire.levels.len());
        for (level, flat) in wire.levels.iter().enumerate() {
            if flat.len() % TUPLE_LEN != 0 {
                return Err(DataError::TruncatedLevel { level, len: flat.len() });
            }
            let frames = flat
                .chunks_exact(TUPLE_LEN)
                .enumerate()
                .map(|(offset, t)| {
                    let name = u32::try_from(t[3]).map_err(|_| DataError::NameIndexOutOfBounds {
                        level,
                        offset,
                        index: t[3],
                        names: wire.names.len(),
                    })?;
                    Ok(Frame::new(t[0], t[1], t[2], name))
                })
                .collect::<Result<Vec<_>, DataError>>()?;
            levels.push(frames);
        }

        let max_self = wire.max_self.unwrap_or_else(|| derive_max_self(&levels));
        let fb = Self {
            names: wire.names,
            levels,
            num_ticks: wire.num_ticks,
            max_self,
            sample_rate: wire.sample_rate,
            spy_name: wire.spy_name,
            units: wire.units,
        };
        fb.validate()?;
        Ok(fb)
    }

    fn validate(&self) -> Result<(), DataError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(DataError::InvalidSampleRate(self.sample_rate));
        }
        if self.levels.is_empty() && self.num_ticks > 0 {
            return Err(DataError::MissingLevels { num_ticks: self.num_ticks });
        }

        let mut carries_ticks = false;
        for (level, frames) in self.levels.iter().enumerate() {
            let mut previous: Option<&Frame> = None;
            for (offset, frame) in frames.iter().enumerate() {
                if frame.name as usize >= self.names.len() {
                    return Err(DataError::NameIndexOutOfBounds {
                        level,
                        offset,
                        index: u64::from(frame.name),
                        names: self.names.len(),
                    });
                }
                let end = frame
                    .start
                    .checked_add(frame.width)
                    .ok_or(DataError::TickOverflow { level, offset })?;
                // Zero-tick profiles are reported as ZeroTicks below
                if self.num_ticks > 0 && end > self.num_ticks {
                    return Err(DataError::FrameOutOfRange {
                        level,
                        offset,
                        end,
                        num_ticks: self.num_ticks,
                    });
                }
                if let Some(prev) = previous {
                    if frame.start < prev.start {
                        return Err(DataError::NonAscendingOffsets {
                            level,
                            offset,
                            start: frame.start,
                            previous: prev.start,
                        });
                    }
                    if frame.start < prev.end() {
                        return Err(DataError::OverlappingFrames {
                            level,
                            offset,
                            previous_end: prev.end(),
                        });
                    }
                }
                carries_ticks |= frame.width > 0;
                previous = Some(frame);
            }
        }

        if self.num_ticks == 0 && carries_ticks {
            return Err(DataError::ZeroTicks);
        }

        for violation in self.tick_conservation_violations() {
            warn!(
                "Tick conservation: frame {} expects {} child+self ticks, found {}",
                violation.parent, violation.expected, violation.actual
            );
        }

        Ok(())
    }

    /// Parents whose children's widths plus their own self ticks differ from
    /// their width.
    ///
    /// Both levels are sorted, so one merge-style sweep per level pair is
    /// enough: O(frames).
    #[must_use]
    pub fn tick_conservation_violations(&self) -> Vec<ConservationViolation> {
        let mut violations = Vec::new();
        for (depth, pair) in self.levels.windows(2).enumerate() {
            let (parents, children) = (&pair[0], &pair[1]);
            let mut child_idx = 0;
            for (offset, parent) in parents.iter().enumerate() {
                // Skip children that start before this parent (orphans)
                while child_idx < children.len() && children[child_idx].start < parent.start {
                    child_idx += 1;
                }
                let mut child_sum = 0u64;
                while child_idx < children.len() && children[child_idx].start < parent.end() {
                    child_sum = child_sum.saturating_add(children[child_idx].width);
                    child_idx += 1;
                }
                let actual = child_sum.saturating_add(parent.self_ticks);
                if actual != parent.width {
                    violations.push(ConservationViolation {
                        parent: FrameRef::new(depth, offset),
                        expected: parent.width,
                        actual,
                    });
                }
            }
        }
        violations
    }

    /// True when the profile carries no samples; the UI shows a "no data"
    /// indicator instead of bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_ticks == 0
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn levels(&self) -> &[Vec<Frame>] {
        &self.levels
    }

    #[must_use]
    pub fn level(&self, index: usize) -> Option<&[Frame]> {
        self.levels.get(index).map(Vec::as_slice)
    }

    /// Number of levels (maximum stack depth + 1)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn frame(&self, frame_ref: FrameRef) -> Option<&Frame> {
        self.levels.get(frame_ref.level)?.get(frame_ref.offset)
    }

    /// Label of a frame. Indices are validated at ingestion.
    #[must_use]
    pub fn name_of(&self, frame: &Frame) -> &str {
        self.names.get(frame.name as usize).map_or("", String::as_str)
    }

    #[must_use]
    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }

    #[must_use]
    pub fn max_self(&self) -> u64 {
        self.max_self
    }

    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[must_use]
    pub fn spy_name(&self) -> &SpyName {
        &self.spy_name
    }

    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Total frame tuples across all levels
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

fn derive_max_self(levels: &[Vec<Frame>]) -> u64 {
    levels.iter().flatten().map(|frame| frame.self_ticks).max().unwrap_or_default()
}
