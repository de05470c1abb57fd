//! Bar colors
//!
//! Package names are bucketed into a fixed palette with FNV-1a, so the same
//! package gets the same color across renders, runs and machines.

use super::surface::Rgba;

/// Bars matching an active search
pub const HIGHLIGHT: Rgba = Rgba::rgb(0x48, 0xCE, 0x73);

/// Collapsed runs, and bars that miss an active search
pub const GREYSCALE: Rgba = Rgba::greyscale(200, 0.66);

/// Label text
pub const LABEL_TEXT: Rgba = Rgba::rgb(0, 0, 0);

/// Alpha for bars above the zoomed-in frame
pub const ANCESTOR_ALPHA: f64 = 0.33;

/// Warm-to-cool categorical palette (HSL 24°, 34°, 194°, 163°, 211°, 246°,
/// 305°, 47°)
pub const PACKAGE_PALETTE: [Rgba; 8] = [
    Rgba::rgb(223, 139, 83),
    Rgba::rgb(224, 173, 108),
    Rgba::rgb(104, 183, 207),
    Rgba::rgb(89, 192, 163),
    Rgba::rgb(104, 151, 202),
    Rgba::rgb(137, 130, 201),
    Rgba::rgb(235, 168, 230),
    Rgba::rgb(255, 225, 117),
];

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

#[must_use]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

/// Stable palette color for a package name
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn color_for_package(package: &str, alpha: f64) -> Rgba {
    let index = (fnv1a(package.as_bytes()) % PACKAGE_PALETTE.len() as u64) as usize;
    PACKAGE_PALETTE[index].with_alpha(alpha)
}
