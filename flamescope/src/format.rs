//! Human-readable numbers for bar labels and tooltips
//!
//! - [`format_percent`]: `0.4` → `"40%"`, two decimals at most
//! - [`number_with_commas`]: `1234567` → `"1,234,567"`
//! - [`DurationFormatter`]: picks one unit for a whole profile so every
//!   label on screen shares it

#![allow(clippy::cast_precision_loss)]

/// Unit ladder, each step multiplies the previous divider
const DURATION_STEPS: [(f64, &str); 5] =
    [(60.0, "minute"), (60.0, "hour"), (24.0, "day"), (30.0, "month"), (12.0, "year")];

/// Share of the total as a percentage, rounded to two decimals
#[must_use]
#[allow(clippy::float_cmp)]
pub fn format_percent(ratio: f64) -> String {
    let percent = (ratio * 10_000.0).round() / 100.0;
    // -0 prints as "-0"
    let percent = if percent == 0.0 { 0.0 } else { percent };
    format!("{percent}%")
}

/// Thousands separators for sample counts
#[must_use]
pub fn number_with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats second counts in the largest unit the profile's total duration
/// reaches.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationFormatter {
    divider: f64,
    suffix: &'static str,
}

impl DurationFormatter {
    /// `max_seconds` is usually `numTicks / sampleRate`.
    #[must_use]
    pub fn new(max_seconds: f64) -> Self {
        let mut divider = 1.0;
        let mut suffix = "second";
        let mut remaining = max_seconds;
        for (step, name) in DURATION_STEPS {
            if remaining < step {
                break;
            }
            divider *= step;
            remaining /= step;
            suffix = name;
        }
        Self { divider, suffix }
    }

    #[must_use]
    pub fn suffix(&self) -> &'static str {
        self.suffix
    }

    #[must_use]
    pub fn format(&self, seconds: f64) -> String {
        let n = seconds / self.divider;
        let number = if (0.0..0.01).contains(&n) || (n < 0.0 && n > -0.01) {
            "< 0.01".to_string()
        } else {
            format!("{n:.2}")
        };
        #[allow(clippy::float_cmp)]
        let plural = if n == 1.0 { "" } else { "s" };
        format!("{number} {}{plural}", self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(1.0), "100%");
        assert_eq!(format_percent(0.4), "40%");
        assert_eq!(format_percent(0.123_456), "12.35%");
        assert_eq!(format_percent(0.0), "0%");
    }

    #[test]
    fn test_number_with_commas() {
        assert_eq!(number_with_commas(0), "0");
        assert_eq!(number_with_commas(999), "999");
        assert_eq!(number_with_commas(1000), "1,000");
        assert_eq!(number_with_commas(1_234_567), "1,234,567");
    }

    #[test]
    fn test_duration_picks_unit_from_total() {
        assert_eq!(DurationFormatter::new(1.0).suffix(), "second");
        assert_eq!(DurationFormatter::new(59.0).suffix(), "second");
        assert_eq!(DurationFormatter::new(60.0).suffix(), "minute");
        assert_eq!(DurationFormatter::new(7200.0).suffix(), "hour");
        assert_eq!(DurationFormatter::new(86_400.0 * 400.0).suffix(), "year");
    }

    #[test]
    fn test_duration_format() {
        let df = DurationFormatter::new(1.0);
        assert_eq!(df.format(1.0), "1.00 second");
        assert_eq!(df.format(0.5), "0.50 seconds");
        assert_eq!(df.format(0.001), "< 0.01 seconds");

        let minutes = DurationFormatter::new(600.0);
        assert_eq!(minutes.format(90.0), "1.50 minutes");
    }
}
