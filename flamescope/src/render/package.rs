//! Package-name extraction from frame labels
//!
//! Each profiler formats stack frames its own way. The package is whatever
//! directory prefix precedes the file name; the rest of the label (file,
//! line number, function) is stripped so that every frame from one package
//! shares a color.
//!
//! | spy     | label                                   | package           |
//! |---------|-----------------------------------------|-------------------|
//! | pyspy   | `django/core/handlers/base.py:42`       | `django/core/handlers/` |
//! | rbspy   | `block in run - /app/lib/worker.rb:12`  | `/app/lib/`       |
//! | gospy   | `net/http.(*conn).serve`                | `net/`            |

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::SpyName;

const PYSPY_PATTERN: &str = r"^(?P<package>(.*/)*)(?P<filename>.*\.py+)(?P<line_info>.*)$";
const RBSPY_PATTERN: &str =
    r"^(?P<func>.+? - )?(?P<package>(.*/)*)(?P<filename>.*)(?P<line_info>.*)$";
const DEFAULT_PATTERN: &str = r"^(?P<package>(.*/)*)(?P<filename>.*)(?P<line_info>.*)$";

static PYSPY: OnceLock<Option<Regex>> = OnceLock::new();
static RBSPY: OnceLock<Option<Regex>> = OnceLock::new();
static DEFAULT: OnceLock<Option<Regex>> = OnceLock::new();

fn pattern_for(spy: &SpyName) -> Option<&'static Regex> {
    let (cell, pattern) = match spy {
        SpyName::PySpy => (&PYSPY, PYSPY_PATTERN),
        SpyName::RbSpy => (&RBSPY, RBSPY_PATTERN),
        SpyName::GoSpy | SpyName::Other(_) => (&DEFAULT, DEFAULT_PATTERN),
    };
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Package prefix of `label` under the given profiler's conventions.
///
/// An empty label yields an empty key; a label the pattern doesn't match is
/// returned whole.
#[must_use]
pub fn package_name<'a>(spy: &SpyName, label: &'a str) -> &'a str {
    if label.is_empty() {
        return label;
    }
    pattern_for(spy)
        .and_then(|re| re.captures(label))
        .and_then(|caps| caps.name("package"))
        .map_or(label, |m| m.as_str())
}
