// src/exec/clean.rs

//! Strip terminal escape sequences from subprocess output before it is shown.

use std::sync::LazyLock;

use regex::Regex;

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
        .expect("ANSI escape pattern is a valid regex")
});

/// Remove ANSI escape sequences from one line of output.
///
/// Removal is repeated until nothing matches, so `clean(clean(s)) == clean(s)`
/// even when stripping one sequence exposes another.
pub fn clean(line: &str) -> String {
    let mut out = line.to_string();
    while ANSI_ESCAPE.is_match(&out) {
        out = ANSI_ESCAPE.replace_all(&out, "").into_owned();
    }
    out
}
