//! TAP grammar builder.
//!
//! Every function here is pure and returns a newline-terminated fragment of a
//! TAP version 14 document. Nothing in this module touches assertion state.
//!
//! ```text
//! TAP version 14
//! 1..2
//! # a block
//! ok 1
//! not ok 2 - boom
//!   ---
//!   message:  Failed Test
//!   ...
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::Fault;
use crate::format::format_value;
use crate::value::Value;

pub const DEFAULT_VERSION: u32 = 14;

static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("static regex"));

/// Collapses every run of newlines to a single space.
fn single_line(s: &str) -> std::borrow::Cow<'_, str> {
    NEWLINES.replace_all(s, " ")
}

pub fn version_line(n: u32) -> String {
    format!("TAP version {}\n", n)
}

pub fn plan_line(n: usize, reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.is_empty() => format!("1..{} # {}\n", n, single_line(reason)),
        _ => format!("1..{}\n", n),
    }
}

pub fn test_point_line(pass: bool, n: usize, description: &str) -> String {
    let status = if pass { "ok" } else { "not ok" };
    if description.is_empty() {
        format!("{} {}\n", status, n)
    } else {
        format!("{} {} - {}\n", status, n, single_line(description))
    }
}

pub fn bail_out_line(reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.is_empty() => format!("Bail out! {}\n", single_line(reason)),
        _ => "Bail out!\n".to_string(),
    }
}

/// Renders a possibly multi-line comment, one `#` line per input line.
pub fn comment_lines(s: &str) -> String {
    if s.is_empty() {
        return "#\n".to_string();
    }
    s.lines()
        .map(|line| match line.trim() {
            "" => "#\n".to_string(),
            text => format!("# {}\n", text),
        })
        .collect()
}

/// YAML-ish diagnostic block that follows a failing test point.
pub fn diagnostic_block(actual: Option<&Value>, expected: Option<&Value>, fault: &Fault) -> String {
    let operand = |v: Option<&Value>| v.map_or_else(|| "N/A".to_string(), format_value);
    let stack: String = fault
        .stack
        .trim()
        .lines()
        .map(|line| format!("    {}\n", line))
        .collect();

    format!(
        "  ---\n  message:  {}\n  actual:   {}\n  expected: {}\n  stack: |-\n{}  ...\n",
        fault.message,
        operand(actual),
        operand(expected),
        stack
    )
}

pub fn document(version: &str, plan: &str, body: &str) -> String {
    format!("{}{}{}", version, plan, body)
}
