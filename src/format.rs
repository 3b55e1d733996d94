//! Display helpers shared by the grammar builder and the assertion verbs.

use crate::value::Value;

/// Renders a number for the report. Negative zero is kept distinct from zero.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        return exponent_form(n);
    }
    if n.fract() == 0.0 && magnitude < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// `1e+21`, `1.5e-7`: the exponent always carries its sign.
fn exponent_form(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => formatted,
    }
}

/// Renders an operand for human display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        other => other.to_string(),
    }
}

/// Resolves the description shown on a test point.
///
/// An explicit message always wins. Without one, a description is synthesized
/// from the operands when both are present.
pub fn describe(
    message: Option<&str>,
    actual: Option<&Value>,
    expected: Option<&Value>,
    equality_expected: bool,
) -> String {
    match (message, actual, expected) {
        (Some(message), _, _) => message.to_string(),
        (None, Some(actual), Some(expected)) => format!(
            "{} {} {}",
            format_value(actual),
            if equality_expected { "===" } else { "!==" },
            format_value(expected)
        ),
        _ => String::new(),
    }
}
