//! Text exposition format (version 0.0.4).
//!
//! Rendering rules:
//! - Families in registration order, each with `# HELP` and `# TYPE`.
//!   Empty help text omits the `# HELP` line.
//! - Labels in declared order; empty label sets omit braces.
//! - Values use the shortest round-trip decimal (`8`, not `8.0`), switching
//!   to exponent form below 1e-6 and from 1e21 up.

use std::fmt::Write;

use crate::error::{MetricsError, Result};
use crate::registry::Snapshot;

/// Content type served with scrape responses.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Escape a label value (`\`, `"`, newline).
pub fn escape_label_value(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape HELP text (`\`, newline).
pub fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Shortest text that parses back to the same `f64`.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else if v != 0.0 && !(1e-6..1e21).contains(&v.abs()) {
        // Exponent form outside the plain-decimal range, e.g. `1e21`, `1e-7`.
        format!("{v:e}")
    } else {
        // `Display` for f64 is shortest round-trip and drops a zero fraction.
        format!("{v}")
    }
}

/// Render one sample line without a trailing newline:
/// `name{k1="v1",k2="v2"} value`.
pub fn format_sample<K, V>(name: &str, labels: &[(K, V)], value: f64) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::with_capacity(name.len() + 16 * labels.len() + 8);
    write_sample(&mut out, name, labels.iter().map(|(k, v)| (k.as_ref(), v.as_ref())), value);
    out
}

fn write_sample<'a, I>(out: &mut String, name: &str, labels: I, value: f64)
where
    I: Iterator<Item = (&'a str, &'a str)>,
{
    out.push_str(name);
    let mut first = true;
    for (k, v) in labels {
        out.push(if first { '{' } else { ',' });
        first = false;
        let _ = write!(out, "{}=\"{}\"", k, escape_label_value(v));
    }
    if !first {
        out.push('}');
    }
    out.push(' ');
    out.push_str(&format_value(value));
}

/// Encode a snapshot. Fails only if a series' label arity disagrees with
/// its descriptor.
pub fn encode(snapshot: &Snapshot) -> Result<String> {
    let mut out = String::new();
    encode_into(snapshot, &mut out)?;
    Ok(out)
}

/// Encode a snapshot, appending to `out`. On error `out` is left untouched.
pub fn encode_into(snapshot: &Snapshot, out: &mut String) -> Result<()> {
    let mut buf = String::new();

    for family in snapshot.families() {
        let desc = &family.descriptor;
        if !desc.help.is_empty() {
            let _ = writeln!(buf, "# HELP {} {}", desc.name, escape_help(&desc.help));
        }
        let _ = writeln!(buf, "# TYPE {} {}", desc.name, desc.kind.as_str());

        for series in &family.series {
            if series.label_values.len() != desc.label_names.len() {
                return Err(MetricsError::Encoding(format!(
                    "series of {} has {} label values, descriptor declares {}",
                    desc.name,
                    series.label_values.len(),
                    desc.label_names.len()
                )));
            }
            let labels = desc
                .label_names
                .iter()
                .map(String::as_str)
                .zip(series.label_values.iter().map(String::as_str));
            write_sample(&mut buf, &desc.name, labels, series.value);
            buf.push('\n');
        }
    }

    out.push_str(&buf);
    Ok(())
}
