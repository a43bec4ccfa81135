//! Listing output in text or JSON.

use core::fmt::Display;
use std::io::Write;

use serde::Serialize;

use crate::config::OutputFormat;

/// Writes `items` in the configured format. `empty` is shown instead of an
/// empty text listing.
pub fn listing<T, W>(out: &mut W, items: &[T], format: OutputFormat, empty: &str) -> anyhow::Result<()>
where
    T: Display + Serialize,
    W: Write,
{
    match format {
        OutputFormat::Text if items.is_empty() => writeln!(out, "{empty}")?,
        OutputFormat::Text => {
            for item in items {
                writeln!(out, "{item}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, items)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
