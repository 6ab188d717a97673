//! CLI stdin/stdout helpers

use serde::Serialize;
use std::io::{self, IsTerminal, Read};

use crate::content::ContentItem;

use super::errors::CliResult;

/// Read a JSON array of content items from stdin, if anything is piped
/// in. An attached terminal means no input.
pub fn read_content_items() -> CliResult<Vec<ContentItem>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }

    let mut raw = String::new();
    stdin.lock().read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&raw)?)
}

/// Print a value as pretty JSON on stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
