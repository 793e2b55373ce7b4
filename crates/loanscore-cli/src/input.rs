//! Reading records and secrets from the command line.

use std::fs;
use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result, bail};
use loanscore_model::{RawRecord, parse_record};

/// Parse `--record`: inline JSON, or `@path` to read it from a file.
pub fn load_record(arg: &str) -> Result<RawRecord> {
    let text = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(Path::new(path))
            .with_context(|| format!("read record file {path}"))?,
        None => arg.to_string(),
    };
    parse_record(&text).context("parse record JSON")
}

/// Use the given password, or read the first line from `input`.
pub fn resolve_password<R: BufRead>(given: Option<String>, mut input: R) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    let mut line = String::new();
    input.read_line(&mut line).context("read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("no password given (use --password or pipe it on stdin)");
    }
    Ok(password)
}
