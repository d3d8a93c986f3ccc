pub mod file;

use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Load a typed input from `--input <file>` or JSON piped on stdin.
///
/// Returns `None` when neither is supplied so the caller can fall back to
/// individual flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        log::debug!("reading input from {path}");
        return Ok(Some(file::read_input(path)?));
    }

    // interactive terminal: nothing piped
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let piped = buffer.trim();
    if piped.is_empty() {
        return Ok(None);
    }

    log::debug!("reading {} bytes of JSON from stdin", piped.len());
    Ok(Some(serde_json::from_str(piped)?))
}
