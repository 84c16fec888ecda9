use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::info;

/// Pretty JSON with two-space indent. Non-ASCII text is written as-is.
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Writes `data` as JSON to `path`, or to stdout when no path is given.
pub fn write_json<T: Serialize + ?Sized>(data: &T, path: Option<&Path>) -> Result<()> {
    let json = to_json(data)?;
    match path {
        Some(path) => {
            let mut file = File::create(path)
                .wrap_err_with(|| format!("Failed to create output file {}", path.display()))?;
            file.write_all(json.as_bytes())?;
            info!(path = %path.display(), "Data saved");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
