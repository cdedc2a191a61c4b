//! JSON output to stdout or a file.

use crate::{cli::OutputArgs, config::OutputConfig, log};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::{Write, stdout},
};

/// Serialize `value`, pretty unless disabled by CLI or config.
pub fn to_json<T: Serialize>(value: &T, args: &OutputArgs, config: &OutputConfig) -> Result<String> {
    let pretty = args.pretty.unwrap_or(config.pretty);
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Write `value` as JSON to `args.output`, or stdout when unset.
pub fn emit<T: Serialize>(value: &T, args: &OutputArgs, config: &OutputConfig) -> Result<()> {
    let json = to_json(value, args, config)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("write"; "{}", path.display());
        }
        None => {
            let mut stdout = stdout().lock();
            writeln!(stdout, "{json}")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
