//! Environment overlay: prefixed variables merged over page metadata.
//!
//! Sources, lowest precedence first:
//!
//! ```text
//! .env → .env.local → .env.<mode> → .env.<mode>.local → process environment
//! ```
//!
//! Only keys starting with one of `[env].prefixes` are kept.

use crate::config::EnvConfig;
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Variable name → value. Sorted so output is reproducible.
pub type Overlay = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{path}` line {line}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// `.env` file names for a mode, lowest precedence first.
pub fn env_files(mode: &str) -> [String; 4] {
    [
        ".env".into(),
        ".env.local".into(),
        format!(".env.{mode}"),
        format!(".env.{mode}.local"),
    ]
}

/// Load the overlay from `.env` files and the process environment.
pub fn load_overlay(settings: &EnvConfig) -> Result<Overlay, OverlayError> {
    let process = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    load_overlay_with(settings, process)
}

/// Load the overlay with an explicit set of process variables.
///
/// File values are expanded after every file is read, so a reference may
/// point at a variable from any file. The prefix filter runs last, which
/// lets unprefixed helper variables feed expansion without leaking out.
pub fn load_overlay_with(
    settings: &EnvConfig,
    process: impl IntoIterator<Item = (String, String)>,
) -> Result<Overlay, OverlayError> {
    let mut files = BTreeMap::new();

    if settings.files {
        for name in env_files(&settings.mode) {
            for entry in read_env_file(&settings.dir.join(name))? {
                files.insert(entry.key.clone(), entry);
            }
        }
    }
    let process: BTreeMap<String, String> = process.into_iter().collect();

    let expander = Expander {
        files: &files,
        process: &process,
    };
    let mut vars: Overlay = files
        .values()
        .filter(|entry| !process.contains_key(&entry.key))
        .map(|entry| (entry.key.clone(), expander.resolve(entry)))
        .collect();
    vars.extend(process);

    vars.retain(|key, _| has_prefix(key, &settings.prefixes));
    Ok(vars)
}

#[inline]
fn has_prefix(key: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| key.starts_with(prefix.as_str()))
}

/// Read one `.env` file. A missing file yields no variables.
fn read_env_file(path: &Path) -> Result<Vec<EnvEntry>, OverlayError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(OverlayError::Io(path.to_path_buf(), err)),
    };

    parse_dotenv(&content).map_err(|(line, message)| OverlayError::Syntax {
        path: path.to_path_buf(),
        line,
        message,
    })
}

// ============================================================================
// .env Parsing
// ============================================================================

/// One `KEY=VALUE` assignment from a `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    /// Value with quotes removed and escapes applied, references unexpanded
    pub value: String,
    /// Single-quoted values are taken literally
    pub expand: bool,
}

/// Parse `.env` content into assignments, in file order.
///
/// Supports `KEY=VALUE`, an optional `export ` prefix and `#` comments.
/// Values may be single, double or backtick quoted, and a quoted value may
/// span several lines. Double quotes understand `\n`, `\t`, `\r`, `\"` and
/// `\\`. An unquoted value ends at the first `#`.
///
/// Errors carry the 1-based line number where the assignment starts.
pub fn parse_dotenv(content: &str) -> Result<Vec<EnvEntry>, (usize, String)> {
    let mut entries = Vec::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line_no = index + 1;
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map_or(line, str::trim_start);

        let Some((key, value)) = line.split_once('=') else {
            return Err((line_no, "expected KEY=VALUE".into()));
        };
        let key = key.trim();
        if !is_valid_key(key) {
            return Err((line_no, format!("invalid variable name `{key}`")));
        }
        let value = value.trim_start();

        let entry = match value.chars().next() {
            Some(quote @ ('"' | '\'' | '`')) => {
                let mut body = value[1..].to_owned();
                let end = loop {
                    if let Some(end) = find_closing(&body, quote) {
                        break end;
                    }
                    let Some((_, next)) = lines.next() else {
                        return Err((line_no, format!("unterminated {quote} quoted value")));
                    };
                    body.push('\n');
                    body.push_str(next);
                };

                let trailing = body[end + 1..].trim();
                if !trailing.is_empty() && !trailing.starts_with('#') {
                    return Err((line_no, format!("unexpected `{trailing}` after quoted value")));
                }

                let inner = &body[..end];
                EnvEntry {
                    key: key.to_owned(),
                    value: if quote == '"' { unescape(inner) } else { inner.to_owned() },
                    expand: quote != '\'',
                }
            }
            _ => EnvEntry {
                key: key.to_owned(),
                value: value.split_once('#').map_or(value, |(v, _)| v).trim().to_owned(),
                expand: true,
            },
        };
        entries.push(entry);
    }

    Ok(entries)
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Byte offset of the closing quote. Inside double quotes a backslash
/// escapes the next character.
fn find_closing(body: &str, quote: char) -> Option<usize> {
    if quote != '"' {
        return body.find(quote);
    }

    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other @ ('"' | '\\')) => out.push(other),
            // `\$` is kept for expansion to turn into a literal `$`
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

// ============================================================================
// Variable Expansion
// ============================================================================

/// Guards against reference cycles like `A=$B` / `B=$A`.
const MAX_EXPAND_DEPTH: usize = 16;

/// Resolves `$VAR`, `${VAR}` and `${VAR:-default}` references in file
/// values. Process variables win over file variables and are used as is.
/// Unknown references expand to an empty string, `\$` gives a literal `$`.
struct Expander<'a> {
    files: &'a BTreeMap<String, EnvEntry>,
    process: &'a BTreeMap<String, String>,
}

impl Expander<'_> {
    fn resolve(&self, entry: &EnvEntry) -> String {
        if entry.expand {
            self.expand(&entry.value, 0)
        } else {
            entry.value.clone()
        }
    }

    fn lookup(&self, name: &str, depth: usize) -> Option<String> {
        if let Some(value) = self.process.get(name) {
            return Some(value.clone());
        }
        let entry = self.files.get(name)?;
        if entry.expand && depth < MAX_EXPAND_DEPTH {
            Some(self.expand(&entry.value, depth + 1))
        } else {
            Some(entry.value.clone())
        }
    }

    fn expand(&self, value: &str, depth: usize) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(pos) = rest.find(|c: char| c == '$' || c == '\\') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if let Some(after) = tail.strip_prefix("\\$") {
                out.push('$');
                rest = after;
                continue;
            }
            if let Some(after) = tail.strip_prefix('\\') {
                out.push('\\');
                rest = after;
                continue;
            }

            let body = &tail[1..];
            if let Some(braced) = body.strip_prefix('{') {
                let Some(end) = braced.find('}') else {
                    out.push('$');
                    rest = body;
                    continue;
                };
                let (name, default) = match braced[..end].split_once(":-") {
                    Some((name, default)) => (name, Some(default)),
                    None => (&braced[..end], None),
                };
                match (self.lookup(name, depth).filter(|v| !v.is_empty()), default) {
                    (Some(value), _) => out.push_str(&value),
                    (None, Some(default)) if depth < MAX_EXPAND_DEPTH => {
                        out.push_str(&self.expand(default, depth + 1));
                    }
                    (None, Some(default)) => out.push_str(default),
                    (None, None) => {}
                }
                rest = &braced[end + 1..];
                continue;
            }

            let len = body
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(body.len());
            if len == 0 {
                out.push('$');
                rest = body;
                continue;
            }
            let (name, after) = body.split_at(len);
            if let Some(value) = self.lookup(name, depth) {
                out.push_str(&value);
            }
            rest = after;
        }

        out.push_str(rest);
        out
    }
}
