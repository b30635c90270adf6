//! One-time schema and data bootstrap from a `.sql` script.

use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::error::LoadError;
use crate::store::SqliteStore;

pub const STOP_MARKER: &str = "-- --- STOP EXECUTION HERE ---";

/// A statement with the line number it ended on.
#[derive(Debug, PartialEq, Eq)]
pub struct ScriptStatement {
    pub line: usize,
    pub sql: String,
}

/// Splits a script into statements. Comment lines are dropped, a statement
/// ends on a line whose trimmed text ends with `;`, and reading stops at
/// [`STOP_MARKER`].
pub fn split_statements(script: &str) -> Vec<ScriptStatement> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for (idx, line) in script.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case(STOP_MARKER) {
            info!("stop marker reached at line {}", idx + 1);
            break;
        }
        if trimmed.starts_with("--") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
            continue;
        }

        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let sql = current.trim().trim_end_matches(';').trim_end();
            if !sql.is_empty() {
                statements.push(ScriptStatement { line: idx + 1, sql: sql.to_string() });
            }
            current.clear();
        }
    }

    if !current.trim().is_empty() {
        warn!("ignoring unterminated statement at end of script");
    }
    statements
}

/// Loads `path` into `store` atomically and returns how many statements ran.
pub fn load_script(store: &SqliteStore, path: &Path) -> Result<usize, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io { path: path.to_path_buf(), source: e },
    })?;

    let statements = split_statements(&text);
    let sql: Vec<String> = statements.iter().map(|s| s.sql.clone()).collect();

    store.execute_batch_atomic(&sql).map_err(|(i, source)| match statements.get(i) {
        Some(stmt) => LoadError::Statement { line: stmt.line, sql: stmt.sql.clone(), source },
        None => LoadError::Store(source),
    })
}
