use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find config file: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Error reading config file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed config line {line}: {text}")]
    Malformed { line: usize, text: String },
    #[error("Config key '{0}' not provided")]
    MissingKey(&'static str),
    #[error("Config key '{key}' has invalid value '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Query(String),
    #[error("{0}")]
    Connection(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing {param}. Usage: {usage}")]
    Missing { param: &'static str, usage: &'static str },
    #[error("Invalid format. Usage: {usage}")]
    Malformed { usage: &'static str },
    #[error("{} must be an integer.", capitalized(.param))]
    NotAnInteger { param: &'static str },
    #[error("{} must be between {min} and {max}.", capitalized(.param))]
    OutOfRange { param: &'static str, min: i64, max: i64 },
    #[error("{} must be at least {min}.", capitalized(.param))]
    TooSmall { param: &'static str, min: i64 },
    #[error("Please enter one of {options}.")]
    NotAChoice { options: String },
    #[error("{} must not be empty.", capitalized(.param))]
    Empty { param: &'static str },
    #[error("Expected {expected} parameters, got {got}.")]
    Arity { expected: usize, got: usize },
}

/// Parameter names are lower case; notices lead with them.
fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("end of input")]
    Eof,
    #[error("interrupted")]
    Interrupted,
    #[error("readline error: {0}")]
    Readline(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The SQL file {} was not found.", .0.display())]
    NotFound(PathBuf),
    #[error("Error reading SQL file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("SQL error at line {line}: {source}\nFailed SQL statement:\n{sql}")]
    Statement {
        line: usize,
        sql: String,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything that can abort a single routed command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode::{CannotOpen, DatabaseCorrupt, NotADatabase, SystemIoFailure};

        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if matches!(e.code, CannotOpen | NotADatabase | DatabaseCorrupt | SystemIoFailure) =>
            {
                StoreError::Connection(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

impl From<rustyline::error::ReadlineError> for InputError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        use rustyline::error::ReadlineError;

        match err {
            ReadlineError::Eof => InputError::Eof,
            ReadlineError::Interrupted => InputError::Interrupted,
            e => InputError::Readline(e.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validation_notices_are_capitalized() {
        assert_eq!(
            ValidationError::NotAnInteger { param: "season year" }.to_string(),
            "Season year must be an integer."
        );
        assert_eq!(
            ValidationError::OutOfRange { param: "week number", min: 1, max: 22 }.to_string(),
            "Week number must be between 1 and 22."
        );
        assert_eq!(
            ValidationError::TooSmall { param: "number of teams", min: 1 }.to_string(),
            "Number of teams must be at least 1."
        );
        assert_eq!(ValidationError::Empty { param: "division" }.to_string(), "Division must not be empty.");
        assert_eq!(capitalized(""), "");
    }
}
