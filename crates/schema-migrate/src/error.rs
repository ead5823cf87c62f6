//! Error types for schema script generation.

use thiserror::Error;

/// Main error type for schema migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid YAML values, unknown modes, bad rules, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column type has no type-name mapping in the target dialect.
    ///
    /// Fatal: a table with an untyped column cannot be created, so the
    /// whole generation call is aborted.
    #[error(
        "Unsupported type {type_name}, type code {type_code}, length {size} on table {table} column {column}"
    )]
    UnsupportedType {
        type_name: String,
        type_code: i32,
        size: i64,
        table: String,
        column: String,
    },

    /// Script exporter failure
    #[error("Export error: {message}")]
    Export { message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    /// Create an UnsupportedType error.
    pub fn unsupported_type(
        type_name: impl Into<String>,
        type_code: i32,
        size: i64,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        MigrateError::UnsupportedType {
            type_name: type_name.into(),
            type_code,
            size,
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create an Export error
    pub fn export(message: impl Into<String>) -> Self {
        MigrateError::Export {
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for schema migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
