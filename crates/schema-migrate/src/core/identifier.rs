//! Identifiers, qualified names and identifier quoting.
//!
//! Names held by the metadata model are stored unquoted. Quoting happens at
//! render time through the target [`Dialect`](crate::core::Dialect) and the
//! configured [`IdentifierQuoting`] mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL: 63 bytes
/// - SQL Server: 128 characters
/// - MySQL: 64 characters
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes
/// - Identifiers exceeding maximum length
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MigrateError::Config(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(MigrateError::Config(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MigrateError::Config(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Wrap `name` in `open`/`close`, doubling any embedded `close` character.
pub fn quote_with(name: &str, open: char, close: char) -> String {
    let escaped = name.replace(close, &format!("{}{}", close, close));
    format!("{}{}{}", open, escaped, close)
}

/// Whether a name can be used unquoted: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// How identifier comparisons treat letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

/// When identifiers are wrapped in the dialect's quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierQuoting {
    /// Quote every identifier.
    Always,
    /// Quote only identifiers that are not plain names or are reserved words.
    #[default]
    Minimal,
}

impl FromStr for IdentifierQuoting {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "always" => Ok(IdentifierQuoting::Always),
            "minimal" => Ok(IdentifierQuoting::Minimal),
            other => Err(MigrateError::Config(format!(
                "Unknown identifier quoting '{}'. Valid options: always, minimal",
                other
            ))),
        }
    }
}

/// A single unquoted SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Parse and validate an identifier.
    pub fn parse(name: &str) -> Result<Self> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare two identifiers under the given case sensitivity.
    pub fn matches(&self, other: &Identifier, case: CaseSensitivity) -> bool {
        match case {
            CaseSensitivity::Sensitive => self.0 == other.0,
            CaseSensitivity::Insensitive => self.0.eq_ignore_ascii_case(&other.0),
        }
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog / schema / local name triple identifying a top-level object.
///
/// Equality is exact; use [`QualifiedName::matches`] for dialect-aware
/// comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Identifier>,
    pub name: Identifier,
}

impl QualifiedName {
    /// An unqualified name.
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    /// A schema-qualified name.
    pub fn with_schema(schema: impl Into<Identifier>, name: impl Into<Identifier>) -> Self {
        Self {
            catalog: None,
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Parse a dotted `[catalog.][schema.]name` string, validating each part.
    pub fn parse(dotted: &str) -> Result<Self> {
        let parts: Vec<&str> = dotted.split('.').collect();
        for part in &parts {
            validate_identifier(part)?;
        }
        match parts.as_slice() {
            [name] => Ok(Self::new(*name)),
            [schema, name] => Ok(Self::with_schema(*schema, *name)),
            [catalog, schema, name] => Ok(Self {
                catalog: Some((*catalog).into()),
                schema: Some((*schema).into()),
                name: (*name).into(),
            }),
            _ => Err(MigrateError::Config(format!(
                "Qualified name has too many parts: {:?}",
                dotted
            ))),
        }
    }

    /// Iterate over the present name parts, outermost first.
    pub fn parts(&self) -> impl Iterator<Item = &Identifier> {
        self.catalog
            .iter()
            .chain(self.schema.iter())
            .chain(std::iter::once(&self.name))
    }

    /// Compare under the given case sensitivity. Absent parts only match
    /// absent parts.
    pub fn matches(&self, other: &QualifiedName, case: CaseSensitivity) -> bool {
        fn part_matches(
            a: &Option<Identifier>,
            b: &Option<Identifier>,
            case: CaseSensitivity,
        ) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a.matches(b, case),
                (None, None) => true,
                _ => false,
            }
        }
        part_matches(&self.catalog, &other.catalog, case)
            && part_matches(&self.schema, &other.schema, case)
            && self.name.matches(&other.name, case)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .parts()
            .map(Identifier::as_str)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}
