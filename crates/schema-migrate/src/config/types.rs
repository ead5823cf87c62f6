//! Configuration type definitions.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::CaseSensitivity;
use crate::dialect::Capabilities;
use crate::error::{MigrateError, Result};
use crate::translate::DatabaseInfo;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Enabled object categories (default: all).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_types: Option<Vec<String>>,

    /// Script grouping: "table" or "meta_data" (default: "table").
    #[serde(default = "default_group_scripts_by")]
    pub group_scripts_by: String,

    /// Table kinds included in the scripts (default: ["TABLE"]).
    #[serde(default = "default_table_types")]
    pub table_types: Vec<String>,

    /// Identifier quoting: "always" or "minimal" (default: "minimal").
    #[serde(default = "default_identifier_quoting")]
    pub identifier_quoting: String,

    /// Database the metadata was read from, used to select translations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DatabaseRef>,

    /// Target dialect profile.
    #[serde(default)]
    pub dialect: DialectConfig,

    /// Translation rules, applied in priority order.
    #[serde(default)]
    pub translations: Vec<TranslationRule>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            object_types: None,
            group_scripts_by: default_group_scripts_by(),
            table_types: default_table_types(),
            identifier_quoting: default_identifier_quoting(),
            source: None,
            dialect: DialectConfig::default(),
            translations: Vec::new(),
        }
    }
}

/// Capability profile and rendering settings for the generic dialect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialectConfig {
    /// Dialect name, also the target descriptor for translations (default: "generic").
    #[serde(default = "default_dialect_name")]
    pub name: String,

    /// Capability flags; any flag left out keeps its default.
    #[serde(flatten)]
    pub capabilities: Capabilities,

    /// Identity clause (default: "GENERATED BY DEFAULT AS IDENTITY").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_clause: Option<String>,

    /// Clause appended to DROP TABLE, e.g. "CASCADE CONSTRAINTS".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascade_constraints: Option<String>,

    /// Quote characters: one character used on both sides, or an open/close pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,

    /// Words that are always quoted.
    #[serde(default)]
    pub reserved_words: Vec<String>,

    #[serde(default)]
    pub case_sensitivity: CaseSensitivity,

    /// Type-name overrides keyed by type code name, e.g. `BOOLEAN: BIT`.
    #[serde(default)]
    pub type_names: BTreeMap<String, String>,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            name: default_dialect_name(),
            capabilities: Capabilities::default(),
            identity_clause: None,
            cascade_constraints: None,
            quote: None,
            reserved_words: Vec::new(),
            case_sensitivity: CaseSensitivity::default(),
            type_names: BTreeMap::new(),
        }
    }
}

/// A database given either by product name or as a full descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatabaseRef {
    Name(String),
    Info(DatabaseInfo),
}

impl DatabaseRef {
    pub fn to_info(&self) -> DatabaseInfo {
        match self {
            DatabaseRef::Name(name) => DatabaseInfo::new(name.clone()),
            DatabaseRef::Info(info) => info.clone(),
        }
    }

    pub fn product_name(&self) -> &str {
        match self {
            DatabaseRef::Name(name) => name,
            DatabaseRef::Info(info) => &info.product_name,
        }
    }
}

/// One translation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRule {
    pub source: DatabaseRef,
    pub target: DatabaseRef,

    /// "exact", "regex" or "pattern" (default: "exact").
    #[serde(default = "default_rule_kind")]
    pub kind: String,

    /// Text or expression to match; a list is accepted for exact rules.
    pub from: RuleSource,

    pub to: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Rule match text: a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSource {
    One(String),
    Many(Vec<String>),
}

impl RuleSource {
    pub fn values(&self) -> Vec<&str> {
        match self {
            RuleSource::One(s) => vec![s.as_str()],
            RuleSource::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// How a translation rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Exact,
    Regex,
    Pattern,
}

impl FromStr for RuleKind {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(RuleKind::Exact),
            "regex" => Ok(RuleKind::Regex),
            "pattern" => Ok(RuleKind::Pattern),
            _ => Err(MigrateError::Config(format!(
                "Unknown translation kind '{}'. Valid options: exact, regex, pattern",
                s
            ))),
        }
    }
}

fn default_group_scripts_by() -> String {
    "table".to_string()
}

fn default_table_types() -> Vec<String> {
    vec!["TABLE".to_string()]
}

fn default_identifier_quoting() -> String {
    "minimal".to_string()
}

fn default_dialect_name() -> String {
    "generic".to_string()
}

fn default_rule_kind() -> String {
    "exact".to_string()
}
