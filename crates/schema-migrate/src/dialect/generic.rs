//! Generic capability-profile dialect.
//!
//! [`GenericDialect`] implements [`Dialect`] from plain data: a set of
//! capability flags, a [`TypeNameMap`], quote characters and an identity
//! clause. It can be configured from YAML (see [`crate::config`]) and is the
//! dialect used throughout the tests.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::identifier::{quote_with, CaseSensitivity};
use crate::core::traits::Dialect;

use super::typemap::TypeNameMap;

/// Capability flags answered by [`GenericDialect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub sequence: bool,
    pub unique_in_create_table: bool,
    pub index_in_create_table: bool,
    pub create_multiple_indexes: bool,
    pub not_null_unique: bool,
    pub column_check: bool,
    pub table_check: bool,
    pub drop_constraints: bool,
    pub if_exists_before_drop_table: bool,
    pub if_exists_after_drop_table: bool,
    pub negative_scale: bool,
    /// Render column and table comments.
    pub comments: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            sequence: true,
            unique_in_create_table: true,
            index_in_create_table: false,
            create_multiple_indexes: false,
            not_null_unique: false,
            column_check: true,
            table_check: true,
            drop_constraints: true,
            if_exists_before_drop_table: true,
            if_exists_after_drop_table: false,
            negative_scale: false,
            comments: false,
        }
    }
}

/// Dialect defined entirely by data.
#[derive(Debug, Clone)]
pub struct GenericDialect {
    name: String,
    capabilities: Capabilities,
    type_names: TypeNameMap,
    identity_clause: String,
    cascade_constraints: Option<String>,
    quote: (char, char),
    reserved_words: HashSet<String>,
    case_sensitivity: CaseSensitivity,
}

impl Default for GenericDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericDialect {
    /// Create a generic dialect with default capabilities and standard type names.
    pub fn new() -> Self {
        Self {
            name: "generic".to_string(),
            capabilities: Capabilities::default(),
            type_names: TypeNameMap::standard(),
            identity_clause: "GENERATED BY DEFAULT AS IDENTITY".to_string(),
            cascade_constraints: None,
            quote: ('"', '"'),
            reserved_words: HashSet::new(),
            case_sensitivity: CaseSensitivity::Sensitive,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_type_names(mut self, type_names: TypeNameMap) -> Self {
        self.type_names = type_names;
        self
    }

    /// Register or replace one unbounded type-name template.
    pub fn with_type_name(mut self, type_code: i32, template: impl Into<String>) -> Self {
        self.type_names.add_type_name(type_code, template);
        self
    }

    pub fn with_identity_clause(mut self, clause: impl Into<String>) -> Self {
        self.identity_clause = clause.into();
        self
    }

    pub fn with_cascade_constraints(mut self, clause: impl Into<String>) -> Self {
        self.cascade_constraints = Some(clause.into());
        self
    }

    pub fn with_quote(mut self, open: char, close: char) -> Self {
        self.quote = (open, close);
        self
    }

    pub fn with_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reserved_words = words
            .into_iter()
            .map(|w| w.as_ref().to_uppercase())
            .collect();
        self
    }

    pub fn with_case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case_sensitivity = case;
        self
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Mutable access for toggling individual flags.
    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &str {
        &self.name
    }

    fn quote_ident(&self, name: &str) -> String {
        quote_with(name, self.quote.0, self.quote.1)
    }

    fn is_reserved_word(&self, word: &str) -> bool {
        self.reserved_words.contains(&word.to_uppercase())
    }

    fn case_sensitivity(&self) -> CaseSensitivity {
        self.case_sensitivity
    }

    fn supports_sequence(&self) -> bool {
        self.capabilities.sequence
    }

    fn supports_unique_in_create_table(&self) -> bool {
        self.capabilities.unique_in_create_table
    }

    fn supports_index_in_create_table(&self) -> bool {
        self.capabilities.index_in_create_table
    }

    fn supports_create_multiple_indexes(&self) -> bool {
        self.capabilities.create_multiple_indexes
    }

    fn supports_not_null_unique(&self) -> bool {
        self.capabilities.not_null_unique
    }

    fn supports_column_check(&self) -> bool {
        self.capabilities.column_check
    }

    fn supports_table_check(&self) -> bool {
        self.capabilities.table_check
    }

    fn supports_drop_constraints(&self) -> bool {
        self.capabilities.drop_constraints
    }

    fn supports_if_exists_before_drop_table(&self) -> bool {
        self.capabilities.if_exists_before_drop_table
    }

    fn supports_if_exists_after_drop_table(&self) -> bool {
        self.capabilities.if_exists_after_drop_table
    }

    fn supports_negative_scale(&self) -> bool {
        self.capabilities.negative_scale
    }

    fn type_name(&self, type_code: i32, size: i64, precision: i32, scale: i32) -> Option<String> {
        self.type_names.type_name(type_code, size, precision, scale)
    }

    fn identity_clause(&self, sequence: Option<&str>) -> String {
        match sequence {
            Some(seq) => format!("{} ({})", self.identity_clause, seq),
            None => self.identity_clause.clone(),
        }
    }

    fn cascade_constraints_clause(&self) -> Option<String> {
        self.cascade_constraints.clone()
    }

    fn column_comment(&self, comment: &str) -> Option<String> {
        self.capabilities
            .comments
            .then(|| format!(" COMMENT '{}'", comment.replace('\'', "''")))
    }

    fn table_comment(&self, comment: &str) -> Option<String> {
        self.capabilities
            .comments
            .then(|| format!(" COMMENT '{}'", comment.replace('\'', "''")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::type_code;

    #[test]
    fn test_default_capabilities() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert!(dialect.supports_sequence());
        assert!(dialect.supports_unique_in_create_table());
        assert!(!dialect.supports_index_in_create_table());
        assert!(dialect.supports_if_exists_before_drop_table());
        assert!(!dialect.supports_if_exists_after_drop_table());
    }

    #[test]
    fn test_toggle_capability() {
        let mut dialect = GenericDialect::new();
        dialect.capabilities_mut().sequence = false;
        assert!(!dialect.supports_sequence());
    }

    #[test]
    fn test_quoting_and_reserved_words() {
        let dialect = GenericDialect::new()
            .with_quote('[', ']')
            .with_reserved_words(["order", "user"]);
        assert_eq!(dialect.quote_ident("a]b"), "[a]]b]");
        assert!(dialect.is_reserved_word("ORDER"));
        assert!(dialect.is_reserved_word("User"));
        assert!(!dialect.is_reserved_word("orders"));
    }

    #[test]
    fn test_identity_clause_with_sequence() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.identity_clause(None), "GENERATED BY DEFAULT AS IDENTITY");
        assert_eq!(
            dialect.identity_clause(Some("seq_orders")),
            "GENERATED BY DEFAULT AS IDENTITY (seq_orders)"
        );
    }

    #[test]
    fn test_comments_only_when_enabled() {
        let mut dialect = GenericDialect::new();
        assert!(dialect.column_comment("x").is_none());
        dialect.capabilities_mut().comments = true;
        assert_eq!(dialect.column_comment("it's").unwrap(), " COMMENT 'it''s'");
    }

    #[test]
    fn test_type_name_override() {
        let dialect = GenericDialect::new().with_type_name(type_code::BOOLEAN, "BIT");
        assert_eq!(dialect.type_name(type_code::BOOLEAN, 0, 0, 0).unwrap(), "BIT");
    }

    #[test]
    fn test_capabilities_from_partial_yaml() {
        let caps: Capabilities = serde_yaml::from_str("index_in_create_table: true\n").unwrap();
        assert!(caps.index_in_create_table);
        assert!(caps.sequence);
    }
}
