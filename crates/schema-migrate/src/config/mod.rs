//! Configuration loading and validation.
//!
//! A YAML file selects what to generate and describes the target dialect
//! and translation rules:
//!
//! ```yaml
//! group_scripts_by: table
//! object_types: [TABLE, PRIMARY_KEY, INDEX, FOREIGN_KEY, AUTO_INCREMENT]
//! source: MySQL
//! dialect:
//!   name: nuodb
//!   index_in_create_table: true
//!   quote: "`"
//!   type_names:
//!     BOOLEAN: BOOLEAN
//! translations:
//!   - source: MySQL
//!     target: nuodb
//!     from: [NOW(), CURRENT_TIMESTAMP()]
//!     to: CURRENT_TIMESTAMP
//! ```

mod types;
mod validation;

pub use types::*;

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::core::type_code::type_code_for_name;
use crate::core::{IdentifierQuoting, TableType};
use crate::dialect::{GenericDialect, TypeNameMap};
use crate::error::{MigrateError, Result};
use crate::generator::{GeneratorOptions, GroupScriptsBy, ObjectType, ScriptGenerator};
use crate::translate::{
    compile_expression, PatternTranslator, TranslationManager, DEFAULT_PRIORITY,
};

impl GeneratorConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Enabled object categories; all when not configured.
    pub fn object_types(&self) -> Result<Vec<ObjectType>> {
        match &self.object_types {
            None => Ok(ObjectType::ALL.to_vec()),
            Some(names) => names.iter().map(|n| n.parse()).collect(),
        }
    }

    pub fn group_scripts_by(&self) -> Result<GroupScriptsBy> {
        self.group_scripts_by.parse()
    }

    pub fn table_types(&self) -> Result<Vec<TableType>> {
        self.table_types.iter().map(|t| t.parse()).collect()
    }

    pub fn identifier_quoting(&self) -> Result<IdentifierQuoting> {
        self.identifier_quoting.parse()
    }

    /// Runtime generator options.
    pub fn generator_options(&self) -> Result<GeneratorOptions> {
        let mut options = GeneratorOptions::default()
            .with_object_types(self.object_types()?)
            .with_group_scripts_by(self.group_scripts_by()?)
            .with_table_types(self.table_types()?)
            .with_identifier_quoting(self.identifier_quoting()?);
        if let Some(source) = &self.source {
            options = options.with_source(source.to_info());
        }
        Ok(options)
    }

    /// Translation manager holding one translator per configured rule.
    pub fn build_translation_manager(&self) -> Result<TranslationManager> {
        let mut manager = TranslationManager::new();
        for rule in &self.translations {
            let mut translator =
                PatternTranslator::new(rule.source.to_info(), rule.target.to_info());
            match (rule.kind.parse::<RuleKind>()?, &rule.from) {
                (RuleKind::Exact, from) => {
                    translator.add_translations(from.values(), rule.to.clone());
                }
                (RuleKind::Regex, RuleSource::One(expr)) => {
                    translator.add_translation_regex(expr, rule.to.clone())?;
                }
                (RuleKind::Pattern, RuleSource::One(expr)) => {
                    let pattern = compile_expression(expr, expr)?;
                    translator.add_translation_pattern(pattern, rule.to.clone());
                }
                (kind, RuleSource::Many(_)) => {
                    return Err(MigrateError::Config(format!(
                        "A list of sources is only allowed for exact rules, got {:?}",
                        kind
                    )));
                }
            }
            manager.add_translator_with_priority(
                Box::new(translator),
                rule.priority.unwrap_or(DEFAULT_PRIORITY),
            );
        }
        debug!("Loaded {} translation rules", manager.len());
        Ok(manager)
    }

    /// The generic dialect described by the `dialect` section.
    pub fn build_dialect(&self) -> Result<GenericDialect> {
        self.dialect.build()
    }

    /// A generator wired with this configuration's dialect, options and translations.
    pub fn build_generator(&self) -> Result<ScriptGenerator> {
        let generator =
            ScriptGenerator::new(Arc::new(self.build_dialect()?), self.generator_options()?);
        if self.translations.is_empty() {
            return Ok(generator);
        }
        Ok(generator.with_translations(Arc::new(self.build_translation_manager()?)))
    }
}

impl DialectConfig {
    /// Open and close quote characters, if configured.
    pub fn quote_chars(&self) -> Result<Option<(char, char)>> {
        let Some(quote) = &self.quote else {
            return Ok(None);
        };
        let chars: Vec<char> = quote.chars().collect();
        match chars.as_slice() {
            [c] => Ok(Some((*c, *c))),
            [open, close] => Ok(Some((*open, *close))),
            _ => Err(MigrateError::Config(format!(
                "dialect.quote must be one or two characters, got '{}'",
                quote
            ))),
        }
    }

    pub fn build(&self) -> Result<GenericDialect> {
        let mut dialect = GenericDialect::new()
            .with_name(self.name.clone())
            .with_capabilities(self.capabilities.clone())
            .with_reserved_words(&self.reserved_words)
            .with_case_sensitivity(self.case_sensitivity);
        if let Some(clause) = &self.identity_clause {
            dialect = dialect.with_identity_clause(clause.clone());
        }
        if let Some(clause) = &self.cascade_constraints {
            dialect = dialect.with_cascade_constraints(clause.clone());
        }
        if let Some((open, close)) = self.quote_chars()? {
            dialect = dialect.with_quote(open, close);
        }
        let mut type_names = TypeNameMap::standard();
        for (name, template) in &self.type_names {
            let code = type_code_for_name(name).ok_or_else(|| {
                MigrateError::Config(format!(
                    "dialect.type_names: unknown type code name '{}'",
                    name
                ))
            })?;
            type_names.add_type_name(code, template.clone());
        }
        Ok(dialect.with_type_names(type_names))
    }
}
