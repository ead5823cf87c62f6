//! Configuration validation.

use super::{GeneratorConfig, RuleKind, RuleSource};
use crate::core::type_code::type_code_for_name;
use crate::error::{MigrateError, Result};
use crate::translate::compile_expression;

/// Validate the configuration.
pub fn validate(config: &GeneratorConfig) -> Result<()> {
    // Enumerated settings
    config.object_types()?;
    config.group_scripts_by()?;
    config.table_types()?;
    config.identifier_quoting()?;

    // Dialect profile
    if config.dialect.name.trim().is_empty() {
        return Err(MigrateError::Config("dialect.name is required".into()));
    }
    config.dialect.quote_chars()?;
    for type_name in config.dialect.type_names.keys() {
        if type_code_for_name(type_name).is_none() {
            return Err(MigrateError::Config(format!(
                "dialect.type_names: unknown type code name '{}'",
                type_name
            )));
        }
    }

    if let Some(source) = &config.source {
        if source.product_name().trim().is_empty() {
            return Err(MigrateError::Config("source product name is required".into()));
        }
    }

    for (i, rule) in config.translations.iter().enumerate() {
        if rule.source.product_name().trim().is_empty()
            || rule.target.product_name().trim().is_empty()
        {
            return Err(MigrateError::Config(format!(
                "translations[{}]: source and target are required",
                i
            )));
        }
        let kind: RuleKind = rule.kind.parse()?;
        let values = rule.from.values();
        if values.is_empty() {
            return Err(MigrateError::Config(format!(
                "translations[{}]: from must not be empty",
                i
            )));
        }
        match (kind, &rule.from) {
            (RuleKind::Exact, _) => {}
            (_, RuleSource::Many(_)) => {
                return Err(MigrateError::Config(format!(
                    "translations[{}]: a list of sources is only allowed for exact rules",
                    i
                )));
            }
            // Compile once here so bad expressions surface before generation
            (_, RuleSource::One(expr)) => {
                compile_expression(expr, expr)?;
            }
        }
    }

    Ok(())
}
