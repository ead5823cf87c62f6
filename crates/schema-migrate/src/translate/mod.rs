//! SQL fragment translation between dialects.
//!
//! A [`TranslationManager`] holds [`Translator`]s in priority order. The
//! first translator that supports a script and produces output wins; when
//! none does, the script passes through unchanged. Rules for a source/target
//! pair are usually registered as [`PatternTranslator`]s:
//!
//! ```rust,ignore
//! let mut manager = TranslationManager::new();
//! manager.add_translation(
//!     DatabaseInfo::new("MySQL"),
//!     "CURRENT_TIMESTAMP()",
//!     DatabaseInfo::new("Generic"),
//!     "CURRENT_TIMESTAMP",
//! );
//! let script = Script::new("CURRENT_TIMESTAMP()", DatabaseInfo::new("MySQL"));
//! assert_eq!(manager.translate(&script, &DatabaseInfo::new("Generic")), "CURRENT_TIMESTAMP");
//! ```
//!
//! The manager is configured once and read-only afterwards, so it can be
//! shared behind an `Arc` and used from several threads.

mod pattern;
mod priority;

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;

pub(crate) use pattern::compile as compile_expression;
pub use pattern::PatternTranslator;
pub use priority::{PriorityList, DEFAULT_PRIORITY};

/// Database product descriptor.
///
/// Used both for concrete databases and as a rule selector; in the latter
/// role absent version fields act as wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<i32>,
}

impl DatabaseInfo {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Default::default()
        }
    }

    pub fn with_product_version(mut self, version: impl Into<String>) -> Self {
        self.product_version = Some(version.into());
        self
    }

    pub fn with_version(mut self, major: i32, minor: i32) -> Self {
        self.major_version = Some(major);
        self.minor_version = Some(minor);
        self
    }

    /// Whether `other` is selected by this descriptor: product names equal
    /// ignoring case and every version field set here equal in `other`.
    pub fn matches(&self, other: &DatabaseInfo) -> bool {
        fn field<T: PartialEq>(selector: &Option<T>, value: &Option<T>) -> bool {
            selector.as_ref().map_or(true, |s| value.as_ref() == Some(s))
        }
        self.product_name.eq_ignore_ascii_case(&other.product_name)
            && field(&self.product_version, &other.product_version)
            && field(&self.major_version, &other.major_version)
            && field(&self.minor_version, &other.minor_version)
    }
}

impl fmt::Display for DatabaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.product_name)?;
        if let Some(version) = &self.product_version {
            write!(f, " {}", version)?;
        }
        match (self.major_version, self.minor_version) {
            (Some(major), Some(minor)) => write!(f, " ({}.{})", major, minor),
            (Some(major), None) => write!(f, " ({})", major),
            _ => Ok(()),
        }
    }
}

/// A SQL fragment together with the database it was written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub sql: String,
    pub source: DatabaseInfo,
}

impl Script {
    pub fn new(sql: impl Into<String>, source: DatabaseInfo) -> Self {
        Self {
            sql: sql.into(),
            source,
        }
    }
}

/// State available to a translator while translating one script.
pub struct TranslationContext<'a> {
    manager: &'a TranslationManager,
    target: &'a DatabaseInfo,
    attributes: HashMap<String, String>,
}

impl<'a> TranslationContext<'a> {
    pub fn new(manager: &'a TranslationManager, target: &'a DatabaseInfo) -> Self {
        Self {
            manager,
            target,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn target(&self) -> &DatabaseInfo {
        self.target
    }

    /// The manager, for translators that translate nested fragments.
    pub fn manager(&self) -> &TranslationManager {
        self.manager
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Rewrites scripts written for one database into another database's SQL.
pub trait Translator: Send + Sync {
    /// Whether this translator handles the script for the context's target.
    fn supports(&self, script: &Script, context: &TranslationContext<'_>) -> bool;

    /// Translated text, or `None` to defer to the next translator.
    fn translate(&self, script: &Script, context: &TranslationContext<'_>) -> Option<String>;
}

/// Priority-ordered collection of translators.
#[derive(Default)]
pub struct TranslationManager {
    translators: PriorityList<Box<dyn Translator>>,
}

impl fmt::Debug for TranslationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationManager")
            .field("translators", &self.translators.len())
            .finish()
    }
}

impl TranslationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_translator(&mut self, translator: Box<dyn Translator>) {
        self.translators.add(translator);
    }

    pub fn add_translator_with_priority(&mut self, translator: Box<dyn Translator>, priority: i32) {
        self.translators.add_with_priority(translator, priority);
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// Register an exact rule as its own translator.
    pub fn add_translation(
        &mut self,
        source: DatabaseInfo,
        from: impl Into<String>,
        target: DatabaseInfo,
        to: impl Into<String>,
    ) {
        let mut translator = PatternTranslator::new(source, target);
        translator.add_translation(from, to);
        self.add_translator(Box::new(translator));
    }

    /// Register several exact rules sharing one replacement.
    pub fn add_translations<I, S>(
        &mut self,
        source: DatabaseInfo,
        from: I,
        target: DatabaseInfo,
        to: impl Into<String>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut translator = PatternTranslator::new(source, target);
        translator.add_translations(from, to);
        self.add_translator(Box::new(translator));
    }

    /// Register a full-match regular expression rule.
    pub fn add_translation_regex(
        &mut self,
        source: DatabaseInfo,
        expression: &str,
        target: DatabaseInfo,
        to: impl Into<String>,
    ) -> Result<()> {
        let mut translator = PatternTranslator::new(source, target);
        translator.add_translation_regex(expression, to)?;
        self.add_translator(Box::new(translator));
        Ok(())
    }

    /// Register a capture-group pattern rule.
    pub fn add_translation_pattern(
        &mut self,
        source: DatabaseInfo,
        pattern: Regex,
        target: DatabaseInfo,
        to: impl Into<String>,
    ) {
        let mut translator = PatternTranslator::new(source, target);
        translator.add_translation_pattern(pattern, to);
        self.add_translator(Box::new(translator));
    }

    /// Output of the first translator that supports the script and
    /// produces a translation, if any.
    pub fn try_translate_with(
        &self,
        script: &Script,
        context: &TranslationContext<'_>,
    ) -> Option<String> {
        let translated = self
            .translators
            .iter()
            .filter(|t| t.supports(script, context))
            .find_map(|t| t.translate(script, context));
        if translated.is_none() {
            trace!(
                "No translation for {:?} from {} to {}",
                script.sql,
                script.source,
                context.target()
            );
        }
        translated
    }

    pub fn try_translate(&self, script: &Script, target: &DatabaseInfo) -> Option<String> {
        let context = TranslationContext::new(self, target);
        self.try_translate_with(script, &context)
    }

    /// Translate a script, returning it unchanged when nothing matches.
    pub fn translate(&self, script: &Script, target: &DatabaseInfo) -> String {
        self.try_translate(script, target)
            .unwrap_or_else(|| script.sql.clone())
    }
}
