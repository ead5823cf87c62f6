//! Rule-based translator for one (source, target) dialect pair.
//!
//! Three kinds of rules are supported:
//!
//! - **exact**: the script must equal the rule text (case-sensitive)
//! - **regex**: the whole script must match the expression
//! - **pattern**: every match of the expression in the script is replaced,
//!   with captured groups substituted into the replacement (`$1`,
//!   `${name}`); text around the matches is kept
//!
//! Rules are tried in registration order; the first match wins.

use regex::Regex;
use tracing::trace;

use crate::error::{MigrateError, Result};

use super::{DatabaseInfo, Script, TranslationContext, Translator};

#[derive(Debug, Clone)]
enum Rule {
    Exact { from: String, to: String },
    Regex { regex: Regex, to: String },
    Pattern { regex: Regex, to: String },
}

impl Rule {
    fn apply(&self, sql: &str) -> Option<String> {
        match self {
            Rule::Exact { from, to } => (from == sql).then(|| to.clone()),
            Rule::Regex { regex, to } => regex.is_match(sql).then(|| to.clone()),
            // Text outside the matches is kept as is
            Rule::Pattern { regex, to } => regex
                .is_match(sql)
                .then(|| regex.replace_all(sql, to.as_str()).into_owned()),
        }
    }
}

/// Translator holding pattern rules for a single source/target pair.
#[derive(Debug, Clone)]
pub struct PatternTranslator {
    source: DatabaseInfo,
    target: DatabaseInfo,
    rules: Vec<Rule>,
}

impl PatternTranslator {
    pub fn new(source: DatabaseInfo, target: DatabaseInfo) -> Self {
        Self {
            source,
            target,
            rules: Vec::new(),
        }
    }

    pub fn source(&self) -> &DatabaseInfo {
        &self.source
    }

    pub fn target(&self) -> &DatabaseInfo {
        &self.target
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Translate a script that equals `from` exactly.
    pub fn add_translation(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.rules.push(Rule::Exact {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Translate each of `from` exactly to the same `to`.
    pub fn add_translations<I, S>(&mut self, from: I, to: impl Into<String>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let to = to.into();
        for f in from {
            self.add_translation(f, to.clone());
        }
        self
    }

    /// Translate a script fully matching `expression`.
    pub fn add_translation_regex(
        &mut self,
        expression: &str,
        to: impl Into<String>,
    ) -> Result<&mut Self> {
        let regex = compile(&format!("^(?:{})$", expression), expression)?;
        self.rules.push(Rule::Regex {
            regex,
            to: to.into(),
        });
        Ok(self)
    }

    /// Translate with a compiled pattern, expanding capture groups into `to`.
    pub fn add_translation_pattern(&mut self, pattern: Regex, to: impl Into<String>) -> &mut Self {
        self.rules.push(Rule::Pattern {
            regex: pattern,
            to: to.into(),
        });
        self
    }
}

/// Compile an expression, reporting `original` in the error.
pub(crate) fn compile(expression: &str, original: &str) -> Result<Regex> {
    Regex::new(expression).map_err(|e| {
        MigrateError::Config(format!(
            "Invalid translation expression '{}': {}",
            original, e
        ))
    })
}

impl Translator for PatternTranslator {
    fn supports(&self, script: &Script, context: &TranslationContext<'_>) -> bool {
        self.source.matches(&script.source) && self.target.matches(context.target())
    }

    fn translate(&self, script: &Script, _context: &TranslationContext<'_>) -> Option<String> {
        let translated = self.rules.iter().find_map(|rule| rule.apply(&script.sql));
        if translated.is_some() {
            trace!(
                "Translated {:?} from {} to {}",
                script.sql,
                self.source,
                self.target
            );
        }
        translated
    }
}
