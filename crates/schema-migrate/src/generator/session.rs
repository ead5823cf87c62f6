//! Per-call scratch state for script generation.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::trace;

use crate::core::{CaseSensitivity, ForeignKey, Identifier, QualifiedName, Table};

/// State owned by one generation call: tables created so far, foreign keys
/// waiting for their primary table, unique indexes already inlined into
/// `CREATE TABLE`, and the statements produced.
///
/// Table names are compared under the dialect's case sensitivity.
pub(crate) struct GenerationSession<'a> {
    case: CaseSensitivity,
    tables: HashMap<QualifiedName, &'a Table>,
    created: HashSet<QualifiedName>,
    deferred: IndexMap<QualifiedName, Vec<&'a ForeignKey>>,
    consumed_indexes: HashSet<(QualifiedName, usize)>,
    scripts: Vec<String>,
}

impl<'a> GenerationSession<'a> {
    pub fn new(tables: &'a [Table], case: CaseSensitivity) -> Self {
        let mut session = Self {
            case,
            tables: HashMap::with_capacity(tables.len()),
            created: HashSet::new(),
            deferred: IndexMap::new(),
            consumed_indexes: HashSet::new(),
            scripts: Vec::new(),
        };
        for table in tables {
            let key = session.key(&table.name);
            session.tables.insert(key, table);
        }
        session
    }

    fn key(&self, name: &QualifiedName) -> QualifiedName {
        match self.case {
            CaseSensitivity::Sensitive => name.clone(),
            CaseSensitivity::Insensitive => {
                let fold = |id: &Identifier| Identifier::from(id.as_str().to_ascii_lowercase());
                QualifiedName {
                    catalog: name.catalog.as_ref().map(fold),
                    schema: name.schema.as_ref().map(fold),
                    name: fold(&name.name),
                }
            }
        }
    }

    /// A table from the generation input, looked up by name.
    pub fn table(&self, name: &QualifiedName) -> Option<&'a Table> {
        self.tables.get(&self.key(name)).copied()
    }

    pub fn mark_created(&mut self, name: &QualifiedName) {
        let key = self.key(name);
        self.created.insert(key);
    }

    pub fn is_created(&self, name: &QualifiedName) -> bool {
        self.created.contains(&self.key(name))
    }

    /// Hold a foreign key until its primary table is created.
    pub fn defer(&mut self, foreign_key: &'a ForeignKey) {
        trace!(
            "Deferring foreign key on {} until {} is created",
            foreign_key.foreign_table,
            foreign_key.primary_table
        );
        let key = self.key(&foreign_key.primary_table);
        self.deferred.entry(key).or_default().push(foreign_key);
    }

    /// Remove and return deferred foreign keys whose primary table now
    /// exists, or all of them when `force` is set.
    pub fn take_deferred(&mut self, force: bool) -> Vec<&'a ForeignKey> {
        let mut ready = Vec::new();
        let created = &self.created;
        self.deferred.retain(|primary, keys| {
            if force || created.contains(primary) {
                ready.append(keys);
                false
            } else {
                true
            }
        });
        if !ready.is_empty() {
            trace!("Flushing {} deferred foreign keys (force={})", ready.len(), force);
        }
        ready
    }

    pub fn deferred_count(&self) -> usize {
        self.deferred.values().map(Vec::len).sum()
    }

    /// Record that the index at `position` on `table` was rendered inline.
    pub fn consume_index(&mut self, table: &QualifiedName, position: usize) {
        let key = self.key(table);
        self.consumed_indexes.insert((key, position));
    }

    pub fn is_consumed(&self, table: &QualifiedName, position: usize) -> bool {
        self.consumed_indexes
            .contains(&(self.key(table), position))
    }

    pub fn push(&mut self, script: String) {
        self.scripts.push(script);
    }

    pub fn extend(&mut self, scripts: impl IntoIterator<Item = String>) {
        self.scripts.extend(scripts);
    }

    pub fn into_scripts(self) -> Vec<String> {
        self.scripts
    }
}
