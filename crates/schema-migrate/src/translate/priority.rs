//! A list kept ordered by descending priority.

/// Default priority for entries added without one.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Ordered collection where higher priorities come first and entries with
/// equal priority keep their insertion order.
#[derive(Debug, Clone)]
pub struct PriorityList<T> {
    entries: Vec<(i32, T)>,
}

impl<T> Default for PriorityList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> PriorityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item with [`DEFAULT_PRIORITY`].
    pub fn add(&mut self, item: T) {
        self.add_with_priority(item, DEFAULT_PRIORITY);
    }

    /// Add an item after every entry whose priority is at least `priority`.
    pub fn add_with_priority(&mut self, item: T, priority: i32) {
        let at = self
            .entries
            .iter()
            .position(|(p, _)| *p < priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, (priority, item));
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, item)| item)
    }

    /// Items together with their priorities, in order.
    pub fn iter_with_priority(&self) -> impl Iterator<Item = (i32, &T)> {
        self.entries.iter().map(|(p, item)| (*p, item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
