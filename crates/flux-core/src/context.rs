//! Shared context passed between sections of one pipeline run.
//!
//! Earlier sections publish the dataset's structural lists (subjects,
//! tasks, ...) so later sections reuse them instead of re-querying.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{SectionError, SectionResult};

/// Keys a section may read from or write to the shared context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContextKey {
    Subjects,
    Sessions,
    Tasks,
    Datatypes,
}

impl ContextKey {
    pub const ALL: [ContextKey; 4] = [
        ContextKey::Subjects,
        ContextKey::Sessions,
        ContextKey::Tasks,
        ContextKey::Datatypes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContextKey::Subjects => "subjects",
            ContextKey::Sessions => "sessions",
            ContextKey::Tasks => "tasks",
            ContextKey::Datatypes => "datatypes",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed key/value store; every value is a sorted, de-duplicated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedContext {
    values: BTreeMap<ContextKey, Vec<String>>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `values` under `key`, replacing any previous value.
    pub fn set<I, S>(&mut self, key: ContextKey, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = values.into_iter().map(Into::into).collect();
        list.sort();
        list.dedup();
        self.values.insert(key, list);
    }

    pub fn get(&self, key: ContextKey) -> Option<&[String]> {
        self.values.get(&key).map(Vec::as_slice)
    }

    /// Like [`get`](Self::get), failing with `MissingContext` when unset.
    pub fn require(&self, key: ContextKey) -> SectionResult<&[String]> {
        self.get(key).ok_or(SectionError::MissingContext { key })
    }

    pub fn contains(&self, key: ContextKey) -> bool {
        self.values.contains_key(&key)
    }
}
