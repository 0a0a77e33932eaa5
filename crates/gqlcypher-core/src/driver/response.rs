use crate::stmt::Value;

use indexmap::IndexMap;

/// A returned row, keyed by column name.
pub type Record = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub records: Vec<Record>,
    pub summary: Summary,
}

/// Statistics the database reports after running a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub counters: Counters,

    /// Causal-consistency bookmark of the committed transaction
    pub bookmark: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
    pub properties_set: u64,
}

impl Response {
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Response {
        Response {
            records: records.into_iter().collect(),
            summary: Summary::default(),
        }
    }

    pub fn with_counters(mut self, counters: Counters) -> Response {
        self.summary.counters = counters;
        self
    }

    /// Values of `column` across every record. Records without the column
    /// are skipped.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records.iter().filter_map(move |record| record.get(column))
    }
}
