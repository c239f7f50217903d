pub mod error;
pub mod item;
pub mod packaged;

use crate::query::item::QueryItem;
use crate::query::packaged::PackagedItem;
use serde::{Deserialize, Serialize};

/// One resolve request body: either flat query items or the legacy packaged
/// shape. Which one applies is decided by the payload itself, the same way
/// the service has always sniffed the first element for packaged markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuerySet {
    Packaged(Vec<PackagedItem>),
    Flat(Vec<QueryItem>),
}

impl QuerySet {
    /// Normalizes to flat items, expanding packaged combinations. The
    /// resolver core only ever sees the flat shape.
    pub fn normalize(self) -> Vec<QueryItem> {
        match self {
            QuerySet::Packaged(items) => packaged::expand(items),
            QuerySet::Flat(items) => items,
        }
    }
}

impl From<Vec<QueryItem>> for QuerySet {
    fn from(items: Vec<QueryItem>) -> Self {
        QuerySet::Flat(items)
    }
}

impl From<Vec<PackagedItem>> for QuerySet {
    fn from(items: Vec<PackagedItem>) -> Self {
        QuerySet::Packaged(items)
    }
}
