//! Legacy "packaged" request shape and its expansion into flat items.
//!
//! Older clients post one entry per dataset carrying a shared date range
//! and base parameters, plus per-file-group lists of parameter variants.
//! Expansion takes the cartesian product of the variant lists and emits one
//! flat [`QueryItem`] per combination, so the resolver core never sees this
//! shape.

use crate::query::item::{DateRange, QueryItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagedItem {
    /// Shared inclusive date range inherited by every expanded item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<DateRange>,
    /// Shared base parameters; per-combination values override these.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    pub file_data: Vec<PackagedFileGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagedFileGroup {
    /// File-type tags shared by every combination of this group.
    pub files: Vec<String>,
    /// Parameter name to candidate values. Expansion enumerates the full
    /// cartesian product in lexicographic name order, the first name
    /// varying slowest.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub file_params: BTreeMap<String, Vec<String>>,
}

pub(crate) fn expand(items: Vec<PackagedItem>) -> Vec<QueryItem> {
    let mut flat = Vec::new();
    for item in items {
        for group in &item.file_data {
            for combination in combinations(&group.file_params) {
                let mut fields = item.params.clone();
                fields.extend(combination);
                flat.push(QueryItem::from_fields(
                    group.files.clone(),
                    item.dates.clone(),
                    fields,
                ));
            }
        }
    }
    flat
}

/// Full cartesian product of the variant lists, one map per combination.
pub(crate) fn combinations(
    variants: &BTreeMap<String, Vec<String>>,
) -> Vec<BTreeMap<String, String>> {
    fn recurse(remaining: &[(&String, &Vec<String>)]) -> Vec<BTreeMap<String, String>> {
        let Some(((name, values), rest)) = remaining.split_first() else {
            return vec![BTreeMap::new()];
        };
        let tails = recurse(rest);
        let mut product = Vec::with_capacity(values.len() * tails.len());
        for value in values.iter() {
            for tail in &tails {
                let mut combination = tail.clone();
                combination.insert((*name).clone(), value.clone());
                product.push(combination);
            }
        }
        product
    }

    let ordered: Vec<_> = variants.iter().collect();
    recurse(&ordered)
}
