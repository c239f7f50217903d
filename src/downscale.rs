//! Candidate-check resolution for the downscaling datatypes.
//!
//! Downscaled products live in a flat per-datatype hierarchy with a small,
//! known set of file names, so instead of a date walk each candidate path
//! is probed directly and missing candidates are silently skipped.

use crate::query::item::QueryItem;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;

fn hierarchy_for(datatype: &str) -> Option<&'static [&'static str]> {
    match datatype {
        "downscaling_rainfall" => Some(&["dsm", "season", "period"]),
        "downscaling_temperature" => Some(&["dsm", "period"]),
        _ => None,
    }
}

// spelling matches the production tree
fn default_units(datatype: &str) -> &'static str {
    match datatype {
        "downscaling_rainfall" => "mm",
        _ => "celcius",
    }
}

fn field_value<'a>(item: &'a QueryItem, name: &str) -> Option<&'a str> {
    match name {
        "dsm" => item.dsm.as_deref(),
        "season" => item.season.as_deref(),
        "period" => item.period.as_deref(),
        _ => None,
    }
}

/// Resolves a downscaling item to the candidate paths that exist on disk.
/// Candidates the filesystem does not have are skipped, not errors.
pub(crate) async fn resolve_candidates(root: &Path, item: &QueryItem) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Some(datatype) = item.datatype.as_deref() else {
        return found;
    };
    let Some(hierarchy) = hierarchy_for(datatype) else {
        return found;
    };

    let mut values = vec![datatype.to_string()];
    for name in hierarchy {
        match field_value(item, name) {
            Some(value) => values.push(value.to_string()),
            None => {
                debug!("downscaling item missing '{}', no candidates", name);
                return found;
            }
        }
    }

    let units = item
        .units
        .as_deref()
        .unwrap_or_else(|| default_units(datatype));

    for tag in &item.files {
        let suffix = if tag == "data_map_change" {
            let Some(model) = item.model.as_deref() else {
                continue;
            };
            values.push(model.to_string());
            format!("change_{}.tif", units)
        } else if item.period.as_deref() != Some("present") {
            let Some(model) = item.model.as_deref() else {
                continue;
            };
            values.push(model.to_string());
            format!("prediction_{}.tif", units)
        } else {
            format!("{}.tif", units)
        };
        // The value list keeps accumulating across tags.
        let subdir: PathBuf = values.iter().collect();
        values.push(suffix);
        let file_name = values.join("_");
        let candidate = root.join(subdir).join(file_name);
        if fs::metadata(&candidate).await.is_ok() {
            found.push(candidate);
        }
    }
    found
}
