//! Main entry point for resolving query items against a production tree.
//!
//! A [`PathResolver`] wraps the root directory of a date-partitioned data
//! tree and turns abstract query items into concrete file paths: hierarchy
//! fields select a directory prefix, file-type tags select subtrees, and a
//! date range bounds the walk below them. Downscaling items bypass the walk
//! and probe a fixed set of candidate paths instead.

use crate::config::FilesConfig;
use crate::downscale;
use crate::empty_index;
use crate::query::error::QueryError;
use crate::query::item::QueryItem;
use crate::query::QuerySet;
use crate::walk::calendar::epoch_placeholder;
use crate::walk::date_walk::walk_dates;
use bon::bon;
use chrono::NaiveDateTime;
use log::warn;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of one multi-item resolution.
///
/// `paths` accumulates in input-item order, then directory-walk order
/// within an item, and is never deduplicated. `num_files` counts the
/// underlying files actually matched; a collapsed subtree keeps its full
/// file count while contributing a single directory path, so the two
/// lengths routinely differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub paths: Vec<PathBuf>,
    pub num_files: usize,
    /// True when an unexpected error aborted the remaining items and the
    /// result holds only what had accumulated up to that point. Callers
    /// treat such a result as possibly incomplete, not as a failure; the
    /// flag exists so they can tell the difference from "zero matches".
    #[serde(skip)]
    pub truncated: bool,
}

/// Resolves abstract climate-data queries to file paths under one root.
///
/// The resolver holds no state across calls; every resolution walks the
/// filesystem fresh.
///
/// # Examples
///
/// ```
/// use climafs::{DateRange, PathResolver, QueryItem};
///
/// # async fn run() {
/// let resolver = PathResolver::new("/data/production");
/// let item = QueryItem::builder()
///     .datatype("rainfall")
///     .production("new")
///     .aggregation("avg")
///     .period("month")
///     .extent("statewide")
///     .fill("raw")
///     .files(vec!["data_map".to_string()])
///     .range(DateRange::new("2010-01-01", "2010-02-28"))
///     .build();
///
/// let resolution = resolver.resolve().items(vec![item]).call().await;
/// println!("{} files matched", resolution.num_files);
/// # }
/// ```
pub struct PathResolver {
    root: PathBuf,
}

#[bon]
impl PathResolver {
    /// Creates a resolver over the given production tree root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PathResolver { root: root.into() }
    }

    /// Creates a resolver over the production root named by a service
    /// configuration.
    pub fn from_config(config: &FilesConfig) -> Self {
        PathResolver::new(config.production_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a set of query items to matching paths and a file count.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.items(...)`: **Required.** The query items, either a flat
    ///   `Vec<QueryItem>` or the legacy packaged shape; both convert into a
    ///   [`QuerySet`].
    /// * `.collapse(bool)`: Optional. When `true` (the default), a subtree
    ///   whose every file matched is reported as its directory path alone,
    ///   shrinking huge result sets while `num_files` keeps the true count.
    /// * `.origin(NaiveDateTime)`: Optional. The calendar value directory
    ///   components are substituted into as the walk descends. Defaults to
    ///   `0000-01-01T00:00:00`.
    ///
    /// # Returns
    ///
    /// A [`Resolution`]; never an error. Items resolve in input order and
    /// their results concatenate. A malformed item (missing or unparseable
    /// date range) stops processing of the remaining items and returns
    /// whatever accumulated, with [`Resolution::truncated`] set.
    #[builder]
    pub async fn resolve(
        &self,
        #[builder(into)] items: QuerySet,
        collapse: Option<bool>,
        origin: Option<NaiveDateTime>,
    ) -> Resolution {
        let collapse = collapse.unwrap_or(true);
        let origin = origin.unwrap_or_else(epoch_placeholder);

        let mut resolution = Resolution {
            paths: Vec::new(),
            num_files: 0,
            truncated: false,
        };
        for item in items.normalize() {
            match self.resolve_item(&item, collapse, origin).await {
                Ok((paths, num_files)) => {
                    resolution.paths.extend(paths);
                    resolution.num_files += num_files;
                }
                Err(e) => {
                    warn!("aborting remaining query items: {}", e);
                    resolution.truncated = true;
                    break;
                }
            }
        }
        resolution
    }

    /// Resolves the placeholder raster for an extent, for callers that need
    /// a "no data" raster when a query comes back empty.
    pub fn empty_raster(&self, extent: &str) -> Option<PathBuf> {
        empty_index::empty_raster(&self.root, extent)
    }

    async fn resolve_item(
        &self,
        item: &QueryItem,
        collapse: bool,
        origin: NaiveDateTime,
    ) -> Result<(Vec<PathBuf>, usize), QueryError> {
        if item.is_downscaling() {
            let paths = downscale::resolve_candidates(&self.root, item).await;
            let num_files = paths.len();
            return Ok((paths, num_files));
        }

        let range = item.range.as_ref().ok_or(QueryError::MissingRange)?;
        let (start, end) = range.bounds()?;
        let base = item.base_dir(&self.root);

        let mut paths = Vec::new();
        let mut num_files = 0;
        for tag in &item.files {
            let outcome = walk_dates(base.join(tag), start, end, collapse, origin, 0).await;
            num_files += outcome.num_files;
            paths.extend(outcome.paths);
        }
        Ok((paths, num_files))
    }
}
