//! Recursive walk of the date-partitioned directory tree.
//!
//! Directories under a file-tag directory nest by calendar field, one field
//! per level in year..second order. The walk descends only into branches
//! whose accumulated calendar value stays inside the query bounds, checks
//! leaf files against their own stamp granularity, and reports whether a
//! whole subtree matched so the caller can collapse it to a single
//! directory path. Nothing below this point ever raises: unlistable
//! directories, unreadable entries and malformed names all degrade to
//! "empty, not collapsible".

use crate::walk::calendar::{truncate_to_depth, with_component};
use crate::walk::stamp::file_in_range;
use chrono::NaiveDateTime;
use futures_util::future::{join_all, ready, BoxFuture};
use futures_util::FutureExt;
use log::debug;
use std::path::PathBuf;
use tokio::fs;

/// Aggregate produced by walking one directory.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WalkOutcome {
    /// Matched paths in directory-listing order. After a collapse this is
    /// the directory itself rather than its files.
    pub(crate) paths: Vec<PathBuf>,
    /// True count of underlying matched files, unaffected by collapsing.
    pub(crate) num_files: usize,
    /// Whether every entry considered matched; a skipped or excluded entry
    /// anywhere in the subtree pins this to false.
    pub(crate) collapsible: bool,
}

impl WalkOutcome {
    fn empty() -> Self {
        WalkOutcome {
            paths: Vec::new(),
            num_files: 0,
            collapsible: false,
        }
    }

    fn file(path: PathBuf) -> Self {
        WalkOutcome {
            paths: vec![path],
            num_files: 1,
            collapsible: true,
        }
    }
}

/// Walks `dir` at `depth` in the granularity sequence. `date_so_far` is the
/// calendar value assembled from the path segments consumed on the way
/// down; `collapse` is the caller's original intent and is inherited
/// unchanged through the whole recursion.
///
/// Sibling entries resolve concurrently and their results are joined back
/// in listing order, so the concatenated path order matches what the
/// filesystem returned.
pub(crate) fn walk_dates(
    dir: PathBuf,
    start: NaiveDateTime,
    end: NaiveDateTime,
    collapse: bool,
    date_so_far: NaiveDateTime,
    depth: usize,
) -> BoxFuture<'static, WalkOutcome> {
    async move {
        let dir_start = truncate_to_depth(start, depth);
        let dir_end = truncate_to_depth(end, depth);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("cannot list {:?}: {}", dir, e);
                return WalkOutcome::empty();
            }
        };

        let mut can_collapse = true;
        let mut branches: Vec<BoxFuture<'static, WalkOutcome>> = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    debug!("listing of {:?} failed midway: {}", dir, e);
                    can_collapse = false;
                    break;
                }
            };
            let name = entry.file_name();
            let subpath = dir.join(&name);
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(_) => {
                    can_collapse = false;
                    continue;
                }
            };

            if file_type.is_file() {
                if file_in_range(&name.to_string_lossy(), start, end) {
                    branches.push(ready(WalkOutcome::file(subpath)).boxed());
                } else {
                    can_collapse = false;
                }
            } else if file_type.is_dir() {
                // The directory name is the numeric value of the calendar
                // field at this depth; anything else is skipped.
                let component = name.to_string_lossy().parse::<u32>().ok();
                match component.and_then(|value| with_component(date_so_far, depth, value)) {
                    Some(sub_date) if sub_date >= dir_start && sub_date <= dir_end => {
                        branches.push(walk_dates(
                            subpath,
                            start,
                            end,
                            collapse,
                            sub_date,
                            depth + 1,
                        ));
                    }
                    _ => can_collapse = false,
                }
            } else {
                // Symlinks and special files are unsupported.
                can_collapse = false;
            }
        }

        let mut aggregate = WalkOutcome {
            paths: Vec::new(),
            num_files: 0,
            collapsible: can_collapse,
        };
        for branch in join_all(branches).await {
            aggregate.paths.extend(branch.paths);
            aggregate.num_files += branch.num_files;
            aggregate.collapsible &= branch.collapsible;
        }
        if collapse && aggregate.collapsible {
            aggregate.paths = vec![dir];
        }
        aggregate
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::path::Path;
    use tempfile::TempDir;

    fn dt(y: i32, mo: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn origin() -> NaiveDateTime {
        crate::walk::calendar::epoch_placeholder()
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::File::create(path).unwrap();
    }

    fn path_set(outcome: &WalkOutcome) -> HashSet<PathBuf> {
        outcome.paths.iter().cloned().collect()
    }

    /// Two months of month-stamped files under year/month directories.
    fn two_month_tree() -> TempDir {
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2010/01/map_2010_01.tif"));
        touch(&tree.path().join("2010/02/map_2010_02.tif"));
        tree
    }

    #[tokio::test]
    async fn missing_root_resolves_empty() {
        let outcome = walk_dates(
            PathBuf::from("/nonexistent/climafs/root"),
            dt(2010, 1, 1),
            dt(2010, 12, 31),
            true,
            origin(),
            0,
        )
        .await;
        assert_eq!(outcome, WalkOutcome::empty());
    }

    #[tokio::test]
    async fn fully_matched_tree_collapses_to_root() {
        let tree = two_month_tree();
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 2, 28),
            true,
            origin(),
            0,
        )
        .await;
        assert_eq!(outcome.paths, vec![tree.path().to_path_buf()]);
        assert_eq!(outcome.num_files, 2);
        assert!(outcome.collapsible);
    }

    #[tokio::test]
    async fn collapse_off_enumerates_every_file_with_same_count() {
        let tree = two_month_tree();
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 2, 28),
            false,
            origin(),
            0,
        )
        .await;
        assert_eq!(outcome.num_files, 2);
        assert_eq!(
            path_set(&outcome),
            HashSet::from([
                tree.path().join("2010/01/map_2010_01.tif"),
                tree.path().join("2010/02/map_2010_02.tif"),
            ])
        );
    }

    #[tokio::test]
    async fn range_excludes_files_one_unit_outside() {
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2009/12/map_2009_12.tif"));
        touch(&tree.path().join("2010/01/map_2010_01.tif"));
        touch(&tree.path().join("2010/03/map_2010_03.tif"));
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 2, 28),
            false,
            origin(),
            0,
        )
        .await;
        assert_eq!(outcome.num_files, 1);
        assert_eq!(
            outcome.paths,
            vec![tree.path().join("2010/01/map_2010_01.tif")]
        );
    }

    #[tokio::test]
    async fn out_of_range_sibling_blocks_collapse() {
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2010/01/map_2010_01.tif"));
        touch(&tree.path().join("2010/01/late_2010_03.tif"));
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 2, 28),
            true,
            origin(),
            0,
        )
        .await;
        assert!(!outcome.collapsible);
        assert_eq!(outcome.num_files, 1);
        assert_eq!(
            outcome.paths,
            vec![tree.path().join("2010/01/map_2010_01.tif")]
        );
    }

    #[tokio::test]
    async fn unparseable_file_name_blocks_collapse() {
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2010/01/map_2010_01.tif"));
        touch(&tree.path().join("2010/01/README.md"));
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 12, 31),
            true,
            origin(),
            0,
        )
        .await;
        assert!(!outcome.collapsible);
        assert_eq!(outcome.num_files, 1);
        assert_eq!(
            outcome.paths,
            vec![tree.path().join("2010/01/map_2010_01.tif")]
        );
    }

    #[tokio::test]
    async fn non_numeric_directory_is_skipped_and_blocks_collapse() {
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2010/01/map_2010_01.tif"));
        touch(&tree.path().join("archive/map_2010_01.tif"));
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 12, 31),
            true,
            origin(),
            0,
        )
        .await;
        // The fully matched 2010 subtree still collapses on its own; the
        // skipped directory only prevents collapsing the root above it.
        assert!(!outcome.collapsible);
        assert_eq!(outcome.num_files, 1);
        assert_eq!(outcome.paths, vec![tree.path().join("2010")]);
    }

    #[tokio::test]
    async fn out_of_range_directory_is_not_descended() {
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2009/12/map_2009_12.tif"));
        touch(&tree.path().join("2010/01/map_2010_01.tif"));
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 12, 31),
            true,
            origin(),
            0,
        )
        .await;
        assert!(!outcome.collapsible);
        assert_eq!(outcome.paths, vec![tree.path().join("2010")]);
    }

    #[tokio::test]
    async fn empty_directory_still_collapses_with_zero_files() {
        let tree = TempDir::new().unwrap();
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 12, 31),
            true,
            origin(),
            0,
        )
        .await;
        assert_eq!(outcome.paths, vec![tree.path().to_path_buf()]);
        assert_eq!(outcome.num_files, 0);
    }

    #[tokio::test]
    async fn inner_subtree_collapses_while_outer_does_not() {
        // January matches fully and collapses to its month directory; the
        // out-of-range March file keeps every enclosing level expanded.
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2010/01/map_2010_01_01.tif"));
        touch(&tree.path().join("2010/01/map_2010_01_02.tif"));
        touch(&tree.path().join("2010/03/map_2010_03_01.tif"));
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 1),
            dt(2010, 2, 28),
            true,
            origin(),
            0,
        )
        .await;
        assert_eq!(outcome.paths, vec![tree.path().join("2010/01")]);
        assert_eq!(outcome.num_files, 2);
        assert!(!outcome.collapsible);
    }

    #[tokio::test]
    async fn files_deeper_than_their_stamp_use_stamp_granularity() {
        // A day-stamped file sitting at month depth is still judged against
        // day-truncated bounds.
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2010/01/daily_2010_01_15.tif"));
        let outcome = walk_dates(
            tree.path().to_path_buf(),
            dt(2010, 1, 10),
            dt(2010, 1, 20),
            false,
            origin(),
            0,
        )
        .await;
        assert_eq!(outcome.num_files, 1);
    }

    #[tokio::test]
    async fn hour_level_partitions_resolve() {
        let tree = TempDir::new().unwrap();
        touch(&tree.path().join("2010/01/02/03/obs_2010_01_02_03.csv"));
        touch(&tree.path().join("2010/01/02/07/obs_2010_01_02_07.csv"));
        let start = NaiveDate::from_ymd_opt(2010, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2010, 1, 2)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        let outcome = walk_dates(tree.path().to_path_buf(), start, end, false, origin(), 0).await;
        assert_eq!(outcome.num_files, 1);
        assert_eq!(
            outcome.paths,
            vec![tree.path().join("2010/01/02/03/obs_2010_01_02_03.csv")]
        );
    }
}
