//! Placeholder rasters handed out when a query matches nothing.

use std::path::{Path, PathBuf};

const EMPTY_INDEX: &[(&str, &str)] = &[("statewide", "empty/statewide_hi_NA.tif")];

/// Resolves the empty raster for an extent under `root`, if one exists.
pub(crate) fn empty_raster(root: &Path, extent: &str) -> Option<PathBuf> {
    EMPTY_INDEX
        .iter()
        .find(|(known, _)| *known == extent)
        .map(|(_, relative)| root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extent_resolves_under_root() {
        assert_eq!(
            empty_raster(Path::new("/data"), "statewide"),
            Some(PathBuf::from("/data/empty/statewide_hi_NA.tif"))
        );
    }

    #[test]
    fn unknown_extent_has_no_placeholder() {
        assert_eq!(empty_raster(Path::new("/data"), "bi"), None);
    }
}
