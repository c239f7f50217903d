mod config;
mod downscale;
mod empty_index;
mod error;
mod query;
mod resolver;
mod walk;

pub use config::{ConfigError, FilesConfig};
pub use error::ClimafsError;
pub use query::error::QueryError;
pub use query::item::{DateRange, QueryItem};
pub use query::packaged::{PackagedFileGroup, PackagedItem};
pub use query::QuerySet;
pub use resolver::{PathResolver, Resolution};
pub use walk::stamp::DATE_STAMP_PATTERN;
