use crate::config::ConfigError;
use crate::query::error::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimafsError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
