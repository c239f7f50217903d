use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Query item carries no date range")]
    MissingRange,

    #[error("Unparseable date bound '{0}'")]
    InvalidDate(String),
}
