use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("entity name must not be blank")]
    BlankName,
    #[error("sub-organization {0:?} requires a parent id")]
    MissingParent(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
