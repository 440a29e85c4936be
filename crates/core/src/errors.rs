use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown role `{value}` (expected user|admin)")]
    InvalidRole { value: String },
}
