use super::model::isbn::Isbn;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("book not found: {0}")]
    NotFound(Isbn),

    #[error("book with isbn {0} already exists")]
    Conflict(Isbn),
}
