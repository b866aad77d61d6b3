use std::io;

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Ошибки слоя хранилища. Не затрагивают in-memory состояние
/// индекса: упавшая вставка или выборка не портит уже
/// опубликованный снимок.
#[derive(Error, Debug)]
pub enum StoreError {
    // ==== System / External ====
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // ==== General ====
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
