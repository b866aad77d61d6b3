use thiserror::Error;

use crate::error::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Таксономия ошибок сервисного слоя.
///
/// Разделение важно для вызывающей стороны: `InvalidArgument` это
/// ошибка клиента и не ретраится; `IndexNotReady` значит «попробуйте
/// чуть позже», индекс ещё ни разу не построен; `IndexBuild` значит
/// что пересборка упала и предыдущий снимок остаётся текущим;
/// `Store`: хранилище недоступно или запрос к нему упал.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Spatial index has not been built yet")]
    IndexNotReady,

    #[error("Index rebuild failed: {0}")]
    IndexBuild(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ServiceError {
    /// HTTP-статус для внешнего слоя маршрутизации. Сам HTTP
    /// здесь не живёт, но маппинг ошибок входит в контракт.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidArgument(_) => 400,
            ServiceError::IndexNotReady => 503,
            ServiceError::IndexBuild(_) => 500,
            ServiceError::Store(_) => 500,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
