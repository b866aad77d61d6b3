use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::warn;

use crate::{
    error::{ServiceError, ServiceResult},
    geo::{validate_coords, GeoPoint, Location},
    index::IndexManager,
    Storage,
};

/// Сервис приёма новых записей.
///
/// Хранилище является источником истины: запись считается принятой
/// сразу после успешной вставки. Пересборка индекса запускается
/// следом, но её падение не откатывает и не фейлит приём: индекс
/// это производная структура ускорения, best-effort.
pub struct IngestionService {
    store: Arc<dyn Storage>,
    index: Arc<IndexManager>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl IngestionService {
    pub fn new(
        store: Arc<dyn Storage>,
        index: Arc<IndexManager>,
    ) -> Self {
        Self { store, index }
    }

    /// Валидирует, сохраняет запись (хранилище назначает id) и
    /// инициирует пересборку индекса.
    ///
    /// Ответ вставки никогда не ждёт завершения пересборки: внутри
    /// tokio-рантайма она уходит фоновой задачей, вне его —
    /// выполняется на месте, но её ошибка только логируется.
    pub fn add_location(
        &self,
        name: &str,
        lat: f64,
        lon: f64,
    ) -> ServiceResult<Location> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "name must not be empty".into(),
            ));
        }
        if !validate_coords(lon, lat) {
            return Err(ServiceError::InvalidArgument(format!(
                "lat/lon out of range: lat={lat}, lon={lon}"
            )));
        }

        let location = self.store.insert(name, GeoPoint { lon, lat })?;

        match Handle::try_current() {
            Ok(_) => {
                Arc::clone(&self.index).spawn_rebuild();
            }
            Err(_) => {
                if let Err(e) = self.index.rebuild() {
                    warn!(
                        error = %e,
                        id = location.id,
                        "rebuild after insert failed; record is stored, index is stale"
                    );
                }
            }
        }

        Ok(location)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
