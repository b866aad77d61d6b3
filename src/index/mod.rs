//! Владелец текущего снимка spatial индекса.
//!
//! Снимок публикуется одним атомарным swap'ом указателя: читатели
//! берут его без блокировок и всегда видят либо целиком старый,
//! либо целиком новый снимок. Пересборки не требуют взаимного
//! исключения — побеждает та, что завершилась последней.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use arc_swap::ArcSwapOption;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{
    error::{ServiceError, ServiceResult},
    geo::GeoSnapshot,
    Storage,
};

/// Процессный владелец Current Index Reference.
///
/// `None` внутри — индекс ни разу не строился (not ready);
/// `Some` — готов, даже если снимок пуст (ноль записей — валидное
/// ready-состояние).
pub struct IndexManager {
    store: Arc<dyn Storage>,
    current: ArcSwapOption<GeoSnapshot>,
    generation: AtomicU64,
}

/// Наблюдаемое состояние индекса.
#[derive(Debug, Clone, Copy)]
pub struct IndexStats {
    pub ready: bool,
    pub generation: u64,
    pub records: usize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl IndexManager {
    /// Создаёт менеджер без построенного снимка.
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self {
            store,
            current: ArcSwapOption::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Пересборка: читает полный список записей из хранилища,
    /// строит новый снимок и атомарно публикует его как текущий.
    ///
    /// Читатели предыдущего снимка не блокируются. При ошибке
    /// выборки предыдущий снимок остаётся текущим, ошибка
    /// логируется и возвращается вызывающему. Возвращает число
    /// записей в опубликованном снимке.
    pub fn rebuild(&self) -> ServiceResult<usize> {
        let records = match self.store.fetch_all() {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "index rebuild failed: could not fetch records");
                return Err(ServiceError::IndexBuild(e.to_string()));
            }
        };

        let count = records.len();
        let snapshot = Arc::new(GeoSnapshot::build(records));
        self.current.store(Some(snapshot));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        info!(records = count, generation, "index rebuilt");
        Ok(count)
    }

    /// Запускает пересборку фоновой tokio-задачей. Завершение и
    /// ошибка логируются внутри задачи; handle возвращается, чтобы
    /// желающие могли дождаться результата.
    pub fn spawn_rebuild(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            match self.rebuild() {
                Ok(records) => debug!(records, "background index rebuild finished"),
                Err(e) => error!(error = %e, "background index rebuild failed"),
            }
        })
    }

    /// Возвращает последний опубликованный снимок. Никогда не ждёт
    /// идущую пересборку: отдаёт то, что опубликовано сейчас.
    pub fn current(&self) -> Option<Arc<GeoSnapshot>> {
        self.current.load_full()
    }

    /// Был ли индекс построен хотя бы раз.
    pub fn is_ready(&self) -> bool {
        self.generation.load(Ordering::Acquire) > 0
    }

    /// Номер поколения: сколько снимков было опубликовано.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Срез наблюдаемого состояния.
    pub fn stats(&self) -> IndexStats {
        let snapshot = self.current();
        IndexStats {
            ready: snapshot.is_some(),
            generation: self.generation(),
            records: snapshot.map(|s| s.len()).unwrap_or(0),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
