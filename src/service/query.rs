use std::{cmp::Ordering, sync::Arc};

use serde::Serialize;

use crate::{
    error::{ServiceError, ServiceResult},
    geo::{haversine_km, validate_coords, GeoPoint, Location},
    index::IndexManager,
};

/// Количество результатов по умолчанию, если лимит не задан.
pub const DEFAULT_LIMIT: usize = 5;

/// Сервис запросов «кто рядом».
///
/// Кандидатов отбирает и упорядочивает снимок spatial индекса по
/// своей planar метрике; наружу уходит только точное расстояние по
/// большому кругу, пересчитанное здесь, с финальной сортировкой по
/// нему.
pub struct QueryService {
    index: Arc<IndexManager>,
}

/// Результат запроса: запись плюс точное расстояние в километрах.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyLocation {
    #[serde(flatten)]
    pub location: Location,
    pub distance_km: f64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl QueryService {
    pub fn new(index: Arc<IndexManager>) -> Self {
        Self { index }
    }

    /// Возвращает до `limit` ближайших записей к точке (lat, lon),
    /// по возрастанию точного расстояния.
    ///
    /// Политика лимита: `None` или 0 означают значение по
    /// умолчанию (5). Политика готовности: если индекс ни разу не
    /// строился, запрос отклоняется с `IndexNotReady` — владелец
    /// процесса делает первую сборку на старте, поэтому состояние
    /// переходное.
    pub fn find_nearby(
        &self,
        lat: f64,
        lon: f64,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<NearbyLocation>> {
        if !validate_coords(lon, lat) {
            return Err(ServiceError::InvalidArgument(format!(
                "lat/lon out of range: lat={lat}, lon={lon}"
            )));
        }

        let k = match limit {
            Some(0) | None => DEFAULT_LIMIT,
            Some(k) => k,
        };

        let snapshot = self.index.current().ok_or(ServiceError::IndexNotReady)?;

        let target = GeoPoint { lon, lat };
        let mut results: Vec<NearbyLocation> = snapshot
            .query_nearest(target, k)
            .into_iter()
            .map(|location| NearbyLocation {
                distance_km: haversine_km(target, location.point),
                location: location.clone(),
            })
            .collect();

        // Planar порядок индекса может разойтись с большим кругом на
        // границе; сортировка стабильна, ничьи сохраняют порядок снимка
        results.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        });

        Ok(results)
    }

    /// Строковый фронт для слоя HTTP: парсит query-параметры и
    /// делегирует в [`find_nearby`](Self::find_nearby).
    ///
    /// Непарсящиеся lat/lon — ошибка клиента; непарсящийся или
    /// неположительный limit трактуется как значение по умолчанию.
    pub fn find_nearby_raw(
        &self,
        lat: &str,
        lon: &str,
        limit: Option<&str>,
    ) -> ServiceResult<Vec<NearbyLocation>> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| ServiceError::InvalidArgument(format!("invalid lat parameter: {lat:?}")))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| ServiceError::InvalidArgument(format!("invalid lon parameter: {lon:?}")))?;

        let limit = limit
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|k| *k > 0)
            .map(|k| k as usize);

        self.find_nearby(lat, lon, limit)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryStore, Storage};

    fn service_with(records: &[(&str, f64, f64)]) -> QueryService {
        let store = Arc::new(InMemoryStore::new());
        for (name, lon, lat) in records {
            store
                .insert(
                    name,
                    GeoPoint {
                        lon: *lon,
                        lat: *lat,
                    },
                )
                .unwrap();
        }
        let index = Arc::new(IndexManager::new(store));
        index.rebuild().unwrap();
        QueryService::new(index)
    }

    #[test]
    fn test_rejects_out_of_range_coords() {
        let service = service_with(&[]);
        match service.find_nearby(100.0, 0.0, None) {
            Err(ServiceError::InvalidArgument(_)) => {}
            other => panic!("unexpected: {:?}", other),
        }
        match service.find_nearby(f64::NAN, 0.0, None) {
            Err(ServiceError::InvalidArgument(_)) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_not_ready_is_rejected() {
        let index = Arc::new(IndexManager::new(Arc::new(InMemoryStore::new())));
        let service = QueryService::new(index);

        match service.find_nearby(0.0, 0.0, None) {
            Err(ServiceError::IndexNotReady) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_empty_but_ready_returns_empty() {
        let service = service_with(&[]);
        let results = service.find_nearby(0.0, 0.0, None).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_default_limit_applies() {
        let records: Vec<(String, f64, f64)> = (0..8)
            .map(|i| (format!("L{}", i), i as f64 * 0.1, 0.0))
            .collect();
        let refs: Vec<(&str, f64, f64)> = records
            .iter()
            .map(|(n, lon, lat)| (n.as_str(), *lon, *lat))
            .collect();
        let service = service_with(&refs);

        assert_eq!(service.find_nearby(0.0, 0.0, None).unwrap().len(), 5);
        // 0 трактуется как default
        assert_eq!(service.find_nearby(0.0, 0.0, Some(0)).unwrap().len(), 5);
        assert_eq!(service.find_nearby(0.0, 0.0, Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_exact_distance_resort() {
        let service = service_with(&[("B", 0.0, 1.0), ("A", 0.5, 0.0)]);
        let results = service.find_nearby(0.0, 0.0, Some(2)).unwrap();

        // A ближе по большому кругу
        assert_eq!(results[0].location.name, "A");
        assert!(results[0].distance_km < results[1].distance_km);
    }

    #[test]
    fn test_raw_parsing() {
        let service = service_with(&[("A", 0.0, 0.0)]);

        match service.find_nearby_raw("not-a-number", "-73.0", Some("5")) {
            Err(ServiceError::InvalidArgument(_)) => {}
            other => panic!("unexpected: {:?}", other),
        }

        // Непарсящийся и неположительный limit падают в default
        assert_eq!(
            service.find_nearby_raw("0.0", "0.0", Some("abc")).unwrap().len(),
            1
        );
        assert_eq!(
            service.find_nearby_raw("0.0", "0.0", Some("-3")).unwrap().len(),
            1
        );
        assert_eq!(service.find_nearby_raw("0.0", "0.0", None).unwrap().len(), 1);
    }

    #[test]
    fn test_nearby_json_shape() {
        let service = service_with(&[("Pizza Place", -73.0, 40.0)]);
        let results = service.find_nearby(40.0, -73.0, Some(1)).unwrap();
        let json = serde_json::to_value(&results[0]).unwrap();

        assert_eq!(json["name"], "Pizza Place");
        assert_eq!(json["lon"], -73.0);
        assert_eq!(json["lat"], 40.0);
        assert!(json["distance_km"].as_f64().unwrap() < 0.001);
    }
}
