use serde::{Deserialize, Serialize};

/// Географическая точка (долгота и широта) в градусах.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

/// Запись каталога: идентификатор, имя и координаты.
///
/// `id` назначает хранилище при вставке, после этого запись
/// не меняется. Имя не обязано быть уникальным — уникален
/// только идентификатор.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Location {
    /// Создаёт запись из готовых полей.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        lon: f64,
        lat: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            point: GeoPoint { lon, lat },
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Внутренние методы и функции
////////////////////////////////////////////////////////////////////////////////

/// Проверяет, что координаты конечны и в допустимом диапазоне:
/// долгота -180..180, широта -90..90.
pub fn validate_coords(
    lon: f64,
    lat: f64,
) -> bool {
    lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat)
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
