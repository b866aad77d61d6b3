use std::f64::consts::PI;

use crate::geo::GeoPoint;

/// Средний радиус Земли в километрах.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Формула гаверсинуса: расстояние по большому кругу между двумя
/// точками на сфере, в километрах.
///
/// Функция чистая и симметричная: `haversine_km(a, b) ==
/// haversine_km(b, a)`, для совпадающих точек возвращает 0 (с
/// точностью до floating-point epsilon). Координаты вне допустимого
/// диапазона не проверяются — поведение для них не определено,
/// валидация лежит на вызывающей стороне.
pub fn haversine_km(
    p1: GeoPoint,
    p2: GeoPoint,
) -> f64 {
    let to_rad = PI / 180.0;
    let dlat = (p2.lat - p1.lat) * to_rad;
    let dlon = (p2.lon - p1.lon) * to_rad;
    let lat1 = p1.lat * to_rad;
    let lat2 = p2.lat * to_rad;

    let a = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon * 0.5).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        let london = GeoPoint {
            lon: -0.1278,
            lat: 51.5074,
        };
        let paris = GeoPoint {
            lon: 2.3522,
            lat: 48.8566,
        };

        let dist = haversine_km(london, paris);
        assert!((dist - 343.5).abs() < 5.0); // +- 5км допуск
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let p1 = GeoPoint { lon: 0.0, lat: 0.0 };
        let p2 = GeoPoint { lon: 0.0, lat: 1.0 };
        let d = haversine_km(p1, p2);
        assert!((d - 111.195).abs() < 0.1);
    }

    #[test]
    fn test_haversine_identity() {
        let p = GeoPoint {
            lon: 13.361389,
            lat: 38.115556,
        };
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = GeoPoint {
            lon: 56.2347,
            lat: 58.0105,
        };
        let b = GeoPoint {
            lon: 60.6057,
            lat: 56.8389,
        };
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }
}
