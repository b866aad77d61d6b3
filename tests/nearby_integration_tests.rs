use std::sync::Arc;

use geodex::{
    IndexManager, IngestionService, InMemoryStore, QueryService, ServiceError,
};

fn make_stack() -> (Arc<IndexManager>, IngestionService, QueryService) {
    let store = Arc::new(InMemoryStore::new());
    let index = Arc::new(IndexManager::new(store.clone()));
    let ingest = IngestionService::new(store, index.clone());
    let query = QueryService::new(index.clone());
    (index, ingest, query)
}

#[test]
fn test_two_closest_scenario() {
    let (index, ingest, query) = make_stack();

    // Два соседа в Нью-Йорке и один на час севернее
    ingest.add_location("A", 40.0, -73.0).unwrap();
    ingest.add_location("B", 40.01, -73.0).unwrap();
    ingest.add_location("C", 41.0, -74.0).unwrap();
    index.rebuild().unwrap();

    let results = query.find_nearby(40.0, -73.0, Some(2)).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].location.name, "A");
    assert_eq!(results[1].location.name, "B");
    assert!(results[0].distance_km < 0.005); // ≈ 0.00 км
    assert!(results[1].distance_km > results[0].distance_km);
}

#[test]
fn test_added_record_visible_after_rebuild() {
    let (index, ingest, query) = make_stack();
    ingest.add_location("old", 10.0, 10.0).unwrap();
    index.rebuild().unwrap();

    ingest.add_location("new", 10.001, 10.0).unwrap();
    index.rebuild().unwrap();

    let results = query.find_nearby(10.0, 10.0, Some(10)).unwrap();
    assert!(results.iter().any(|r| r.location.name == "new"));
}

#[test]
fn test_not_a_number_is_invalid_argument() {
    let (index, _, query) = make_stack();
    index.rebuild().unwrap();

    let err = query
        .find_nearby_raw("not-a-number", "-73.0", Some("5"))
        .unwrap_err();
    match &err {
        ServiceError::InvalidArgument(_) => {}
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_query_before_first_build_is_rejected() {
    let (_, _, query) = make_stack();

    let err = query.find_nearby(0.0, 0.0, None).unwrap_err();
    match &err {
        ServiceError::IndexNotReady => {}
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(err.status_code(), 503);
}

#[test]
fn test_empty_catalog_is_ready_after_first_build() {
    let (index, _, query) = make_stack();

    // Первая (пустая) сборка: индекс готов, записей ноль
    index.rebuild().unwrap();
    assert!(index.is_ready());

    let results = query.find_nearby(0.0, 0.0, None).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_default_limit_is_five() {
    let (index, ingest, query) = make_stack();
    for i in 0..8 {
        ingest
            .add_location(&format!("L{}", i), 0.0, i as f64 * 0.01)
            .unwrap();
    }
    index.rebuild().unwrap();

    assert_eq!(query.find_nearby(0.0, 0.0, None).unwrap().len(), 5);
}

#[test]
fn test_results_ordered_by_exact_distance() {
    let (index, ingest, query) = make_stack();
    // Вставляем вразнобой
    ingest.add_location("far", 0.0, 3.0).unwrap();
    ingest.add_location("near", 0.0, 0.1).unwrap();
    ingest.add_location("mid", 0.0, 1.0).unwrap();
    index.rebuild().unwrap();

    let results = query.find_nearby(0.0, 0.0, Some(3)).unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.location.name.as_str()).collect();
    assert_eq!(names, vec!["near", "mid", "far"]);
    for pair in results.windows(2) {
        assert!(pair[0].distance_km <= pair[1].distance_km);
    }
}

#[tokio::test]
async fn test_ingestion_does_not_wait_for_rebuild() {
    let (index, ingest, query) = make_stack();

    // Вставка возвращается до завершения фоновой пересборки
    let loc = ingest.add_location("Cafe", 40.0, -73.0).unwrap();
    assert_eq!(loc.name, "Cafe");

    // Фоновую задачу не ждём, делаем детерминированную пересборку
    index.rebuild().unwrap();
    let results = query.find_nearby(40.0, -73.0, Some(1)).unwrap();
    assert_eq!(results[0].location.id, loc.id);
}
