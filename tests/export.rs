mod common;

use postfinder::dataset::{read_table, DatasetStore};
use postfinder::export::ResultExporter;

#[test]
fn test_exported_csv_loads_back_as_a_dataset() {
    let coordinator = common::coordinator();
    let result = coordinator.radius_search("KT22 8DN", "20").unwrap();
    assert!(result.count > 3);

    let schema = coordinator.store().schema().clone();
    let csv = ResultExporter::new(schema.clone()).to_csv(&result).unwrap();

    let table = read_table(csv.as_bytes()).unwrap();
    let reloaded = DatasetStore::from_table(&table, &schema).unwrap();
    assert_eq!(reloaded.len(), result.count);
    assert_eq!(reloaded.diagnostics().rejected(), 0);

    for (record, neighbor) in reloaded.records().iter().zip(&result.neighbors) {
        assert_eq!(record.identifier, neighbor.record.identifier);
        assert!((record.location.lat - neighbor.record.location.lat).abs() < 1e-4);
        assert!((record.location.lon - neighbor.record.location.lon).abs() < 1e-4);

        let distance: f64 = record.attribute("distance_km").unwrap().parse().unwrap();
        assert!((distance - neighbor.distance_km).abs() < 1e-4);
    }
}
