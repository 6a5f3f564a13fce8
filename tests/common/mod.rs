//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use postfinder::config::Config;
use postfinder::dataset::{read_table, ColumnSchema, DatasetStore, FacilitySet};
use postfinder::geocode::{FixedResolver, GeocodeResolver};
use postfinder::region::RegionClassifier;
use postfinder::{GeoPoint, QueryCoordinator};

pub const POSTCODES: &str = "\
postcode,latitude,longitude
KT22 8DN,51.2967,-0.3306
KT22 7AA,51.3012,-0.3299
KT22 9AB,51.3100,-0.3200
KT1 1EU,51.4140,-0.2820
GU1 1AA,51.2362,-0.5704
SW1A 1AA,51.5010,-0.1416
";

pub const FACILITIES: &str = "\
postcode,name,latitude,longitude,address_1,address_2
KT1 1EU,Kingston Hospital,51.414,-0.282,Galsworthy Road,Kingston upon Thames
GU2 7XX,Royal Surrey,51.241,-0.608,Egerton Road,Guildford
RH1 5RH,East Surrey Hospital,51.219,-0.164,Canada Avenue,Redhill
KT16 0PZ,St Peter's Hospital,51.378,-0.523,Guildford Road,
SM5 1AA,St Helier Hospital,51.380,-0.180,Wrythe Lane,Carshalton
TW7 6AF,West Middlesex Hospital,51.473,-0.325,Twickenham Road,Isleworth
";

pub fn store() -> DatasetStore {
    let table = read_table(POSTCODES.as_bytes()).unwrap();
    DatasetStore::from_table(&table, &ColumnSchema::default()).unwrap()
}

pub fn facilities() -> FacilitySet {
    let table = read_table(FACILITIES.as_bytes()).unwrap();
    FacilitySet::from_table(&table, &ColumnSchema::default()).unwrap()
}

pub fn resolver() -> FixedResolver {
    FixedResolver::new()
        .with("KT22 8DN", GeoPoint::new(51.2967, -0.3306), Some("Mole Valley"))
        .with("KT1 1EU", GeoPoint::new(51.4140, -0.2820), Some("Kingston upon Thames"))
        .with("GU1 1AA", GeoPoint::new(51.2362, -0.5704), Some("Guildford"))
        .with("SW1A 1AA", GeoPoint::new(51.5010, -0.1416), Some("Westminster"))
        .with("BT1 1AA", GeoPoint::new(54.5970, -5.9300), None)
}

pub fn coordinator_with(resolver: Arc<dyn GeocodeResolver>) -> QueryCoordinator {
    QueryCoordinator::new(
        Arc::new(store()),
        Arc::new(facilities()),
        Arc::new(RegionClassifier::new(Config::default().regions).unwrap()),
        resolver,
    )
}

pub fn coordinator() -> QueryCoordinator {
    coordinator_with(Arc::new(resolver()))
}
