use async_trait::async_trait;
use hashbrown::HashMap;

use super::{GeocodeResolver, Geocoded};
use crate::error::GeocodeError;
use crate::models::{GeoPoint, NormalizedIdentifier};

/// In-memory resolver keyed by normalized postcode.
///
/// Deterministic stand-in for the live service, used in tests and for offline
/// runs. Postcodes it does not know resolve to `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct FixedResolver {
    entries: HashMap<NormalizedIdentifier, Geocoded>,
}

impl FixedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, postcode: &str, location: GeoPoint, area: Option<&str>) -> Self {
        self.insert(postcode, location, area);
        self
    }

    pub fn insert(&mut self, postcode: &str, location: GeoPoint, area: Option<&str>) {
        self.entries.insert(
            NormalizedIdentifier::new(postcode),
            Geocoded {
                location,
                administrative_area: area.map(String::from),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl GeocodeResolver for FixedResolver {
    async fn resolve(&self, text: &str) -> Result<Geocoded, GeocodeError> {
        let key = NormalizedIdentifier::new(text);
        if key.is_empty() {
            return Err(GeocodeError::InvalidInput(text.to_string()));
        }
        self.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| GeocodeError::NotFound(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_normalized_postcodes() {
        let resolver = FixedResolver::new().with(
            "KT22 8DN",
            GeoPoint::new(51.2967, -0.3306),
            Some("Mole Valley"),
        );

        let hit = resolver.resolve("kt228dn").await.unwrap();
        assert_eq!(hit.administrative_area.as_deref(), Some("Mole Valley"));
        assert_eq!(
            resolver.resolve("SW1A 1AA").await,
            Err(GeocodeError::NotFound("SW1A 1AA".to_string()))
        );
        assert!(matches!(
            resolver.resolve("  ").await,
            Err(GeocodeError::InvalidInput(_))
        ));
    }
}
