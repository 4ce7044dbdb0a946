//! Per-run cache of heliocentric longitude lookups.
//!
//! The target search probes many nearby instants and the day filter asks for the
//! same window edges more than once, so every longitude query of a generation pass
//! goes through a [`LongitudeMemo`]. The memo is created by the pass that uses it
//! and dropped with it; nothing survives between passes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::ephemeris::EphemerisProvider;
use crate::error::EphemerisError;

/// Longitude cache keyed by exact millisecond timestamp.
///
/// Two instants one millisecond apart are distinct entries.
pub struct LongitudeMemo<'a, E: EphemerisProvider + ?Sized> {
    provider: &'a E,
    cache: HashMap<i64, f64>,
}

impl<'a, E: EphemerisProvider + ?Sized> LongitudeMemo<'a, E> {
    pub fn new(provider: &'a E) -> Self {
        Self {
            provider,
            cache: HashMap::new(),
        }
    }

    /// Earth's heliocentric longitude at `instant`, asking the provider only once.
    ///
    /// Values outside `[0, 360)` or non-finite are rejected and not cached.
    pub fn longitude_at(&mut self, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        let key = instant.timestamp_millis();
        if let Some(&longitude) = self.cache.get(&key) {
            return Ok(longitude);
        }

        let longitude = self.provider.heliocentric_longitude(instant)?;
        if !longitude.is_finite() || !(0.0..360.0).contains(&longitude) {
            return Err(EphemerisError::InvalidValue {
                quantity: "heliocentric longitude",
                instant,
                value: longitude,
            });
        }

        self.cache.insert(key, longitude);
        Ok(longitude)
    }

    /// The provider behind this memo, for queries that are not cached.
    pub fn provider(&self) -> &'a E {
        self.provider
    }

    /// Number of distinct instants looked up so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Forget every cached value.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::MockEphemerisProvider;
    use chrono::{Duration, TimeZone};

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_provider_called_once_per_instant() {
        let mut provider = MockEphemerisProvider::new();
        provider
            .expect_heliocentric_longitude()
            .times(1)
            .returning(|_| Ok(180.25));

        let mut memo = LongitudeMemo::new(&provider);
        assert_eq!(memo.longitude_at(instant()).unwrap(), 180.25);
        assert_eq!(memo.longitude_at(instant()).unwrap(), 180.25);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_adjacent_milliseconds_are_distinct_keys() {
        let mut provider = MockEphemerisProvider::new();
        provider
            .expect_heliocentric_longitude()
            .times(2)
            .returning(|t| Ok(if t.timestamp_millis() % 2 == 0 { 10.0 } else { 11.0 }));

        let mut memo = LongitudeMemo::new(&provider);
        let a = instant();
        let b = a + Duration::milliseconds(1);
        assert_eq!(memo.longitude_at(a).unwrap(), 10.0);
        assert_eq!(memo.longitude_at(b).unwrap(), 11.0);
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_clear_forces_new_lookup() {
        let mut provider = MockEphemerisProvider::new();
        provider
            .expect_heliocentric_longitude()
            .times(2)
            .returning(|_| Ok(42.0));

        let mut memo = LongitudeMemo::new(&provider);
        memo.longitude_at(instant()).unwrap();
        memo.clear();
        assert!(memo.is_empty());
        memo.longitude_at(instant()).unwrap();
    }

    #[test]
    fn test_invalid_longitudes_are_rejected() {
        for bad in [f64::NAN, f64::INFINITY, -0.5, 360.0] {
            let mut provider = MockEphemerisProvider::new();
            provider
                .expect_heliocentric_longitude()
                .returning(move |_| Ok(bad));

            let mut memo = LongitudeMemo::new(&provider);
            let result = memo.longitude_at(instant());
            assert!(
                matches!(result, Err(EphemerisError::InvalidValue { .. })),
                "{bad} should be rejected"
            );
            assert!(memo.is_empty());
        }
    }

    #[test]
    fn test_provider_errors_pass_through() {
        let mut provider = MockEphemerisProvider::new();
        provider
            .expect_heliocentric_longitude()
            .returning(|_| Err(EphemerisError::InstantOutOfRange { operation: "test" }));

        let mut memo = LongitudeMemo::new(&provider);
        assert_eq!(
            memo.longitude_at(instant()),
            Err(EphemerisError::InstantOutOfRange { operation: "test" })
        );
    }
}
