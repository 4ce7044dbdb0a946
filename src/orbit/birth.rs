//! Orbital degree of a birth instant.

use chrono::{DateTime, Datelike, Utc};

use super::frame::{ReferenceDegree, normalize};
use super::memo::LongitudeMemo;
use crate::ephemeris::EphemerisProvider;
use crate::error::EphemerisError;

/// Reference degree of Earth at `birth`, measured from the spring equinox that
/// most recently preceded it.
///
/// The equinox of the birth's UTC year is used unless the birth comes before it,
/// in which case the previous year's equinox is the reference. The degree is
/// rounded to two decimals like every other calendar degree; only the search
/// probes compare at full precision.
pub fn birth_degree<E: EphemerisProvider + ?Sized>(
    memo: &mut LongitudeMemo<'_, E>,
    birth: DateTime<Utc>,
) -> Result<ReferenceDegree, EphemerisError> {
    let year = birth.year();
    let mut equinox = memo.provider().seasonal_events(year)?.spring_equinox;
    if birth < equinox {
        equinox = memo.provider().seasonal_events(year - 1)?.spring_equinox;
    }

    let reference = memo.longitude_at(equinox)?;
    let degree = normalize(memo.longitude_at(birth)?, reference);
    log_debug!(
        "Birth {} is {} past the {} spring equinox",
        birth.to_rfc3339(),
        degree,
        equinox.year()
    );
    Ok(degree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{
        MeeusEphemeris, MockEphemerisProvider, SeasonalEvents, SyntheticEphemeris,
    };
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_birth_after_equinox_uses_same_year() {
        let eph = SyntheticEphemeris::default();
        let birth = eph.instant_at_degree(2010, 45.0).unwrap();
        let mut memo = LongitudeMemo::new(&eph);
        let degree = birth_degree(&mut memo, birth).unwrap();
        assert!((degree.degrees() - 45.0).abs() < 1e-6);
    }

    #[test]
    fn test_birth_before_equinox_uses_previous_year() {
        let eph = SyntheticEphemeris::default();
        // Early February lies about 315° past the previous spring equinox
        let birth = eph.instant_at_degree(2009, 320.0).unwrap();
        assert_eq!(birth.year(), 2010);
        let mut memo = LongitudeMemo::new(&eph);
        let degree = birth_degree(&mut memo, birth).unwrap();
        assert!((degree.degrees() - 320.0).abs() < 1e-6);
    }

    #[test]
    fn test_birth_at_equinox_is_zero() {
        let eph = SyntheticEphemeris::default();
        let birth = eph.spring_equinox(2001).unwrap();
        let mut memo = LongitudeMemo::new(&eph);
        assert_eq!(birth_degree(&mut memo, birth).unwrap().degrees(), 0.0);
    }

    #[test]
    fn test_real_birth_degree() {
        // 2000-02-04 10:00 America/New_York
        let birth = Utc.with_ymd_and_hms(2000, 2, 4, 15, 0, 0).unwrap();
        let eph = MeeusEphemeris::new();
        let mut memo = LongitudeMemo::new(&eph);
        let degree = birth_degree(&mut memo, birth).unwrap();
        // About 320 days into the 1999 orbital year
        assert_eq!(degree.degrees(), 315.10, "{degree}");
    }

    #[test]
    fn test_birth_degree_has_two_decimals() {
        let eph = SyntheticEphemeris::default();
        let birth = eph.instant_at_degree(2010, 45.004_7).unwrap();
        let mut memo = LongitudeMemo::new(&eph);
        let degree = birth_degree(&mut memo, birth).unwrap().degrees();
        assert_eq!(degree, 45.0);
        assert_eq!((degree * 100.0).round() / 100.0, degree);
    }

    #[test]
    fn test_seasonal_event_errors_propagate() {
        let mut provider = MockEphemerisProvider::new();
        provider.expect_seasonal_events().returning(|year| {
            Err(EphemerisError::InconsistentEvents {
                year,
                detail: "no data".to_string(),
            })
        });
        let mut memo = LongitudeMemo::new(&provider);
        let birth = Utc.with_ymd_and_hms(2000, 2, 4, 15, 0, 0).unwrap();
        assert!(matches!(
            birth_degree(&mut memo, birth),
            Err(EphemerisError::InconsistentEvents { year: 2000, .. })
        ));
    }

    #[test]
    fn test_previous_year_is_queried_only_when_needed() {
        let equinox = Utc.with_ymd_and_hms(2000, 3, 20, 7, 35, 0).unwrap();
        let mut provider = MockEphemerisProvider::new();
        provider
            .expect_seasonal_events()
            .withf(|year| *year == 2000)
            .times(1)
            .returning(move |_| {
                Ok(SeasonalEvents {
                    spring_equinox: equinox,
                    summer_solstice: equinox + Duration::days(93),
                    autumn_equinox: equinox + Duration::days(186),
                    winter_solstice: equinox + Duration::days(276),
                })
            });
        provider
            .expect_heliocentric_longitude()
            .returning(move |t| Ok(if t == equinox { 180.0 } else { 200.0 }));

        let mut memo = LongitudeMemo::new(&provider);
        let birth = equinox + Duration::days(20);
        assert_eq!(birth_degree(&mut memo, birth).unwrap().degrees(), 20.0);
    }
}
