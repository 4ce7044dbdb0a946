//! Astronomical events of one orbital year.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::EventTag;
use crate::ephemeris::{ApsisKind, Body, EphemerisProvider, SeasonalEvents};
use crate::error::EphemerisError;

/// Seasons of a civil year plus the following spring equinox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbitalYearBounds {
    pub year: i32,
    pub seasons: SeasonalEvents,
    pub next_spring_equinox: DateTime<Utc>,
}

impl OrbitalYearBounds {
    pub fn resolve<E: EphemerisProvider + ?Sized>(
        provider: &E,
        year: i32,
    ) -> Result<Self, EphemerisError> {
        let seasons = provider.seasonal_events(year)?;
        let next_spring_equinox = provider.seasonal_events(year + 1)?.spring_equinox;

        if seasons.spring_equinox >= next_spring_equinox {
            return Err(EphemerisError::InconsistentEvents {
                year,
                detail: format!(
                    "spring equinox {} is not before the next one {}",
                    seasons.spring_equinox, next_spring_equinox
                ),
            });
        }

        Ok(Self {
            year,
            seasons,
            next_spring_equinox,
        })
    }

    pub fn spring_equinox(&self) -> DateTime<Utc> {
        self.seasons.spring_equinox
    }

    /// Whether `instant` lies in `[spring_equinox, next_spring_equinox)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.spring_equinox() <= instant && instant < self.next_spring_equinox
    }
}

/// Fixed instants of one orbital year, plus the orbital birthday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AstronomicalEventSet {
    pub spring_equinox: DateTime<Utc>,
    pub summer_solstice: DateTime<Utc>,
    pub autumn_equinox: DateTime<Utc>,
    pub winter_solstice: DateTime<Utc>,
    pub next_spring_equinox: DateTime<Utc>,
    pub aphelion: DateTime<Utc>,
    pub perihelion: DateTime<Utc>,
    pub birth: DateTime<Utc>,
}

impl AstronomicalEventSet {
    /// Look up the apsides inside `bounds` and assemble the full set.
    ///
    /// Fails if the seasons or apsides fall outside the orbital year or the two
    /// apsides found are of the same kind.
    pub fn resolve<E: EphemerisProvider + ?Sized>(
        provider: &E,
        bounds: &OrbitalYearBounds,
        birth: DateTime<Utc>,
    ) -> Result<Self, EphemerisError> {
        let first = provider.search_apsis(Body::Earth, bounds.spring_equinox())?;
        let second = provider.next_apsis(Body::Earth, &first)?;

        if first.kind == second.kind {
            return Err(EphemerisError::InconsistentEvents {
                year: bounds.year,
                detail: format!("two consecutive {:?} events", first.kind),
            });
        }
        let (aphelion, perihelion) = match first.kind {
            ApsisKind::Aphelion => (first.instant, second.instant),
            ApsisKind::Perihelion => (second.instant, first.instant),
        };

        let events = Self {
            spring_equinox: bounds.seasons.spring_equinox,
            summer_solstice: bounds.seasons.summer_solstice,
            autumn_equinox: bounds.seasons.autumn_equinox,
            winter_solstice: bounds.seasons.winter_solstice,
            next_spring_equinox: bounds.next_spring_equinox,
            aphelion,
            perihelion,
            birth,
        };
        events.validate(bounds)?;
        Ok(events)
    }

    fn validate(&self, bounds: &OrbitalYearBounds) -> Result<(), EphemerisError> {
        for (tag, instant) in self.tagged() {
            if !bounds.contains(instant) {
                return Err(EphemerisError::InconsistentEvents {
                    year: bounds.year,
                    detail: format!(
                        "{tag} at {instant} lies outside the orbital year {} .. {}",
                        self.spring_equinox, self.next_spring_equinox
                    ),
                });
            }
        }
        Ok(())
    }

    /// The six astronomical events in chronological order.
    pub fn tagged(&self) -> [(EventTag, DateTime<Utc>); 6] {
        let mut tagged = [
            (EventTag::SpringEquinox, self.spring_equinox),
            (EventTag::SummerSolstice, self.summer_solstice),
            (EventTag::AutumnEquinox, self.autumn_equinox),
            (EventTag::WinterSolstice, self.winter_solstice),
            (EventTag::Aphelion, self.aphelion),
            (EventTag::Perihelion, self.perihelion),
        ];
        tagged.sort_by_key(|&(tag, instant)| (instant, tag));
        tagged
    }
}
