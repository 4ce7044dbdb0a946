//! Orbital calendar data model and generation.
//!
//! A [`CalendarYear`] covers one orbital year, from a spring equinox to the next,
//! split into twelve 30° months. Every civil day in between gets a [`DayRecord`]
//! built from its solar day window, and the day holding the orbital birthday or one
//! of the six astronomical events is tagged accordingly.
//!
//! ## Module Structure
//!
//! - [`request`]: validated generation parameters
//! - [`events`]: the year's equinoxes, solstices and apsides
//! - [`assembler`]: the generation pass itself

pub mod assembler;
pub mod events;
pub mod request;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::orbit::ReferenceDegree;
use crate::solar_day::MoonPhase;

pub use assembler::{generate, generate_calendar};
pub use events::{AstronomicalEventSet, OrbitalYearBounds};
pub use request::CalendarRequest;

/// Traditional sign names of the twelve 30° months, starting at the spring equinox.
pub const ZODIAC_NAMES: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// Marker attached to a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EventTag {
    BirthOrbit,
    SpringEquinox,
    SummerSolstice,
    AutumnEquinox,
    WinterSolstice,
    Aphelion,
    Perihelion,
}

impl EventTag {
    pub fn label(self) -> &'static str {
        match self {
            EventTag::BirthOrbit => "Orbital Birthday",
            EventTag::SpringEquinox => "Spring Equinox",
            EventTag::SummerSolstice => "Summer Solstice",
            EventTag::AutumnEquinox => "Autumn Equinox",
            EventTag::WinterSolstice => "Winter Solstice",
            EventTag::Aphelion => "Aphelion",
            EventTag::Perihelion => "Perihelion",
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One civil day of the orbital calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    /// Position within its month, starting at 1.
    pub number_in_month: usize,
    pub civil_date: NaiveDate,
    pub solar_start: DateTime<Utc>,
    pub solar_noon: DateTime<Utc>,
    pub solar_end: DateTime<Utc>,
    pub moon_phase: MoonPhase,
    /// Solar day length minus 24 hours, in seconds.
    pub length_delta_seconds: f64,
    /// Reference degree at solar noon, rounded to two decimals.
    pub orbital_degree: ReferenceDegree,
    pub events: Vec<EventTag>,
}

/// One 30° orbital month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRecord {
    month_index: usize,
    zodiac_name: &'static str,
    total_days: usize,
    days: Vec<DayRecord>,
}

impl MonthRecord {
    /// Finalize a month from the days assigned to bucket `bucket` (`0..12`).
    pub(crate) fn from_bucket(bucket: usize, days: Vec<DayRecord>) -> Self {
        Self {
            month_index: bucket + 1,
            zodiac_name: ZODIAC_NAMES[bucket % ZODIAC_NAMES.len()],
            total_days: days.len(),
            days,
        }
    }

    /// Month number, `1..=12`.
    pub fn month_index(&self) -> usize {
        self.month_index
    }

    pub fn zodiac_name(&self) -> &'static str {
        self.zodiac_name
    }

    pub fn total_days(&self) -> usize {
        self.total_days
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }
}

/// A fully generated orbital year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarYear {
    year: i32,
    birth_degree: ReferenceDegree,
    birthday_located: bool,
    events: AstronomicalEventSet,
    months: Vec<MonthRecord>,
}

impl CalendarYear {
    pub(crate) fn new(
        year: i32,
        birth_degree: ReferenceDegree,
        birthday_located: bool,
        events: AstronomicalEventSet,
        months: Vec<MonthRecord>,
    ) -> Self {
        Self {
            year,
            birth_degree,
            birthday_located,
            events,
            months,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Reference degree of the birth instant, the target searched for each year.
    pub fn birth_degree(&self) -> ReferenceDegree {
        self.birth_degree
    }

    /// False when the search fell back to the raw birth instant.
    pub fn birthday_located(&self) -> bool {
        self.birthday_located
    }

    pub fn events(&self) -> &AstronomicalEventSet {
        &self.events
    }

    /// The twelve months in orbital order.
    pub fn months(&self) -> &[MonthRecord] {
        &self.months
    }

    /// Total number of days across all months.
    pub fn total_days(&self) -> usize {
        self.months.iter().map(MonthRecord::total_days).sum()
    }

    /// Every day in month order.
    pub fn days(&self) -> impl Iterator<Item = &DayRecord> {
        self.months.iter().flat_map(|month| month.days.iter())
    }

    /// Days carrying `tag`.
    pub fn days_with(&self, tag: EventTag) -> impl Iterator<Item = &DayRecord> {
        self.days().filter(move |day| day.events.contains(&tag))
    }
}
