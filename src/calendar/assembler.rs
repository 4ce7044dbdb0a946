//! One generation pass over an orbital year.
//!
//! The pass runs in two phases. The first resolves the year's bounds, every solar
//! day window between the two spring equinoxes, the orbital birthday and the event
//! set. The second walks the windows in order and turns each into a finished
//! [`DayRecord`] in its month bucket. Nothing is written to a record after it is
//! built, and nothing outlives the call except the returned [`CalendarYear`].

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use super::events::{AstronomicalEventSet, OrbitalYearBounds};
use super::request::CalendarRequest;
use super::{CalendarYear, DayRecord, EventTag, MonthRecord};
use crate::civil;
use crate::constants::MONTHS_PER_YEAR;
use crate::ephemeris::{EphemerisProvider, Observer};
use crate::error::{CalendarError, EphemerisError};
use crate::orbit::{LongitudeMemo, TargetMatch, birth_degree, locate_target, normalize};
use crate::solar_day::{SolarDayResolver, SolarDayWindow};

/// Generate the orbital calendar described by `request`.
pub fn generate<E: EphemerisProvider + ?Sized>(
    request: &CalendarRequest,
    provider: &E,
) -> Result<CalendarYear, CalendarError> {
    let year = request.year();
    assemble(request, provider).map_err(|e| CalendarError::ephemeris(year, e))
}

/// Generate an orbital calendar from raw civil parameters.
///
/// All parameters are validated before the provider is queried.
#[allow(clippy::too_many_arguments)]
pub fn generate_calendar<E: EphemerisProvider + ?Sized>(
    year: i32,
    birth_date: &str,
    birth_time: &str,
    timezone: &str,
    latitude: f64,
    longitude: f64,
    elevation: f64,
    provider: &E,
) -> Result<CalendarYear, CalendarError> {
    let observer = Observer::new(latitude, longitude, elevation);
    let request = CalendarRequest::parse(year, birth_date, birth_time, timezone, observer)?;
    generate(&request, provider)
}

fn assemble<E: EphemerisProvider + ?Sized>(
    request: &CalendarRequest,
    provider: &E,
) -> Result<CalendarYear, EphemerisError> {
    let year = request.year();
    let timezone = request.timezone();
    let mut memo = LongitudeMemo::new(provider);

    log_debug!(
        "Generating orbital year {} for birth {}",
        year,
        request.birth_instant().to_rfc3339()
    );

    // Phase one: everything the day records depend on
    let bounds = OrbitalYearBounds::resolve(provider, year)?;
    let reference_longitude = memo.longitude_at(bounds.spring_equinox())?;
    let target = birth_degree(&mut memo, request.birth_instant())?;

    let resolver = SolarDayResolver::new(provider, request.observer(), timezone);
    let windows = civil_days(&bounds, timezone)
        .map(|date| resolver.resolve(date))
        .collect::<Result<Vec<_>, _>>()?;
    log_debug!(
        "{} civil days from {} to {}",
        windows.len(),
        bounds.spring_equinox().to_rfc3339(),
        bounds.next_spring_equinox.to_rfc3339()
    );

    let birthday = locate_target(
        &mut memo,
        &windows,
        reference_longitude,
        target,
        request.birth_instant(),
    )?;
    let events = AstronomicalEventSet::resolve(provider, &bounds, birthday.instant())?;
    let tags = place_events(&windows, &events, &birthday, timezone);

    // Phase two: build the records
    let mut buckets: Vec<Vec<DayRecord>> = vec![Vec::new(); MONTHS_PER_YEAR];
    for (window, day_events) in windows.iter().zip(tags) {
        let orbital_degree = normalize(memo.longitude_at(window.noon)?, reference_longitude);
        let bucket = orbital_degree.month_bucket();
        let days = &mut buckets[bucket];

        log_debug!(
            "{} → month {} at {}{}",
            window.civil_date,
            bucket + 1,
            orbital_degree,
            if day_events.is_empty() {
                String::new()
            } else {
                format!(" {day_events:?}")
            }
        );

        days.push(DayRecord {
            number_in_month: days.len() + 1,
            civil_date: window.civil_date,
            solar_start: window.start,
            solar_noon: window.noon,
            solar_end: window.end,
            moon_phase: window.moon_phase,
            length_delta_seconds: window.length_delta_seconds,
            orbital_degree,
            events: day_events,
        });
    }

    let months = buckets
        .into_iter()
        .enumerate()
        .map(|(bucket, days)| MonthRecord::from_bucket(bucket, days))
        .collect();

    log_debug!("Memo held {} longitudes", memo.len());

    Ok(CalendarYear::new(
        year,
        target.rounded(),
        !birthday.is_fallback(),
        events,
        months,
    ))
}

/// Civil dates from the spring equinox's date up to, not including, the next
/// spring equinox's date.
fn civil_days(bounds: &OrbitalYearBounds, timezone: Tz) -> impl Iterator<Item = NaiveDate> {
    let first = civil::civil_date(bounds.spring_equinox(), timezone);
    let last = civil::civil_date(bounds.next_spring_equinox, timezone);
    first.iter_days().take_while(move |date| *date < last)
}

/// Event tags for each window.
///
/// Astronomical events go to the window containing them, or failing that the day
/// with the same civil date. The birthday goes only to the window containing it and
/// replaces whatever else that day had.
fn place_events(
    windows: &[SolarDayWindow],
    events: &AstronomicalEventSet,
    birthday: &TargetMatch,
    timezone: Tz,
) -> Vec<Vec<EventTag>> {
    let mut tags = vec![Vec::new(); windows.len()];

    for (tag, instant) in events.tagged() {
        match day_of(windows, instant, timezone) {
            Some(index) => tags[index].push(tag),
            None => log_debug!("{} at {} falls on no day", tag, instant.to_rfc3339()),
        }
    }

    let birthday_instant = birthday.instant();
    match windows.iter().position(|w| w.contains(birthday_instant)) {
        Some(index) => {
            if !tags[index].is_empty() {
                log_debug!(
                    "Orbital birthday on {} displaces {:?}",
                    windows[index].civil_date,
                    tags[index]
                );
            }
            tags[index] = vec![EventTag::BirthOrbit];
        }
        None => log_warning!(
            "Orbital birthday {} is outside every solar day of the year",
            birthday_instant.to_rfc3339()
        ),
    }

    tags
}

fn day_of(windows: &[SolarDayWindow], instant: DateTime<Utc>, timezone: Tz) -> Option<usize> {
    windows.iter().position(|w| w.contains(instant)).or_else(|| {
        let date = civil::civil_date(instant, timezone);
        windows.iter().position(|w| w.civil_date == date)
    })
}
