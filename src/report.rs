//! Presentation of a generated calendar.
//!
//! The terminal summary goes through the logger macros so it shares the box
//! drawing of every other message and follows `--log` redirection. JSON output is
//! written straight to stdout by the binary.

use chrono::SecondsFormat;

use crate::calendar::{CalendarYear, DayRecord, EventTag, MonthRecord};
use crate::solar_day::format_length_delta;

/// One line per tagged day, in calendar order.
pub fn event_lines(calendar: &CalendarYear) -> Vec<String> {
    calendar
        .months()
        .iter()
        .flat_map(|month| {
            month
                .days()
                .iter()
                .filter(|day| !day.events.is_empty())
                .map(move |day| {
                    let labels: Vec<&str> = day.events.iter().map(|tag| tag.label()).collect();
                    format!(
                        "{} ({} {}): {}",
                        day.civil_date,
                        month.zodiac_name(),
                        day.number_in_month,
                        labels.join(", ")
                    )
                })
        })
        .collect()
}

/// Heading used for a month in the summary.
pub fn month_heading(month: &MonthRecord) -> String {
    let range = match (month.days().first(), month.days().last()) {
        (Some(first), Some(last)) => format!("{} to {}", first.civil_date, last.civil_date),
        _ => "no days".to_string(),
    };
    format!(
        "Month {:>2} {:<11} {:>2} days  {}",
        month.month_index(),
        month.zodiac_name(),
        month.total_days(),
        range
    )
}

/// Single-line description of a day for debug output.
pub fn day_line(day: &DayRecord) -> String {
    let mut line = format!(
        "{:>2} {} noon {} {:>7} {} {}",
        day.number_in_month,
        day.civil_date,
        day.solar_noon.format("%H:%M:%SZ"),
        day.orbital_degree.to_string(),
        format_length_delta(day.length_delta_seconds),
        day.moon_phase
    );
    if !day.events.is_empty() {
        let labels: Vec<&str> = day.events.iter().map(|tag| tag.label()).collect();
        line.push_str(&format!(" [{}]", labels.join(", ")));
    }
    line
}

/// Print the calendar summary through the logger.
///
/// Per-day lines are emitted with `log_debug!`, so they only show up when debug
/// output is on.
pub fn log_summary(calendar: &CalendarYear) {
    log_block_start!(
        "Orbital year {}: {} days in {} months",
        calendar.year(),
        calendar.total_days(),
        calendar.months().len()
    );
    log_indented!(
        "Spring equinox: {}",
        calendar
            .events()
            .spring_equinox
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    log_indented!(
        "Next spring equinox: {}",
        calendar
            .events()
            .next_spring_equinox
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    log_indented!("Birth degree: {}", calendar.birth_degree());

    for month in calendar.months() {
        log_block_start!("{}", month_heading(month));
        for day in month.days() {
            log_debug!("{}", day_line(day));
        }
    }

    log_block_start!("Events:");
    for line in event_lines(calendar) {
        log_indented!("{}", line);
    }

    match calendar.days_with(EventTag::BirthOrbit).next() {
        Some(day) => log_info!(
            "Orbital birthday falls on {} at solar noon {}",
            day.civil_date,
            day.solar_noon.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        None if !calendar.birthday_located() => {
            log_warning!("Orbital birthday could not be located in {}", calendar.year())
        }
        None => log_warning!("Orbital birthday fell outside every solar day window"),
    }
}

/// Pretty-printed JSON rendering of the whole calendar.
pub fn to_json(calendar: &CalendarYear) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(calendar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{Observer, SyntheticEphemeris};
    use crate::{CalendarRequest, generate};

    fn synthetic_calendar() -> CalendarYear {
        let request = CalendarRequest::parse(
            2025,
            "2000-05-05",
            "12:00",
            "UTC",
            Observer::new(0.0, 0.0, 0.0),
        )
        .unwrap();
        generate(&request, &SyntheticEphemeris::default()).unwrap()
    }

    #[test]
    fn test_event_lines_cover_every_tag() {
        let calendar = synthetic_calendar();
        let lines = event_lines(&calendar);
        let joined = lines.join("\n");

        assert!(joined.contains("Orbital Birthday"));
        assert!(joined.contains("Spring Equinox"));
        let tagged_days = calendar.days().filter(|d| !d.events.is_empty()).count();
        assert_eq!(lines.len(), tagged_days);
    }

    #[test]
    fn test_month_heading() {
        let calendar = synthetic_calendar();
        let heading = month_heading(&calendar.months()[0]);
        assert!(heading.starts_with("Month  1 Aries"));
        assert!(heading.contains("days"));

        let empty = MonthRecord::from_bucket(4, Vec::new());
        assert!(month_heading(&empty).ends_with("no days"));
    }

    #[test]
    fn test_day_line_marks_events() {
        let calendar = synthetic_calendar();
        let birthday = calendar.days_with(EventTag::BirthOrbit).next().unwrap();
        let line = day_line(birthday);
        assert!(line.contains(&birthday.civil_date.to_string()));
        assert!(line.ends_with("[Orbital Birthday]"));
    }

    #[test]
    fn test_json_shape() {
        let calendar = synthetic_calendar();
        let json = to_json(&calendar).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["year"], 2025);
        let months = value["months"].as_array().unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0]["zodiac_name"], "Aries");
        assert!(months[0]["days"][0]["moon_phase"].is_string());
        assert!(value["events"]["perihelion"].is_string());
    }
}
