//! Plain-text layout of a snapshot: header, hourly strip, 10-day list.

use std::fmt::Write;

use chrono::{NaiveDate, Timelike};
use nowcast_core::{ForecastDay, ForecastPoint, LocatedForecast, Location, weather_code};

const CELL_WIDTH: usize = 6;

pub fn location_label(location: &Location) -> String {
    if location.country.is_empty() {
        location.city.clone()
    } else {
        format!("{} / {}", location.city, location.country)
    }
}

pub fn render(forecast: &LocatedForecast, today: NaiveDate) -> String {
    let snapshot = &forecast.snapshot;
    let mut out = String::new();

    let _ = writeln!(out, "{}", location_label(&forecast.location));
    let _ = writeln!(out, "{:.0}°", snapshot.current.temperature_c);
    let _ = writeln!(out, "{}", weather_code::title_description(snapshot.current.weather_code));
    out.push('\n');

    out.push_str("Hourly Forecast\n");
    let cells: Vec<[String; 4]> = std::iter::once(&snapshot.current)
        .chain(snapshot.hourly.iter())
        .map(hour_cell)
        .collect();
    for row in 0..4 {
        let line: String = cells
            .iter()
            .map(|c| format!("{:^width$}", c[row], width = CELL_WIDTH))
            .collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out.push('\n');

    out.push_str("10-Day Forecast\n");
    for day in &snapshot.daily {
        let _ = writeln!(out, "{}", day_row(day, today));
    }

    out
}

fn hour_cell(point: &ForecastPoint) -> [String; 4] {
    let label = if point.is_current {
        "Now".to_string()
    } else {
        format!("{:02}", point.time.hour())
    };
    [
        label,
        weather_code::icon_for(point.weather_code, point.is_day).glyph().to_string(),
        format!("{:.0}°", point.temperature_c),
        format!("{}%", point.precipitation_probability_pct),
    ]
}

fn day_row(day: &ForecastDay, today: NaiveDate) -> String {
    let label = if day.date == today {
        "Today".to_string()
    } else {
        day.date.format("%A").to_string()
    };
    let glyph = weather_code::icon_for(day.weather_code, true).glyph();
    let precipitation = format!("{}%", day.precipitation_probability_mean_pct);
    let min = format!("{:.0}°", day.temperature_min_c);
    let max = format!("{:.0}°", day.temperature_max_c);

    format!("{label:<10} {glyph:^4} {precipitation:>4} {min:>5} {max:>5}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nowcast_core::ForecastSnapshot;

    fn point(hour: u32, is_current: bool) -> ForecastPoint {
        ForecastPoint {
            time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            temperature_c: 6.6,
            precipitation_probability_pct: 40,
            weather_code: 2,
            is_day: true,
            is_current,
        }
    }

    fn forecast() -> LocatedForecast {
        LocatedForecast {
            location: Location {
                city: "London".into(),
                country: "United Kingdom".into(),
                latitude: 51.5,
                longitude: -0.12,
            },
            snapshot: ForecastSnapshot {
                current: point(5, true),
                hourly: vec![point(6, false), point(7, false)],
                daily: vec![
                    ForecastDay {
                        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                        temperature_min_c: -1.4,
                        temperature_max_c: 8.0,
                        precipitation_probability_mean_pct: 30,
                        weather_code: 3,
                    },
                    ForecastDay {
                        date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                        temperature_min_c: 0.0,
                        temperature_max_c: 5.0,
                        precipitation_probability_mean_pct: 80,
                        weather_code: 63,
                    },
                ],
            },
        }
    }

    #[test]
    fn header_shows_place_temperature_and_description() {
        let text = render(&forecast(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("London / United Kingdom"));
        assert_eq!(lines.next(), Some("7°"));
        assert_eq!(lines.next(), Some("Partly Cloudy"));
    }

    #[test]
    fn hourly_strip_starts_with_now() {
        let text = render(&forecast(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let labels = text
            .lines()
            .skip_while(|l| *l != "Hourly Forecast")
            .nth(1)
            .unwrap();

        let labels: Vec<&str> = labels.split_whitespace().collect();
        assert_eq!(labels, ["Now", "06", "07"]);
    }

    #[test]
    fn daily_rows_label_today_and_weekdays() {
        let text = render(&forecast(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let rows: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "10-Day Forecast")
            .skip(1)
            .collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("Today"));
        assert!(rows[0].contains("-1°"));
        assert!(rows[1].starts_with("Tuesday"));
        assert!(rows[1].contains("80%"));
    }

    #[test]
    fn location_without_country_shows_city_only() {
        let loc = Location {
            city: "51.5, -0.12".into(),
            country: String::new(),
            latitude: 51.5,
            longitude: -0.12,
        };
        assert_eq!(location_label(&loc), "51.5, -0.12");
    }
}
