//! Terminal panels for a [`WeatherReport`].

use chrono::{DateTime, Local, TimeZone, Utc};
use colored::{Color, Colorize};
use dashboard_core::{AirQuality, AqiLevel, Condition, ForecastEntry, Units, WeatherReport};

const PANEL_WIDTH: usize = 60;

pub fn banner() -> String {
    panel("Weather Dashboard", &[], Color::Blue)
}

pub fn report(report: &WeatherReport) -> String {
    [
        panel(report.place.display_name(), &[], Color::Blue),
        current_panel(report),
        air_panel(report.air.as_ref()),
        forecast_panel(&report.forecast, report.units, &Local),
    ]
    .join("\n")
}

fn current_panel(report: &WeatherReport) -> String {
    let now = &report.current;
    let t = report.units.temperature_suffix();

    let lines = [
        format!("Temperature: {:.1}{t}", now.temperature),
        format!("Feels like:  {:.1}{t}", now.feels_like),
        format!("Humidity:    {}%", now.humidity_pct),
        format!("Wind Speed:  {:.1} {}", now.wind_speed, report.units.wind_speed_suffix()),
        format!("Pressure:    {} hPa", now.pressure_hpa),
        format!(
            "Conditions:  {} {}",
            icon(now.condition),
            capitalize(&now.description)
        ),
    ];

    panel("Current Weather", &lines, Color::Blue)
}

fn air_panel(air: Option<&AirQuality>) -> String {
    let lines = match air {
        Some(air) => vec![
            format!("Overall: {} ({}/5)", air.aqi.label(), air.aqi.index()),
            format!("PM2.5:   {:.1} μg/m³", air.pm2_5),
            format!("NO2:     {:.1} μg/m³", air.no2),
        ],
        None => vec!["Air quality data not available".to_string()],
    };

    let border = air.map(|a| aqi_color(a.aqi)).unwrap_or(Color::Yellow);
    panel("Air Quality", &lines, border)
}

fn forecast_panel<Tz: TimeZone>(entries: &[ForecastEntry], units: Units, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let lines: Vec<String> = if entries.is_empty() {
        vec!["No forecast data".to_string()]
    } else {
        entries
            .iter()
            .map(|e| {
                let temperature = format!("{:.1}{}", e.temperature, units.temperature_suffix());
                format!(
                    "{:<16}  {:>7}  {} {}",
                    local_time(e.timestamp, tz),
                    temperature,
                    icon(e.condition),
                    capitalize(&e.description)
                )
            })
            .collect()
    };

    panel("Forecast", &lines, Color::Green)
}

fn local_time<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}

/// Box with a coloured border. Width is measured on the plain text.
fn panel(title: &str, lines: &[String], border: Color) -> String {
    let inner = lines
        .iter()
        .map(|l| l.chars().count())
        .chain([title.chars().count() + 2])
        .max()
        .unwrap_or(0)
        .max(PANEL_WIDTH);

    let rule = "─".repeat(inner - title.chars().count() - 1);
    let mut out = format!(
        "{}{}{}\n",
        "╭─ ".color(border),
        title.bold(),
        format!(" {rule}╮").color(border)
    );

    for line in lines {
        let pad = inner - line.chars().count();
        out.push_str(&format!(
            "{} {}{} {}\n",
            "│".color(border),
            line,
            " ".repeat(pad),
            "│".color(border)
        ));
    }

    out.push_str(&format!("╰{}╯", "─".repeat(inner + 2)).color(border).to_string());
    out
}

pub fn icon(condition: Condition) -> &'static str {
    match condition {
        Condition::Clear => "☀️",
        Condition::Clouds => "☁️",
        Condition::Rain => "🌧️",
        Condition::Snow => "❄️",
        Condition::Thunderstorm => "⚡",
        Condition::Drizzle => "🌦️",
        Condition::Mist
        | Condition::Smoke
        | Condition::Haze
        | Condition::Dust
        | Condition::Fog
        | Condition::Sand
        | Condition::Ash => "🌫️",
        Condition::Squall => "💨",
        Condition::Tornado => "🌪️",
        Condition::Unknown => "❓",
    }
}

fn aqi_color(aqi: AqiLevel) -> Color {
    match aqi {
        AqiLevel::Good => Color::Green,
        AqiLevel::Fair => Color::Cyan,
        AqiLevel::Moderate => Color::Yellow,
        AqiLevel::Poor | AqiLevel::VeryPoor => Color::Red,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
