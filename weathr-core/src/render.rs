use crate::{
    config::{Config, OutputFormat},
    error::Result,
    model::{ForecastEntry, ForecastResponse},
};

/// Render a forecast the way `config.format` asks for.
pub fn render(forecast: &ForecastResponse, config: &Config) -> Result<String> {
    match config.format {
        OutputFormat::Raw => render_raw(forecast),
        OutputFormat::Summary => Ok(render_summary(forecast, config.units.letter())),
    }
}

/// The provider payload as pretty-printed JSON.
pub fn render_raw(forecast: &ForecastResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(forecast.raw())?)
}

/// City line, current weather, then one line for the first entry of every
/// new calendar date.
pub fn render_summary(forecast: &ForecastResponse, unit: &str) -> String {
    let city = forecast.city();
    let current = forecast.current();

    let mut lines = vec![
        format!("{}, {}", city.name, city.country),
        format!(
            "Current weather: {}, {} {unit}",
            current.description, current.temperature
        ),
        "5-day forecast with dates:".to_string(),
    ];

    let mut last = current;
    for entry in forecast.entries() {
        if entry.date() != last.date() {
            lines.push(day_line(entry, unit));
            last = entry;
        }
    }

    lines.join("\n")
}

fn day_line(entry: &ForecastEntry, unit: &str) -> String {
    format!(
        "{}: {}, {} {unit}",
        entry.timestamp, entry.description, entry.temperature
    )
}
