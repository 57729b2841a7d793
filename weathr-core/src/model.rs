use serde_json::{Number, Value};

use crate::error::{Result, WeathrError};

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    /// ISO 3166 country code, e.g. "FR".
    pub country: String,
}

/// One timestamped data point of the forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Provider timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub description: String,
    /// In the units that were requested, kept as the provider wrote it.
    pub temperature: Number,
}

impl ForecastEntry {
    /// Calendar date part of the timestamp (everything before the first space).
    pub fn date(&self) -> &str {
        self.timestamp
            .split_once(' ')
            .map_or(self.timestamp.as_str(), |(date, _)| date)
    }
}

/// A decoded forecast: the typed projection plus the payload exactly as the
/// provider sent it. Entries keep provider order and there is always at
/// least one.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResponse {
    city: City,
    entries: Vec<ForecastEntry>,
    raw: Value,
}

impl ForecastResponse {
    pub fn new(city: City, entries: Vec<ForecastEntry>, raw: Value) -> Result<Self> {
        if entries.is_empty() {
            return Err(WeathrError::Parse(
                "forecast response contained no entries".to_string(),
            ));
        }
        Ok(Self { city, entries, raw })
    }

    pub fn city(&self) -> &City {
        &self.city
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    /// The earliest entry, reported as current weather.
    pub fn current(&self) -> &ForecastEntry {
        &self.entries[0]
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(timestamp: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp: timestamp.to_string(),
            description: "clear sky".to_string(),
            temperature: Number::from(280),
        }
    }

    fn city() -> City {
        City {
            name: "London".into(),
            country: "GB".into(),
        }
    }

    #[test]
    fn date_is_prefix_before_space() {
        assert_eq!(entry("2024-05-01 12:00:00").date(), "2024-05-01");
        assert_eq!(entry("2024-05-01").date(), "2024-05-01");
    }

    #[test]
    fn empty_forecast_is_rejected() {
        let err = ForecastResponse::new(city(), Vec::new(), json!({})).unwrap_err();
        assert!(matches!(err, WeathrError::Parse(_)));
    }

    #[test]
    fn current_is_first_entry_in_provider_order() {
        let forecast = ForecastResponse::new(
            city(),
            vec![entry("2024-05-02 00:00:00"), entry("2024-05-01 21:00:00")],
            json!({}),
        )
        .unwrap();

        assert_eq!(forecast.current().timestamp, "2024-05-02 00:00:00");
        assert_eq!(forecast.entries().len(), 2);
    }
}
