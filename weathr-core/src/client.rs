use reqwest::Url;
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::{
    config::{Credential, Units},
    error::{Result, WeathrError},
    model::{City, ForecastEntry, ForecastResponse},
    transport::{ReqwestTransport, Transport},
};

/// Response mode asked of the provider. Output format never changes it.
const MODE: &str = "json";

/// OpenWeatherMap 5-day forecast client. One GET per `fetch`, no retries.
#[derive(Debug)]
pub struct ForecastClient<T = ReqwestTransport> {
    credential: Credential,
    endpoint: String,
    transport: T,
}

impl<T: Transport> ForecastClient<T> {
    pub fn with_transport(credential: Credential, endpoint: &str, transport: T) -> Self {
        Self {
            credential,
            endpoint: endpoint.to_string(),
            transport,
        }
    }

    pub fn request_url(&self, city: &str, units: Units) -> Result<Url> {
        self.build_url(city, units, self.credential.expose())
    }

    fn build_url(&self, city: &str, units: Units, api_key: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("q", city),
                ("units", units.as_str()),
                ("appid", api_key),
                ("mode", MODE),
            ],
        )
        .map_err(|e| {
            WeathrError::Configuration(format!("Invalid endpoint '{}': {e}", self.endpoint))
        })
    }

    pub async fn fetch(&self, city: &str, units: Units) -> Result<ForecastResponse> {
        let url = self.request_url(city, units)?;
        log::debug!("GET {}", self.build_url(city, units, "***")?);

        let reply = self.transport.get(url.as_str()).await?;
        log::debug!("{} with {} byte body", reply.status, reply.body.len());

        if !reply.status.is_success() {
            return Err(WeathrError::Fetch(format!(
                "request failed with status {}: {}",
                reply.status,
                truncate_body(&reply.body),
            )));
        }

        decode(&reply.body)
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Number,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

/// Decode a forecast body, keeping the untouched document alongside the
/// typed projection.
pub fn decode(body: &str) -> Result<ForecastResponse> {
    let raw: Value = serde_json::from_str(body)?;
    let parsed = OwForecastResponse::deserialize(&raw)?;

    let entries = parsed
        .list
        .into_iter()
        .enumerate()
        .map(|(i, entry)| -> Result<ForecastEntry> {
            let description = entry
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .ok_or_else(|| {
                    WeathrError::Parse(format!("forecast entry {i} has no weather description"))
                })?;

            Ok(ForecastEntry {
                timestamp: entry.dt_txt,
                description,
                temperature: entry.main.temp,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let city = City {
        name: parsed.city.name,
        country: parsed.city.country,
    };

    ForecastResponse::new(city, entries, raw)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
