//! src/weather_client.rs

use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};

#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    #[error("Failed to reach the weather provider.")]
    Transport(#[from] reqwest::Error),
    #[error("The weather provider responded with status {0}.")]
    ErrorStatus(StatusCode),
}

#[derive(Clone)]
pub struct WeatherClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Secret<String>,
}

impl WeatherClient {
    pub fn new(base_url: String, api_key: Secret<String>) -> Self {
        // Single attempt per call, no timeout: a slow provider blocks the caller.
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// One GET against the timeline endpoint for a free-text location query
    /// (e.g. "Chennai,Tamil Nadu,India"). No caching, no retries; provider
    /// errors propagate upward.
    pub async fn fetch_weather(
        &self,
        location_query: &str,
    ) -> Result<WeatherPayload, UpstreamError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(location_query));
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("unitGroup", "us"),
                ("key", self.api_key.expose_secret().as_str()),
                ("contentType", "json"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(UpstreamError::ErrorStatus(response.status()));
        }
        let payload = response.json::<WeatherPayload>().await?;
        Ok(payload)
    }
}

/// The provider document, reduced to the fields we consume. Everything the
/// provider may omit is an `Option` or defaulted so a sparse upstream
/// response never fails deserialization.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPayload {
    pub resolved_address: Option<String>,
    #[serde(default)]
    pub days: Vec<DayRecord>,
    pub current_conditions: Option<CurrentConditions>,
    pub error_code: Option<i64>,
}

impl WeatherPayload {
    /// A payload counts as unresolved when the provider embedded an error
    /// code or returned no forecast days for the query.
    pub fn is_resolved(&self) -> bool {
        self.error_code.is_none() && !self.days.is_empty()
    }

    pub fn current_day(&self) -> Option<&DayRecord> {
        self.days.first()
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct CurrentConditions {
    pub temp: Option<f64>,
    pub feelslike: Option<f64>,
    pub humidity: Option<f64>,
    pub windspeed: Option<f64>,
    pub winddir: Option<f64>,
    pub pressure: Option<f64>,
    pub uvindex: Option<f64>,
    pub visibility: Option<f64>,
    pub precip: Option<f64>,
    pub snow: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct DayRecord {
    /// `YYYY-MM-DD`
    pub datetime: String,
    pub temp: Option<f64>,
    pub tempmax: Option<f64>,
    pub tempmin: Option<f64>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub hours: Vec<HourRecord>,
}

#[derive(Debug, serde::Deserialize)]
pub struct HourRecord {
    /// `HH:MM:SS`
    pub datetime: String,
    pub temp: Option<f64>,
    pub feelslike: Option<f64>,
    pub humidity: Option<f64>,
    pub windspeed: Option<f64>,
    pub precipprob: Option<f64>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
}

/// The fixed current-conditions subset returned by `GET /api/weather` and
/// consumed by the alert message template.
#[derive(Debug, serde::Serialize)]
pub struct CurrentView {
    pub temp: Option<f64>,
    pub feelslike: Option<f64>,
    pub humidity: Option<f64>,
    pub windspeed: Option<f64>,
    pub winddir: Option<f64>,
    pub pressure: Option<f64>,
    pub uvindex: Option<f64>,
    pub visibility: Option<f64>,
    pub precip: Option<f64>,
    pub snow: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct HourView {
    pub time: String,
    pub temp: Option<f64>,
    pub feelslike: Option<f64>,
    pub humidity: Option<f64>,
    pub windspeed: Option<f64>,
    pub precipprob: Option<f64>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct DayView {
    pub date: String,
    pub temp: Option<f64>,
    pub tempmax: Option<f64>,
    pub tempmin: Option<f64>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
}

pub fn current_view(current: &CurrentConditions) -> CurrentView {
    CurrentView {
        temp: current.temp,
        feelslike: current.feelslike,
        humidity: current.humidity,
        windspeed: current.windspeed,
        winddir: current.winddir,
        pressure: current.pressure,
        uvindex: current.uvindex,
        visibility: current.visibility,
        precip: current.precip,
        snow: current.snow,
        sunrise: current.sunrise.clone(),
        sunset: current.sunset.clone(),
        conditions: current.conditions.clone(),
        icon: current.icon.clone(),
    }
}

/// Every hour of the given day, with a display label like "2:00 PM".
pub fn hourly_view(day: &DayRecord) -> Vec<HourView> {
    day.hours
        .iter()
        .map(|hour| HourView {
            time: hour_label(&hour.datetime),
            temp: hour.temp,
            feelslike: hour.feelslike,
            humidity: hour.humidity,
            windspeed: hour.windspeed,
            precipprob: hour.precipprob,
            conditions: hour.conditions.clone(),
            icon: hour.icon.clone(),
        })
        .collect()
}

/// The first seven days, with display labels like "Saturday, Aug 30".
pub fn daily_view(days: &[DayRecord]) -> Vec<DayView> {
    days.iter()
        .take(7)
        .map(|day| DayView {
            date: day_label(&day.datetime),
            temp: day.temp,
            tempmax: day.tempmax,
            tempmin: day.tempmin,
            conditions: day.conditions.clone(),
            icon: day.icon.clone(),
        })
        .collect()
}

fn hour_label(datetime: &str) -> String {
    match chrono::NaiveTime::parse_from_str(datetime, "%H:%M:%S") {
        Ok(time) => time.format("%-I:%M %p").to_string(),
        // Keep the raw provider value rather than dropping the record.
        Err(_) => datetime.to_string(),
    }
}

fn day_label(datetime: &str) -> String {
    match chrono::NaiveDate::parse_from_str(datetime, "%Y-%m-%d") {
        Ok(date) => date.format("%A, %b %-d").to_string(),
        Err(_) => datetime.to_string(),
    }
}
