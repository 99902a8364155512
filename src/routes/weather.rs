//! src/routes/weather.rs

use crate::domain::ValidationError;
use crate::error::{AppResult, Error};
use crate::weather_client::{
    current_view, daily_view, hourly_view, UpstreamError, WeatherClient, WeatherPayload,
};
use actix_web::{web, HttpResponse};

#[derive(serde::Deserialize)]
pub struct WeatherQuery {
    city: Option<String>,
    district: Option<String>,
}

/// `GET /api/weather?city=&district=`
///
/// Resolution is attempted with the city first; if the provider signals an
/// error code, a client error or an empty result, the district is tried as a
/// fallback before giving up with a 404.
#[tracing::instrument(
    name = "Looking up weather data.",
    skip(query, weather_client),
    fields(city = tracing::field::Empty, district = tracing::field::Empty)
)]
pub async fn get_weather(
    query: web::Query<WeatherQuery>,
    weather_client: web::Data<WeatherClient>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let city = require_param(query.city, "city")?;
    let district = require_param(query.district, "district")?;
    tracing::Span::current()
        .record("city", tracing::field::display(&city))
        .record("district", tracing::field::display(&district));

    let payload = match resolve_location(&weather_client, &city).await? {
        Some(payload) => payload,
        None => match resolve_location(&weather_client, &district).await? {
            Some(payload) => payload,
            None => {
                return Err(Error::NotFound(format!(
                    "Could not resolve weather data for `{}` or `{}`.",
                    city, district
                )))
            }
        },
    };

    let current = payload.current_conditions.as_ref().map(current_view);
    let hourly = payload.current_day().map(hourly_view).unwrap_or_default();
    let daily = daily_view(&payload.days);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "resolvedAddress": payload.resolved_address,
        "currentConditions": current,
        "hourly": hourly,
        "daily": daily,
    })))
}

fn require_param(value: Option<String>, name: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField(name))
}

/// `Ok(None)` means the provider answered but could not resolve the query;
/// transport failures and provider-side errors bubble up as 500s.
async fn resolve_location(
    weather_client: &WeatherClient,
    location_query: &str,
) -> AppResult<Option<WeatherPayload>> {
    match weather_client.fetch_weather(location_query).await {
        Ok(payload) if payload.is_resolved() => Ok(Some(payload)),
        Ok(_) => Ok(None),
        Err(UpstreamError::ErrorStatus(status)) if status.is_client_error() => Ok(None),
        Err(err) => Err(err.into()),
    }
}
