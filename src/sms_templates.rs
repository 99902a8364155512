//! src/sms_templates.rs
//!
//! Both message bodies live here so the confirmation and the hourly alert
//! keep identical wording and units (Fahrenheit, mph) for a given setup.

use crate::weather_client::CurrentView;

pub fn confirmation_body(city: &str) -> String {
    format!(
        "You are now subscribed to hourly weather alerts for {}. \
        Temperatures are reported in degrees Fahrenheit, wind speeds in mph.",
        city
    )
}

pub fn alert_body(city: &str, current: &CurrentView) -> String {
    let conditions = current.conditions.as_deref().unwrap_or("Conditions unavailable");
    format!(
        "Weather update for {}: {}. Temperature {}, feels like {}, humidity {}, wind {}.",
        city,
        conditions,
        fahrenheit(current.temp),
        fahrenheit(current.feelslike),
        percent(current.humidity),
        mph(current.windspeed),
    )
}

fn fahrenheit(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}°F", v),
        None => "n/a".into(),
    }
}

fn mph(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1} mph", v),
        None => "n/a".into(),
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}%", v),
        None => "n/a".into(),
    }
}
