//! src/alert_worker.rs

use crate::{
    configuration::Settings,
    domain::{PhoneNumber, Subscriber},
    sms_client::SmsClient,
    sms_templates::alert_body,
    startup::get_connection_pool,
    store::fetch_all_subscribers,
    weather_client::{current_view, WeatherClient},
};
use anyhow::Context;
use chrono::{Timelike, Utc};
use sqlx::PgPool;
use std::time::Duration;

pub async fn run_alert_worker_until_stopped(configuration: Settings) -> Result<(), anyhow::Error> {
    let connection_pool = get_connection_pool(&configuration.database);
    let weather_client = configuration.weather_client.client();
    let sms_client = configuration.sms_client.client();
    worker_loop(connection_pool, weather_client, sms_client).await
}

async fn worker_loop(
    pool: PgPool,
    weather_client: WeatherClient,
    sms_client: SmsClient,
) -> Result<(), anyhow::Error> {
    loop {
        tokio::time::sleep(until_next_hour()).await;
        // The tick is awaited to completion before the next boundary is
        // computed: a pass that outlives its hour skips boundaries instead
        // of overlapping with itself.
        match run_alert_tick(&pool, &weather_client, &sms_client).await {
            Ok(summary) => {
                tracing::info!(
                    delivered = summary.delivered,
                    failed = summary.failed,
                    "Alert tick completed."
                );
            }
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Alert tick failed before reaching the subscriber loop."
                );
            }
        }
    }
}

fn until_next_hour() -> Duration {
    let now = Utc::now();
    let seconds_into_hour = u64::from(now.minute()) * 60 + u64::from(now.second());
    Duration::from_secs(3600 - seconds_into_hour)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub delivered: u64,
    pub failed: u64,
}

/// One pass over the full subscriber set, sequentially and in store order.
/// A failing subscriber is logged and counted; it never aborts the pass.
#[tracing::instrument(name = "Running an alert tick.", skip_all)]
pub async fn run_alert_tick(
    pool: &PgPool,
    weather_client: &WeatherClient,
    sms_client: &SmsClient,
) -> Result<TickSummary, anyhow::Error> {
    let subscribers = fetch_all_subscribers(pool).await?;
    let mut summary = TickSummary::default();
    for subscriber in subscribers {
        match alert_subscriber(weather_client, sms_client, &subscriber).await {
            Ok(()) => summary.delivered += 1,
            Err(e) => {
                summary.failed += 1;
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    subscriber_phone = %subscriber.phone_number,
                    "Failed to deliver a weather alert. Skipping this subscriber.",
                );
            }
        }
    }
    Ok(summary)
}

#[tracing::instrument(
    name = "Sending a weather alert to a subscriber.",
    skip_all,
    fields(
        subscriber_phone = %subscriber.phone_number,
        subscriber_city = %subscriber.city
    )
)]
async fn alert_subscriber(
    weather_client: &WeatherClient,
    sms_client: &SmsClient,
    subscriber: &Subscriber,
) -> Result<(), anyhow::Error> {
    // Rows are only validated at subscribe time; skip anything that
    // no longer parses.
    let phone_number = PhoneNumber::parse(subscriber.phone_number.clone())
        .context("Stored phone number is invalid.")?;
    let payload = weather_client
        .fetch_weather(&subscriber.city)
        .await
        .context("Failed to fetch weather for the subscriber's city.")?;
    let current = payload
        .current_conditions
        .as_ref()
        .context("The weather provider returned no current conditions.")?;
    let body = alert_body(&subscriber.city, &current_view(current));
    sms_client
        .send_sms(&phone_number, &body)
        .await
        .context("Failed to dispatch the alert SMS.")?;
    Ok(())
}
