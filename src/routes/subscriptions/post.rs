//! src/routes/subscriptions/post.rs

use actix_web::{web, HttpResponse};
use anyhow::Context;
use sqlx::PgPool;
use tracing::{field::display, Span};

use crate::configuration::ExecutionMode;
use crate::domain::{NewSubscriber, PhoneNumber, Subscriber, ValidationError};
use crate::error::AppResult;
use crate::sms_client::SmsClient;
use crate::sms_templates::confirmation_body;
use crate::store::{get_subscriber_by_phone, insert_subscriber, is_phone_subscribed_twice_err};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeBody {
    phone_number: Option<String>,
    district: Option<String>,
    city: Option<String>,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = ValidationError;

    fn try_from(value: SubscribeBody) -> Result<Self, Self::Error> {
        let phone_number = PhoneNumber::parse(value.phone_number.unwrap_or_default())?;
        let district = value
            .district
            .filter(|d| !d.trim().is_empty())
            .ok_or(ValidationError::MissingField("district"))?;
        let city = value
            .city
            .filter(|c| !c.trim().is_empty())
            .ok_or(ValidationError::MissingField("city"))?;
        Ok(Self {
            phone_number,
            district,
            city,
        })
    }
}

/// `POST /api/subscribe`
///
/// A phone number that is already enrolled is a success path: 200 with an
/// informational message, no new row, no SMS. A fresh number is persisted
/// first; the confirmation SMS comes after, so a delivery failure leaves the
/// row in place and surfaces as a 500.
#[tracing::instrument(
    name = "Adding a new subscriber.",
    skip(body, pool, sms_client, execution_mode),
    fields(
        subscriber_phone = tracing::field::Empty,
        subscriber_city = tracing::field::Empty
    )
)]
pub async fn subscribe(
    body: web::Json<SubscribeBody>,
    pool: web::Data<PgPool>,
    sms_client: web::Data<SmsClient>,
    execution_mode: web::Data<ExecutionMode>,
) -> AppResult<HttpResponse> {
    let new_subscriber: NewSubscriber = body.into_inner().try_into()?;
    Span::current()
        .record("subscriber_phone", display(&new_subscriber.phone_number))
        .record("subscriber_city", display(&new_subscriber.city));

    if let Some(existing) = get_subscriber_by_phone(&pool, &new_subscriber.phone_number).await? {
        return Ok(already_subscribed_response(&existing));
    }
    if let Err(err) = insert_subscriber(&pool, &new_subscriber).await {
        if is_phone_subscribed_twice_err(&err) {
            // Lost an insert race against a concurrent subscribe.
            let existing = get_subscriber_by_phone(&pool, &new_subscriber.phone_number)
                .await?
                .context("Subscriber vanished after a unique-constraint violation.")?;
            return Ok(already_subscribed_response(&existing));
        }
        return Err(err.into());
    }
    if *execution_mode.get_ref() == ExecutionMode::Live {
        sms_client
            .send_sms(
                &new_subscriber.phone_number,
                &confirmation_body(&new_subscriber.city),
            )
            .await?;
    }
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": format!(
            "Subscribed {} to hourly weather alerts for {}.",
            new_subscriber.phone_number, new_subscriber.city
        ),
    })))
}

fn already_subscribed_response(existing: &Subscriber) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!(
            "{} is already subscribed to weather alerts for {}, {}.",
            existing.phone_number, existing.city, existing.district
        ),
    }))
}
