//! src/routes/subscriptions/unsubscribe.rs

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::domain::PhoneNumber;
use crate::error::{AppResult, Error};
use crate::store::delete_subscriber_by_phone;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeBody {
    phone_number: Option<String>,
}

/// `POST /api/unsubscribe`
#[tracing::instrument(name = "Removing a subscriber.", skip(body, pool))]
pub async fn unsubscribe(
    body: web::Json<UnsubscribeBody>,
    pool: web::Data<PgPool>,
) -> AppResult<HttpResponse> {
    let phone_number = PhoneNumber::parse(body.into_inner().phone_number.unwrap_or_default())?;
    if delete_subscriber_by_phone(&pool, &phone_number).await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": format!("{} unsubscribed from weather alerts.", phone_number),
        })))
    } else {
        Err(Error::NotFound(format!(
            "No subscription found for `{}`.",
            phone_number
        )))
    }
}
