//! src/domain/subscriber.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A subscriber row as persisted in the `subscribers` table.
///
/// The phone number is kept as the raw stored string; consumers
/// that need a validated number re-parse it with [`PhoneNumber::parse`]
/// and decide how to handle invalid stored data.
///
/// [`PhoneNumber::parse`]: crate::domain::PhoneNumber::parse
#[derive(Debug, sqlx::FromRow)]
pub struct Subscriber {
    pub id: Uuid,
    pub phone_number: String,
    pub district: String,
    pub city: String,
    pub subscribed_at: DateTime<Utc>,
}
