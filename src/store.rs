//! src/store.rs
//!
//! CRUD over the `subscribers` collection, keyed by phone number. There is
//! no update operation; a subscription is created once and deleted once.

use crate::domain::{NewSubscriber, PhoneNumber, Subscriber};
use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "Looking up a subscriber by phone number.", skip(pool))]
pub async fn get_subscriber_by_phone(
    pool: &PgPool,
    phone_number: &PhoneNumber,
) -> Result<Option<Subscriber>, anyhow::Error> {
    let subscriber = sqlx::query_as::<_, Subscriber>(
        "SELECT id, phone_number, district, city, subscribed_at \
        FROM subscribers \
        WHERE phone_number = $1",
    )
    .bind(phone_number.as_ref())
    .fetch_optional(pool)
    .await
    .context("Failed to read subscriber from the database.")?;
    Ok(subscriber)
}

/// Inserts a new subscriber row. A duplicate phone number surfaces as a
/// unique-constraint violation; the caller classifies it with
/// [`is_phone_subscribed_twice_err`].
#[tracing::instrument(
    name = "Saving new subscriber details in the database.",
    skip(pool, new_subscriber)
)]
pub async fn insert_subscriber(
    pool: &PgPool,
    new_subscriber: &NewSubscriber,
) -> Result<Uuid, anyhow::Error> {
    let subscriber_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO subscribers (id, phone_number, district, city, subscribed_at) \
        VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(subscriber_id)
    .bind(new_subscriber.phone_number.as_ref())
    .bind(&new_subscriber.district)
    .bind(&new_subscriber.city)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to insert new subscriber in the database.")?;
    Ok(subscriber_id)
}

/// Checks if err results from trying to subscribe the same phone number twice
pub fn is_phone_subscribed_twice_err(err: &anyhow::Error) -> bool {
    if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                return constraint == "subscribers_phone_number_key";
            }
        }
    }
    false
}

#[tracing::instrument(name = "Removing a subscriber from the database.", skip(pool))]
pub async fn delete_subscriber_by_phone(
    pool: &PgPool,
    phone_number: &PhoneNumber,
) -> Result<bool, anyhow::Error> {
    let result = sqlx::query("DELETE FROM subscribers WHERE phone_number = $1")
        .bind(phone_number.as_ref())
        .execute(pool)
        .await
        .context("Failed to delete subscriber from the database.")?;
    Ok(result.rows_affected() > 0)
}

/// Loads the full subscriber set in one pass, in subscription order. Used by
/// the alert worker at every tick.
#[tracing::instrument(name = "Loading all subscribers.", skip_all)]
pub async fn fetch_all_subscribers(pool: &PgPool) -> Result<Vec<Subscriber>, anyhow::Error> {
    let subscribers = sqlx::query_as::<_, Subscriber>(
        "SELECT id, phone_number, district, city, subscribed_at \
        FROM subscribers \
        ORDER BY subscribed_at",
    )
    .fetch_all(pool)
    .await
    .context("Failed to load the subscriber list from the database.")?;
    Ok(subscribers)
}
