//! src/domain/mod.rs

mod new_subscriber;
mod phone_number;
mod subscriber;

pub use new_subscriber::NewSubscriber;
pub use phone_number::PhoneNumber;
pub use subscriber::Subscriber;

/// Validation error for domain data
#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("`{0}` is not a valid 10-digit phone number.")]
    InvalidPhoneNumber(String),
    #[error("Missing or empty field `{0}`.")]
    MissingField(&'static str),
}
