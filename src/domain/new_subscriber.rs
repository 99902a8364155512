//! src/domain/new_subscriber.rs

use crate::domain::PhoneNumber;

#[derive(Debug)]
pub struct NewSubscriber {
    pub phone_number: PhoneNumber,
    pub district: String,
    pub city: String,
}
