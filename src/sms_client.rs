//! src/sms_client.rs

use crate::domain::PhoneNumber;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("Failed to reach the messaging provider.")]
    Transport(#[from] reqwest::Error),
    #[error("The messaging provider rejected the message with status {0}.")]
    Rejected(StatusCode),
}

#[derive(Clone)]
pub struct SmsClient {
    http_client: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: Secret<String>,
    sender_number: String,
    country_code: String,
}

impl SmsClient {
    pub fn new(
        base_url: String,
        account_sid: String,
        auth_token: Secret<String>,
        sender_number: String,
        country_code: String,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            account_sid,
            auth_token,
            sender_number,
            country_code,
        }
    }

    /// Dispatch one SMS to a stored local number. The configured country
    /// code is prefixed before handing the number to the provider.
    pub async fn send_sms(&self, to: &PhoneNumber, body: &str) -> Result<(), DeliveryError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let form = [
            ("To", format!("{}{}", self.country_code, to)),
            ("From", self.sender_number.clone()),
            ("Body", body.to_owned()),
        ];
        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DeliveryError::Rejected(response.status()));
        }
        Ok(())
    }
}
