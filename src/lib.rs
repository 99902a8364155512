//! src/lib.rs
pub mod alert_worker;
pub mod configuration;
pub mod domain;
pub mod error;
pub mod routes;
pub mod sms_client;
pub mod sms_templates;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod weather_client;
