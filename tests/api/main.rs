//! tests/api/main.rs

mod alert_worker;
mod subscriptions;
