//! src/routes/mod.rs

mod health_check;
mod subscriptions;
mod weather;

pub use health_check::*;
pub use subscriptions::*;
pub use weather::*;
