//! main.rs

use std::fmt::{Debug, Display};
use tokio::task::JoinError;
use weather_alerts::alert_worker::run_alert_worker_until_stopped;
use weather_alerts::configuration::get_configuration;
use weather_alerts::startup::Application;
use weather_alerts::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("weather-alerts".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    // Panic if we can't read configuration
    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(configuration.clone()).await?;
    let application_task = tokio::spawn(application.run_until_stopped());
    let alert_worker_task = tokio::spawn(run_alert_worker_until_stopped(configuration));

    tokio::select! {
        o = application_task => report_exit("API", o),
        o = alert_worker_task => report_exit("Hourly alert worker", o),
    };

    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            )
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} task failed to complete",
                task_name
            )
        }
    }
}
