//! src/startup.rs

use crate::configuration::{DatabaseSettings, ExecutionMode, Settings};
use crate::routes::{get_weather, health_check, subscribe, unsubscribe};
use crate::sms_client::SmsClient;
use crate::weather_client::WeatherClient;
use actix_web::{dev::Server, web, web::Data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let weather_client = configuration.weather_client.client();
        let sms_client = configuration.sms_client.client();

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            connection_pool,
            weather_client,
            sms_client,
            configuration.application.execution_mode,
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.with_db())
}

fn run(
    listener: TcpListener,
    db_pool: PgPool,
    weather_client: WeatherClient,
    sms_client: SmsClient,
    execution_mode: ExecutionMode,
) -> Result<Server, anyhow::Error> {
    // Wrap shared state in smart pointers once, clone per worker.
    let db_pool = Data::new(db_pool);
    let weather_client = Data::new(weather_client);
    let sms_client = Data::new(sms_client);
    let execution_mode = Data::new(execution_mode);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/weather", web::get().to(get_weather))
            .route("/api/subscribe", web::post().to(subscribe))
            .route("/api/unsubscribe", web::post().to(unsubscribe))
            .app_data(db_pool.clone())
            .app_data(weather_client.clone())
            .app_data(sms_client.clone())
            .app_data(execution_mode.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
