//! tests/api/alert_worker.rs

use crate::helpers::{spawn_app, weather_provider_body, TestApp};
use weather_alerts::alert_worker::TickSummary;
use weather_alerts::domain::{NewSubscriber, PhoneNumber};
use weather_alerts::store::insert_subscriber;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn insert_test_subscriber(test_app: &TestApp, phone: &str, city: &str) {
    let new_subscriber = NewSubscriber {
        phone_number: PhoneNumber::parse(phone.to_string()).unwrap(),
        district: city.to_string(),
        city: city.to_string(),
    };
    insert_subscriber(&test_app.db_pool, &new_subscriber)
        .await
        .expect("Failed to seed a test subscriber.");
}

#[tokio::test]
async fn a_tick_without_subscribers_completes_without_any_provider_calls() {
    // Arrange
    let test_app = spawn_app().await;

    // Act
    let summary = test_app.run_alert_tick().await;

    // Assert
    assert_eq!(
        summary,
        TickSummary {
            delivered: 0,
            failed: 0
        }
    );
    assert!(test_app.weather_server.received_requests().await.unwrap().is_empty());
    assert!(test_app.sms_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn a_tick_sends_one_alert_per_subscriber() {
    // Arrange
    let test_app = spawn_app().await;
    insert_test_subscriber(&test_app, "9876543210", "Chennai").await;
    insert_test_subscriber(&test_app, "9876543211", "Madurai").await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(weather_provider_body("Tamil Nadu, India")),
        )
        .expect(2)
        .mount(&test_app.weather_server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("Weather+update+for"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&test_app.sms_server)
        .await;

    // Act
    let summary = test_app.run_alert_tick().await;

    // Assert
    assert_eq!(
        summary,
        TickSummary {
            delivered: 2,
            failed: 0
        }
    );
}

#[tokio::test]
async fn a_failing_subscriber_does_not_abort_the_tick() {
    // Arrange
    let test_app = spawn_app().await;
    insert_test_subscriber(&test_app, "9876543210", "Chennai").await;
    insert_test_subscriber(&test_app, "9876543211", "Neverwhere").await;
    insert_test_subscriber(&test_app, "9876543212", "Madurai").await;

    // The second subscriber's weather fetch blows up; the others succeed.
    Mock::given(method("GET"))
        .and(path("/Neverwhere"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.weather_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(weather_provider_body("Tamil Nadu, India")),
        )
        .expect(2)
        .mount(&test_app.weather_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&test_app.sms_server)
        .await;

    // Act
    let summary = test_app.run_alert_tick().await;

    // Assert
    assert_eq!(
        summary,
        TickSummary {
            delivered: 2,
            failed: 1
        }
    );

    // Alerts for the healthy subscribers were dispatched in store order.
    let sms_requests = test_app.sms_server.received_requests().await.unwrap();
    assert_eq!(sms_requests.len(), 2);
    let bodies: Vec<String> = sms_requests
        .iter()
        .map(|r| String::from_utf8(r.body.clone()).unwrap())
        .collect();
    assert!(bodies[0].contains("To=%2B919876543210"));
    assert!(bodies[1].contains("To=%2B919876543212"));
}

#[tokio::test]
async fn an_sms_rejection_is_counted_as_a_failure() {
    // Arrange
    let test_app = spawn_app().await;
    insert_test_subscriber(&test_app, "9876543210", "Chennai").await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(weather_provider_body("Chennai, Tamil Nadu, India")),
        )
        .expect(1)
        .mount(&test_app.weather_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&test_app.sms_server)
        .await;

    // Act
    let summary = test_app.run_alert_tick().await;

    // Assert
    assert_eq!(
        summary,
        TickSummary {
            delivered: 0,
            failed: 1
        }
    );
}
