//! tests/api/subscriptions.rs

use crate::helpers::{spawn_app, spawn_app_in_test_mode};
use wiremock::matchers::{body_string_contains, method, path_regex, PathRegexMatcher};
use wiremock::{Mock, ResponseTemplate};

fn sms_endpoint() -> PathRegexMatcher {
    path_regex(r"^/2010-04-01/Accounts/.+/Messages\.json$")
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    // Arrange
    let test_app = spawn_app().await;

    Mock::given(method("POST"))
        .and(sms_endpoint())
        .respond_with(ResponseTemplate::new(201))
        .mount(&test_app.sms_server)
        .await;

    // Act
    let response = test_app
        .post_subscribe(&serde_json::json!({
            "phoneNumber": "9876543210",
            "district": "Chennai",
            "city": "Chennai"
        }))
        .await;

    // Assert
    assert_eq!(201, response.status().as_u16());

    let subscribers = test_app.stored_subscribers().await;
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].phone_number, "9876543210");
    assert_eq!(subscribers[0].city, "Chennai");
    assert_eq!(subscribers[0].district, "Chennai");
}

#[tokio::test]
async fn subscribe_sends_a_confirmation_sms_with_the_country_code() {
    // Arrange
    let test_app = spawn_app().await;

    Mock::given(method("POST"))
        .and(sms_endpoint())
        .and(body_string_contains("To=%2B919876543210"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&test_app.sms_server)
        .await;

    // Act
    let response = test_app
        .post_subscribe(&serde_json::json!({
            "phoneNumber": "9876543210",
            "district": "Chennai",
            "city": "Chennai"
        }))
        .await;

    // Assert
    assert_eq!(201, response.status().as_u16());
    // Mock expectations are verified on drop.
}

#[tokio::test]
async fn subscribe_returns_a_400_when_fields_are_missing_or_malformed() {
    // Arrange
    let test_app = spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({ "district": "Chennai", "city": "Chennai" }),
            "missing the phone number",
        ),
        (
            serde_json::json!({
                "phoneNumber": "987654321",
                "district": "Chennai",
                "city": "Chennai"
            }),
            "nine-digit phone number",
        ),
        (
            serde_json::json!({
                "phoneNumber": "98765o4321",
                "district": "Chennai",
                "city": "Chennai"
            }),
            "phone number containing a letter",
        ),
        (
            serde_json::json!({ "phoneNumber": "9876543210", "city": "Chennai" }),
            "missing the district",
        ),
        (
            serde_json::json!({
                "phoneNumber": "9876543210",
                "district": "Chennai",
                "city": ""
            }),
            "empty city",
        ),
    ];

    for (invalid_body, test_failing_message) in test_cases {
        // Act
        let response = test_app.post_subscribe(&invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            // Additional customized error message on test failure
            "The API did not fail with 400 Bad Request when payload was {}.",
            test_failing_message
        );
    }
    assert!(test_app.stored_subscribers().await.is_empty());
}

#[tokio::test]
async fn subscribing_twice_returns_200_and_keeps_a_single_record() {
    // Arrange
    let test_app = spawn_app().await;
    let body = serde_json::json!({
        "phoneNumber": "9876543210",
        "district": "Chennai",
        "city": "Chennai"
    });

    // Only the first subscribe may reach the messaging provider.
    Mock::given(method("POST"))
        .and(sms_endpoint())
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&test_app.sms_server)
        .await;

    // Act
    let first_response = test_app.post_subscribe(&body).await;
    let second_response = test_app.post_subscribe(&body).await;

    // Assert
    assert_eq!(201, first_response.status().as_u16());
    assert_eq!(200, second_response.status().as_u16());

    let message = second_response
        .json::<serde_json::Value>()
        .await
        .unwrap()["message"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(
        message.contains("already subscribed"),
        "unexpected message: {}",
        message
    );

    assert_eq!(test_app.stored_subscribers().await.len(), 1);
}

#[tokio::test]
async fn subscribe_returns_a_500_but_keeps_the_record_if_sms_delivery_fails() {
    // Arrange
    let test_app = spawn_app().await;

    Mock::given(method("POST"))
        .and(sms_endpoint())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.sms_server)
        .await;

    // Act
    let response = test_app
        .post_subscribe(&serde_json::json!({
            "phoneNumber": "9876543210",
            "district": "Chennai",
            "city": "Chennai"
        }))
        .await;

    // Assert
    // The row is persisted before the confirmation is dispatched; a delivery
    // failure surfaces as a 500 while the subscription stays in place.
    assert_eq!(500, response.status().as_u16());
    assert_eq!(test_app.stored_subscribers().await.len(), 1);
}

#[tokio::test]
async fn subscribe_in_test_mode_skips_the_confirmation_sms() {
    // Arrange
    let test_app = spawn_app_in_test_mode().await;

    Mock::given(method("POST"))
        .and(sms_endpoint())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.sms_server)
        .await;

    // Act
    let response = test_app
        .post_subscribe(&serde_json::json!({
            "phoneNumber": "9876543210",
            "district": "Chennai",
            "city": "Chennai"
        }))
        .await;

    // Assert
    assert_eq!(201, response.status().as_u16());
    assert_eq!(test_app.stored_subscribers().await.len(), 1);
}
