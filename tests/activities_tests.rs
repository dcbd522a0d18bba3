// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tests for activity fetching: field mapping, ordering, pagination, and
//! the single refresh-and-retry on a rejected access token.

use chrono::Utc;
use kudos_dashboard::error::{AuthError, FetchError};
use kudos_dashboard::services::{Credentials, StravaService};
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer) -> StravaService {
    StravaService::with_endpoints(
        Credentials {
            client_id: "X".to_string(),
            client_secret: "Y".to_string(),
            refresh_token: "Z".to_string(),
        },
        format!("{}/oauth/token", server.uri()),
        server.uri(),
    )
}

fn token_response(access_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "access_token": access_token,
        "refresh_token": "rotated",
        "expires_at": Utc::now().timestamp() + 3600,
    }))
}

async fn mount_token(server: &MockServer, access_token: &str, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(token_response(access_token))
        .expect(expect)
        .mount(server)
        .await;
}

fn activity_json(id: u64, name: &str, start_date: &str, kudos: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "sport_type": "Ride",
        "distance": 25000.0,
        "moving_time": 3600,
        "elapsed_time": 3900,
        "start_date": start_date,
        "average_speed": 6.94,
        "kudos_count": kudos,
        "total_elevation_gain": 350.0,
        // Upstream fields we don't model must be ignored, not rejected.
        "athlete": {"id": 12345},
        "trainer": false,
    })
}

#[tokio::test]
async fn activities_map_one_to_one_from_upstream() {
    let server = MockServer::start().await;
    mount_token(&server, "abc", 1).await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(bearer_token("abc"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            activity_json(101, "Morning Ride", "2024-03-10T08:00:00Z", 12),
            activity_json(102, "Lunch Run", "2024-03-09T12:00:00Z", 4),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let activities = service(&server).list_activities(1, 2).await.unwrap();

    assert_eq!(activities.len(), 2);

    let first = &activities[0];
    assert_eq!(first.id, 101);
    assert_eq!(first.name, "Morning Ride");
    assert_eq!(first.sport_type, "Ride");
    assert_eq!(first.distance, 25000.0);
    assert_eq!(first.moving_time, 3600);
    assert_eq!(first.elapsed_time, 3900);
    assert_eq!(first.start_date.to_rfc3339(), "2024-03-10T08:00:00+00:00");
    assert_eq!(first.average_speed, 6.94);
    assert_eq!(first.kudos_count, 12);

    assert_eq!(activities[1].id, 102);
    assert_eq!(activities[1].kudos_count, 4);
}

#[tokio::test]
async fn activities_preserve_upstream_ordering() {
    let server = MockServer::start().await;
    mount_token(&server, "abc", 1).await;

    // Most recent first, as Strava returns them.
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            activity_json(1, "A", "2024-03-10T08:00:00Z", 3),
            activity_json(2, "B", "2024-03-09T08:00:00Z", 2),
            activity_json(3, "C", "2024-03-08T08:00:00Z", 1),
        ])))
        .mount(&server)
        .await;

    let activities = service(&server).list_activities(1, 30).await.unwrap();

    let ids: Vec<u64> = activities.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(activities[0].start_date > activities[1].start_date);
    assert!(activities[1].start_date > activities[2].start_date);
}

#[tokio::test]
async fn rejected_token_refreshes_and_retries_once() {
    let server = MockServer::start().await;

    // First exchange hands out a token Strava no longer accepts; the forced
    // refresh hands out a good one.
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(token_response("stale"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(token_response("fresh"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(bearer_token("stale"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Authorization Error"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(bearer_token("fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            activity_json(1, "A", "2024-03-10T08:00:00Z", 3),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let activities = service(&server).list_activities(1, 30).await.unwrap();
    assert_eq!(activities.len(), 1);
}

#[tokio::test]
async fn persistent_401_surfaces_auth_error_after_one_retry() {
    let server = MockServer::start().await;

    // Exactly two exchanges: the initial one plus the single forced refresh.
    mount_token(&server, "abc", 2).await;

    // Exactly two fetch attempts: the initial one plus the single retry.
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Authorization Error"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let err = service(&server)
        .list_activities(1, 30)
        .await
        .expect_err("persistent 401 should fail");
    assert!(
        matches!(err, FetchError::Auth(AuthError::TokenRejected)),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn rate_limit_is_fetch_error_without_retry() {
    let server = MockServer::start().await;
    mount_token(&server, "abc", 1).await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(serde_json::json!({"message": "Rate Limit Exceeded"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = service(&server).list_activities(1, 30).await.unwrap_err();
    assert!(matches!(err, FetchError::RateLimited));
}

#[tokio::test]
async fn upstream_5xx_is_status_error() {
    let server = MockServer::start().await;
    mount_token(&server, "abc", 1).await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&server)
        .await;

    let err = service(&server).list_activities(1, 30).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn schema_mismatch_is_fetch_error() {
    let server = MockServer::start().await;
    mount_token(&server, "abc", 1).await;

    // An object where an array of activities is expected.
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
        .mount(&server)
        .await;

    let err = service(&server).list_activities(1, 30).await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[tokio::test]
async fn list_all_pages_until_short_page_in_order() {
    let server = MockServer::start().await;
    mount_token(&server, "abc", 1).await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            activity_json(1, "A", "2024-03-10T08:00:00Z", 3),
            activity_json(2, "B", "2024-03-09T08:00:00Z", 2),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            activity_json(3, "C", "2024-03-08T08:00:00Z", 1),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let activities = service(&server).list_all_activities(2).await.unwrap();

    let ids: Vec<u64> = activities.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
