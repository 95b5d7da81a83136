//! Restful-booker catalogue and services against a local replica.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::booker::{booker_api, TOKEN};
use common::{assert_all_passed, serve, test_config};
use pomar::{ApiClient, FakeSessionFactory, FakeSite, RunOptions, Runner};
use pomar_suites::booker::{
    alice_booking, invalid_booking, suite, AuthService, BookingService, DEFAULTS,
};
use std::sync::Arc;

#[tokio::test]
async fn test_every_scenario_passes() {
    let base = serve(booker_api()).await;
    let dir = tempfile::tempdir().unwrap();
    let suite = suite(test_config(&DEFAULTS, &base, dir.path()));

    // API scenarios never open a page, so the site is never consulted
    let factory = Arc::new(FakeSessionFactory::new(FakeSite::new(&base)));
    let results = Runner::new(factory.clone(), RunOptions::new().with_seed(common::SEED))
        .run_suite(&suite)
        .await;

    assert_eq!(results.len(), suite.len());
    assert_all_passed(&results);
    assert_eq!(factory.sessions_opened(), 0);
}

#[tokio::test]
async fn test_alice_booking_is_stored_and_fetched() {
    let base = serve(booker_api()).await;
    let bookings = BookingService::new(ApiClient::new(&base));

    let created = bookings.create(&alice_booking()).await.unwrap();
    assert!(created.bookingid > 0);
    assert_eq!(created.booking.firstname, "Alice");

    let fetched = bookings.get(created.bookingid).await.unwrap();
    assert_eq!(fetched, alice_booking());
}

#[tokio::test]
async fn test_default_credentials_yield_the_token() {
    let base = serve(booker_api()).await;
    let auth = AuthService::new(ApiClient::new(&base));
    let config = test_config(&DEFAULTS, &base, std::path::Path::new("unused"));

    let token = auth.default_token(&config.credentials).await.unwrap();

    assert_eq!(token, TOKEN);
}

#[tokio::test]
async fn test_invalid_payload_is_not_accepted() {
    let base = serve(booker_api()).await;
    let bookings = BookingService::new(ApiClient::new(&base));

    let response = bookings.create_raw(&invalid_booking()).await.unwrap();

    assert!(!response.is_success());
}

#[tokio::test]
async fn test_delete_needs_the_token() {
    let base = serve(booker_api()).await;
    let anonymous = BookingService::new(ApiClient::new(&base));
    let created = anonymous.create(&alice_booking()).await.unwrap();

    assert!(anonymous.delete(created.bookingid).await.is_err());
    anonymous
        .with_token(TOKEN)
        .delete(created.bookingid)
        .await
        .unwrap();
    let gone = anonymous.get_raw(created.bookingid).await.unwrap();
    assert_eq!(gone.status, 404);
}
