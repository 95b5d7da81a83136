//! Restful Booker: a REST booking API with cookie-token auth.
//!
//! Reads are open; `PUT`, `PATCH` and `DELETE` need a token from
//! `POST /auth`, sent back as the `token` cookie.

mod data;
mod model;
mod services;
mod scenarios;

pub use data::{
    alice_booking, booking_without_optional_fields, invalid_booking, valid_booking,
    ADDITIONAL_NEEDS,
};
pub use model::{
    AuthRequest, AuthResponse, Booking, BookingDates, BookingId, BookingResponse, PartialBooking,
};
pub use scenarios::suite;
pub use services::{AuthService, BookingService};

use pomar::SuiteDefaults;

/// Hosted API and its admin account
pub const DEFAULTS: SuiteDefaults = SuiteDefaults::new("booker", "https://restful-booker.herokuapp.com")
    .with_credentials("admin", "password123");
