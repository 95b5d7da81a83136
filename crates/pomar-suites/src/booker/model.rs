//! Wire shapes of the restful-booker API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stay dates; serialized as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDates {
    /// Arrival
    pub checkin: NaiveDate,
    /// Departure
    pub checkout: NaiveDate,
}

impl BookingDates {
    /// Number of nights between check-in and check-out
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.checkout - self.checkin).num_days()
    }
}

/// A booking as sent and returned by `/booking`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Guest given name
    pub firstname: String,
    /// Guest family name
    pub lastname: String,
    /// Price in whole units
    pub totalprice: i64,
    /// Whether a deposit was taken
    pub depositpaid: bool,
    /// Stay dates
    pub bookingdates: BookingDates,
    /// Free-text extras; the API omits it when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

/// Fields accepted by `PATCH /booking/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialBooking {
    /// New given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    /// New family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    /// New price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totalprice: Option<i64>,
}

impl PartialBooking {
    /// Apply the set fields onto `booking`
    #[must_use]
    pub fn apply_to(&self, booking: &Booking) -> Booking {
        let mut merged = booking.clone();
        if let Some(firstname) = &self.firstname {
            merged.firstname.clone_from(firstname);
        }
        if let Some(lastname) = &self.lastname {
            merged.lastname.clone_from(lastname);
        }
        if let Some(totalprice) = self.totalprice {
            merged.totalprice = totalprice;
        }
        merged
    }
}

/// Body of a successful `POST /booking`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    /// Assigned id
    pub bookingid: u64,
    /// Echo of the stored booking
    pub booking: Booking,
}

/// One entry of `GET /booking`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingId {
    /// Booking id
    pub bookingid: u64,
}

/// Body of `POST /auth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl AuthRequest {
    /// Request for the given credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Reply of `POST /auth`: a token, or a reason when refused.
///
/// The API answers 200 in both cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Session token
    #[serde(default)]
    pub token: Option<String>,
    /// Refusal reason, e.g. `Bad credentials`
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod booking_tests {
        use super::*;

        #[test]
        fn test_dates_serialize_as_iso() {
            let dates = BookingDates {
                checkin: date(2025, 7, 1),
                checkout: date(2025, 7, 7),
            };
            let json = serde_json::to_value(dates).unwrap();
            assert_eq!(json["checkin"], "2025-07-01");
            assert_eq!(json["checkout"], "2025-07-07");
            assert_eq!(dates.nights(), 6);
        }

        #[test]
        fn test_missing_additional_needs_is_none() {
            let booking: Booking = serde_json::from_str(
                r#"{"firstname":"Jane","lastname":"Smith","totalprice":150,"depositpaid":false,
                    "bookingdates":{"checkin":"2024-02-01","checkout":"2024-02-05"}}"#,
            )
            .unwrap();
            assert_eq!(booking.additionalneeds, None);
            let back = serde_json::to_value(&booking).unwrap();
            assert!(back.get("additionalneeds").is_none());
        }

        #[test]
        fn test_partial_only_sends_set_fields() {
            let partial = PartialBooking {
                firstname: Some("Bob".into()),
                ..PartialBooking::default()
            };
            assert_eq!(serde_json::to_string(&partial).unwrap(), r#"{"firstname":"Bob"}"#);
        }

        #[test]
        fn test_partial_apply_keeps_unset_fields() {
            let booking = Booking {
                firstname: "Ann".into(),
                lastname: "Lee".into(),
                totalprice: 10,
                depositpaid: true,
                bookingdates: BookingDates {
                    checkin: date(2024, 1, 1),
                    checkout: date(2024, 1, 2),
                },
                additionalneeds: None,
            };
            let partial = PartialBooking {
                totalprice: Some(99),
                ..PartialBooking::default()
            };
            let merged = partial.apply_to(&booking);
            assert_eq!(merged.totalprice, 99);
            assert_eq!(merged.firstname, "Ann");
        }
    }

    mod auth_tests {
        use super::*;

        #[test]
        fn test_auth_reply_variants() {
            let ok: AuthResponse = serde_json::from_str(r#"{"token":"abc123"}"#).unwrap();
            assert_eq!(ok.token.as_deref(), Some("abc123"));
            let refused: AuthResponse = serde_json::from_str(r#"{"reason":"Bad credentials"}"#).unwrap();
            assert_eq!(refused.token, None);
            assert_eq!(refused.reason.as_deref(), Some("Bad credentials"));
        }
    }
}
