//! Fixed and generated bookings.

use chrono::{Duration, NaiveDate};
use pomar::{DataGenerator, Generate};
use serde_json::{json, Value};

use super::model::{Booking, BookingDates, PartialBooking};

/// Extras the generator draws from
pub const ADDITIONAL_NEEDS: [&str; 4] = ["Breakfast", "Lunch", "Dinner", "Spa"];

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn booking(
    name: (&str, &str),
    totalprice: i64,
    depositpaid: bool,
    stay: (NaiveDate, NaiveDate),
    additionalneeds: Option<&str>,
) -> Booking {
    Booking {
        firstname: name.0.to_string(),
        lastname: name.1.to_string(),
        totalprice,
        depositpaid,
        bookingdates: BookingDates {
            checkin: stay.0,
            checkout: stay.1,
        },
        additionalneeds: additionalneeds.map(str::to_string),
    }
}

/// Fully populated booking
#[must_use]
pub fn valid_booking() -> Booking {
    booking(
        ("John", "Doe"),
        250,
        true,
        (date(2024, 1, 1), date(2024, 1, 7)),
        Some("Breakfast"),
    )
}

/// Booking without `additionalneeds`
#[must_use]
pub fn booking_without_optional_fields() -> Booking {
    booking(
        ("Jane", "Smith"),
        150,
        false,
        (date(2024, 2, 1), date(2024, 2, 5)),
        None,
    )
}

/// The reference booking used by the create-and-fetch check
#[must_use]
pub fn alice_booking() -> Booking {
    booking(
        ("Alice", "Smith"),
        123,
        true,
        (date(2025, 7, 1), date(2025, 7, 7)),
        Some("Breakfast"),
    )
}

/// A body no booking can be parsed from; untyped on purpose
#[must_use]
pub fn invalid_booking() -> Value {
    json!({
        "firstname": "",
        "lastname": "Doe",
        "totalprice": -100,
        "depositpaid": "invalid",
        "bookingdates": {
            "checkin": "invalid-date",
            "checkout": "invalid-date"
        }
    })
}

impl Generate for Booking {
    fn full(data: &DataGenerator) -> Self {
        let checkin = data.future_date(30);
        let checkout = checkin + Duration::days(data.int_range(1..=14));
        Self {
            firstname: data.first_name(),
            lastname: data.last_name(),
            totalprice: data.int_range(100..=1000),
            depositpaid: data.boolean(),
            bookingdates: BookingDates { checkin, checkout },
            additionalneeds: data.pick(&ADDITIONAL_NEEDS).map(|s| (*s).to_string()),
        }
    }

    fn minimal(data: &DataGenerator) -> Self {
        Self {
            additionalneeds: None,
            ..Self::full(data)
        }
    }
}

impl Generate for PartialBooking {
    fn full(data: &DataGenerator) -> Self {
        Self {
            firstname: Some(data.first_name()),
            lastname: Some(data.last_name()),
            totalprice: Some(data.int_range(100..=1000)),
        }
    }

    fn minimal(data: &DataGenerator) -> Self {
        Self {
            firstname: Some(data.first_name()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_bookings() {
        let alice = alice_booking();
        assert_eq!(alice.firstname, "Alice");
        assert_eq!(alice.bookingdates.checkin.to_string(), "2025-07-01");
        assert_eq!(alice.bookingdates.nights(), 6);
        assert!(booking_without_optional_fields().additionalneeds.is_none());
        assert_eq!(valid_booking().totalprice, 250);
    }

    #[test]
    fn test_invalid_booking_does_not_parse() {
        assert!(serde_json::from_value::<Booking>(invalid_booking()).is_err());
    }

    #[test]
    fn test_minimal_has_no_extras() {
        let data = DataGenerator::seeded(3);
        assert!(Booking::minimal(&data).additionalneeds.is_none());
        let partial = PartialBooking::minimal(&data);
        assert!(partial.firstname.is_some());
        assert!(partial.totalprice.is_none());
    }

    mod property_tests {
        use super::*;

        proptest! {
            #[test]
            fn prop_generated_booking_is_plausible(seed in any::<u64>()) {
                let booking = Booking::full(&DataGenerator::seeded(seed));
                prop_assert!((100..=1000).contains(&booking.totalprice));
                prop_assert!(booking.bookingdates.checkout > booking.bookingdates.checkin);
                prop_assert!(!booking.firstname.is_empty());
                let needs = booking.additionalneeds.unwrap_or_default();
                prop_assert!(ADDITIONAL_NEEDS.contains(&needs.as_str()));
            }

            #[test]
            fn prop_same_seed_same_booking(seed in any::<u64>()) {
                prop_assert_eq!(
                    Booking::full(&DataGenerator::seeded(seed)),
                    Booking::full(&DataGenerator::seeded(seed))
                );
            }
        }
    }
}
