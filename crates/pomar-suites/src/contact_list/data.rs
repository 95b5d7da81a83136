//! Users and contacts for the contact-list app.

use pomar::{DataGenerator, Generate};
use serde::{Deserialize, Serialize};

/// Emails the app must reject
pub const INVALID_EMAILS: [&str; 7] = [
    "invalid-email",
    "test@",
    "@domain.com",
    "test..test@domain.com",
    "test@domain",
    "",
    "test@.com",
];

/// Phone numbers the app must reject
pub const INVALID_PHONES: [&str; 5] = [
    "abc123",
    "123",
    "+1-abc-def-ghij",
    "()123-456-7890",
    "123.456.7890.1234",
];

/// Account registration data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login email, lowercase
    pub email: String,
    /// Password
    pub password: String,
}

impl UserData {
    /// Fixed account used by smoke checks
    #[must_use]
    pub fn john_doe() -> Self {
        Self {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@test.com".to_string(),
            password: "password123".to_string(),
        }
    }
}

impl Generate for UserData {
    fn full(data: &DataGenerator) -> Self {
        Self {
            first_name: data.first_name(),
            last_name: data.last_name(),
            email: data.email(),
            password: data.password(8),
        }
    }
}

/// A contact record as the form and the API see it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactData {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// `YYYY-MM-DD`, empty when unknown
    pub birthdate: String,
    /// Email
    pub email: String,
    /// Phone digits
    pub phone: String,
    /// Street line 1
    pub street1: String,
    /// Street line 2
    pub street2: String,
    /// City
    pub city: String,
    /// State or province
    pub state_province: String,
    /// Postal code
    pub postal_code: String,
    /// Country
    pub country: String,
}

impl ContactData {
    /// `First Last`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Fixed contact used in examples and smoke checks
    #[must_use]
    pub fn alice_johnson() -> Self {
        Self {
            first_name: "Alice".to_string(),
            last_name: "Johnson".to_string(),
            birthdate: "1990-05-15".to_string(),
            email: "alice.johnson@example.com".to_string(),
            phone: "5551234567".to_string(),
            street1: "123 Main St".to_string(),
            street2: "Apt 4B".to_string(),
            city: "Anytown".to_string(),
            state_province: "CA".to_string(),
            postal_code: "12345".to_string(),
            country: "USA".to_string(),
        }
    }

    /// Generated contact with one field replaced by an invalid email
    #[must_use]
    pub fn with_invalid_email(data: &DataGenerator, email: &str) -> Self {
        Self {
            email: email.to_string(),
            ..Self::full(data)
        }
    }

    /// Generated contact with one field replaced by an invalid phone
    #[must_use]
    pub fn with_invalid_phone(data: &DataGenerator, phone: &str) -> Self {
        Self {
            phone: phone.to_string(),
            ..Self::full(data)
        }
    }
}

impl Generate for ContactData {
    fn full(data: &DataGenerator) -> Self {
        Self {
            first_name: data.first_name(),
            last_name: data.last_name(),
            birthdate: data.past_date(50).format("%Y-%m-%d").to_string(),
            email: data.email(),
            phone: data.phone(),
            street1: data.street_address(),
            street2: if data.boolean() {
                data.secondary_address()
            } else {
                String::new()
            },
            city: data.city(),
            state_province: data.state(),
            postal_code: data.postal_code(),
            country: data.country(),
        }
    }

    fn minimal(data: &DataGenerator) -> Self {
        Self {
            first_name: data.first_name(),
            last_name: data.last_name(),
            email: data.email(),
            ..Self::default()
        }
    }
}
