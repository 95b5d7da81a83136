//! Test-data generation.
//!
//! [`DataGenerator`] produces realistic primitive values (names, emails,
//! addresses, dates) from a seedable RNG, so a failing run can be replayed
//! with the same seed. Records implement [`Generate`] for their full and
//! minimal variants; [`with_overrides`] pins individual fields.

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

use crate::result::PomarResult;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carmen", "Deepak", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas",
    "Keiko", "Liam", "Maya", "Nikolai", "Olivia", "Pedro", "Quinn", "Rosa", "Sven", "Tara",
    "Umar", "Vera", "Wes", "Ximena", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Brooks", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Hoffmann",
    "Ivanova", "Johnson", "Kowalski", "Lopez", "Moreau", "Nakamura", "Okafor", "Petrov",
    "Quintero", "Rossi", "Smith", "Tanaka", "Ueda", "Varga", "Williams", "Yamamoto", "Zimmer",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "inbox.test"];

const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Cedar", "Pine", "Elm", "Willow", "Harbor", "Sunset", "Lake", "Hill",
];

const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Road", "Lane", "Drive", "Court"];

const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Fairview", "Madison", "Georgetown", "Franklin", "Clinton",
    "Ashland", "Burlington", "Oakland",
];

const STATES: &[&str] = &[
    "California", "Texas", "New York", "Oregon", "Ohio", "Florida", "Colorado", "Georgia",
    "Maine", "Nevada",
];

const COUNTRIES: &[&str] = &[
    "United States", "Canada", "Germany", "France", "Japan", "Brazil", "India", "Australia",
    "Spain", "Kenya",
];

/// Seedable generator of primitive test values.
///
/// Shared by reference between fixtures; the RNG sits behind a mutex.
#[derive(Debug)]
pub struct DataGenerator {
    rng: Mutex<StdRng>,
    seed: Option<u64>,
}

impl DataGenerator {
    /// Deterministic generator
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            seed: Some(seed),
        }
    }

    /// Generator seeded from the OS
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            seed: None,
        }
    }

    /// Seed, when deterministic
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    fn one_of(&self, items: &[&'static str]) -> String {
        self.pick(items).map(|s| (*s).to_string()).unwrap_or_default()
    }

    /// Random element of `items`, `None` when empty
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        self.with_rng(|rng| items.choose(rng))
    }

    /// Integer in `range`
    pub fn int_range(&self, range: RangeInclusive<i64>) -> i64 {
        self.with_rng(|rng| rng.gen_range(range))
    }

    /// Fair coin
    pub fn boolean(&self) -> bool {
        self.with_rng(|rng| rng.gen_bool(0.5))
    }

    /// Given name
    pub fn first_name(&self) -> String {
        self.one_of(FIRST_NAMES)
    }

    /// Family name
    pub fn last_name(&self) -> String {
        self.one_of(LAST_NAMES)
    }

    /// Lowercase email, unique enough to register fresh accounts
    pub fn email(&self) -> String {
        let first = self.first_name();
        let last = self.last_name();
        let tag = self.int_range(1000..=999_999);
        let domain = self.one_of(EMAIL_DOMAINS);
        format!("{first}.{last}{tag}@{domain}").to_lowercase()
    }

    /// Alphanumeric password of exactly `len` characters
    pub fn password(&self, len: usize) -> String {
        self.with_rng(|rng| {
            (0..len)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect()
        })
    }

    /// `n` decimal digits
    pub fn digits(&self, n: usize) -> String {
        self.with_rng(|rng| {
            (0..n)
                .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                .collect()
        })
    }

    /// Ten-digit phone number
    pub fn phone(&self) -> String {
        self.digits(10)
    }

    /// `123 Maple Avenue`
    pub fn street_address(&self) -> String {
        let number = self.int_range(1..=9999);
        format!(
            "{number} {} {}",
            self.one_of(STREET_NAMES),
            self.one_of(STREET_SUFFIXES)
        )
    }

    /// `Apt. 42` or `Suite 310`
    pub fn secondary_address(&self) -> String {
        let number = self.int_range(1..=999);
        if self.boolean() {
            format!("Apt. {number}")
        } else {
            format!("Suite {number}")
        }
    }

    /// City name
    pub fn city(&self) -> String {
        self.one_of(CITIES)
    }

    /// State or province
    pub fn state(&self) -> String {
        self.one_of(STATES)
    }

    /// Five-digit postal code
    pub fn postal_code(&self) -> String {
        self.digits(5)
    }

    /// Country name
    pub fn country(&self) -> String {
        self.one_of(COUNTRIES)
    }

    /// Date between `from` and `to`, inclusive
    pub fn date_between(&self, from: NaiveDate, to: NaiveDate) -> NaiveDate {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let span = (to - from).num_days();
        from + ChronoDuration::days(self.int_range(0..=span))
    }

    /// Date within the last `years` years, never today
    pub fn past_date(&self, years: u32) -> NaiveDate {
        let today = Utc::now().date_naive();
        let days = self.int_range(1..=i64::from(years.max(1)) * 365);
        today - ChronoDuration::days(days)
    }

    /// Date within the next `days` days, never today
    pub fn future_date(&self, days: u32) -> NaiveDate {
        let today = Utc::now().date_naive();
        today + ChronoDuration::days(self.int_range(1..=i64::from(days.max(1))))
    }
}

impl Default for DataGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// A record that can be generated
pub trait Generate: Sized {
    /// Every field populated
    fn full(data: &DataGenerator) -> Self;

    /// Only required fields populated
    fn minimal(data: &DataGenerator) -> Self {
        Self::full(data)
    }

    /// `count` full records
    fn many(data: &DataGenerator, count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::full(data)).collect()
    }
}

/// Replace fields of `record` with those in `overrides`.
///
/// Nested objects merge key by key; any other value replaces wholesale.
///
/// # Errors
///
/// Returns [`crate::PomarError::Json`] when an override names a field the
/// record does not have or has the wrong type.
pub fn with_overrides<T>(record: &T, overrides: Value) -> PomarResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut base = serde_json::to_value(record)?;
    merge(&mut base, overrides, "")?;
    Ok(serde_json::from_value(base)?)
}

fn merge(base: &mut Value, patch: Value, path: &str) -> Result<(), serde_json::Error> {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                let field = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                match base.get_mut(&key) {
                    Some(slot) if slot.is_object() && value.is_object() => merge(slot, value, &field)?,
                    Some(slot) => *slot = value,
                    None => {
                        return Err(serde::de::Error::custom(format!("unknown field `{field}`")));
                    }
                }
            }
            Ok(())
        }
        (base, patch) => {
            *base = patch;
            Ok(())
        }
    }
}
