//! Form records for the demoqa practice form.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use pomar::{DataGenerator, Generate};
use serde::{Deserialize, Serialize};

/// Subjects the autocomplete knows
pub const SUBJECTS: [&str; 8] = [
    "Maths",
    "Physics",
    "Chemistry",
    "English",
    "Biology",
    "Computer Science",
    "Economics",
    "History",
];

/// States and the cities each one unlocks
pub const STATES: [(&str, &[&str]); 4] = [
    ("NCR", &["Delhi", "Gurgaon", "Noida"]),
    ("Uttar Pradesh", &["Agra", "Lucknow", "Merrut"]),
    ("Haryana", &["Karnal", "Panipat"]),
    ("Rajasthan", &["Jaipur", "Jaiselmer"]),
];

/// Gender radio buttons, numbered as the page numbers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// `gender-radio-1`
    Male,
    /// `gender-radio-2`
    Female,
    /// `gender-radio-3`
    Other,
}

impl Gender {
    /// Every choice in page order
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    /// Suffix of the radio's id
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 2,
            Self::Other => 3,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Hobby checkboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hobby {
    /// `hobbies-checkbox-1`
    Sports,
    /// `hobbies-checkbox-2`
    Reading,
    /// `hobbies-checkbox-3`
    Music,
}

impl Hobby {
    /// Every choice in page order
    pub const ALL: [Self; 3] = [Self::Sports, Self::Reading, Self::Music];

    /// Suffix of the checkbox's id
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Sports => 1,
            Self::Reading => 2,
            Self::Music => 3,
        }
    }
}

impl fmt::Display for Hobby {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sports => "Sports",
            Self::Reading => "Reading",
            Self::Music => "Music",
        };
        f.write_str(label)
    }
}

/// A complete student registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    /// Given name (required)
    pub first_name: String,
    /// Family name (required)
    pub last_name: String,
    /// Email
    pub email: String,
    /// Gender (required)
    pub gender: Gender,
    /// Ten-digit mobile number (required)
    pub mobile: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Subjects, as the autocomplete names them
    pub subjects: Vec<String>,
    /// Hobbies
    pub hobbies: Vec<Hobby>,
    /// Current address
    pub address: String,
    /// State, empty to skip
    pub state: String,
    /// City within `state`, empty to skip
    pub city: String,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl FormData {
    /// Male student with every field set
    #[must_use]
    pub fn valid() -> Self {
        Self {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@example.com".into(),
            gender: Gender::Male,
            mobile: "1234567890".into(),
            date_of_birth: date(1990, 5, 15),
            subjects: vec!["Maths".into(), "Physics".into()],
            hobbies: vec![Hobby::Sports, Hobby::Reading],
            address: "123 Main Street, Anytown, USA".into(),
            state: "NCR".into(),
            city: "Delhi".into(),
        }
    }

    /// Female student with every field set
    #[must_use]
    pub fn female() -> Self {
        Self {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: "jane.smith@example.com".into(),
            gender: Gender::Female,
            mobile: "9876543210".into(),
            date_of_birth: date(1995, 11, 25),
            subjects: vec!["English".into(), "Chemistry".into()],
            hobbies: vec![Hobby::Music, Hobby::Reading],
            address: "456 Oak Avenue, Another City, USA".into(),
            state: "Uttar Pradesh".into(),
            city: "Agra".into(),
        }
    }

    /// `self` with only the required fields kept
    #[must_use]
    pub fn required_only(&self) -> Self {
        Self {
            subjects: Vec::new(),
            hobbies: Vec::new(),
            address: String::new(),
            state: String::new(),
            city: String::new(),
            ..self.clone()
        }
    }

    /// Name shown in the confirmation table
    #[must_use]
    pub fn student_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Date as the input displays it, e.g. `15 May 1990`
    #[must_use]
    pub fn date_of_birth_input(&self) -> String {
        self.date_of_birth.format("%d %b %Y").to_string()
    }

    /// Rows the confirmation modal should show, label then value
    #[must_use]
    pub fn expected_submission(&self) -> Vec<(&'static str, String)> {
        let join = |items: Vec<String>| items.join(", ");
        vec![
            ("Student Name", self.student_name()),
            ("Student Email", self.email.clone()),
            ("Gender", self.gender.to_string()),
            ("Mobile", self.mobile.clone()),
            ("Date of Birth", self.date_of_birth.format("%d %B,%Y").to_string()),
            ("Subjects", join(self.subjects.clone())),
            ("Hobbies", join(self.hobbies.iter().map(ToString::to_string).collect())),
            ("Address", self.address.clone()),
            ("State and City", format!("{} {}", self.state, self.city).trim().to_string()),
        ]
    }
}

/// Value of the day cell class, e.g. `--015`
#[must_use]
pub fn day_class(date: NaiveDate) -> String {
    format!(".react-datepicker__day--{:03}:not(.react-datepicker__day--outside-month)", date.day())
}

impl Generate for FormData {
    fn full(data: &DataGenerator) -> Self {
        let (state, cities) = data.pick(&STATES).copied().unwrap_or(STATES[0]);
        let city = data.pick(cities).copied().unwrap_or_default();
        let subject_count = usize::try_from(data.int_range(1..=3)).unwrap_or(1);
        let mut subjects: Vec<String> = Vec::new();
        while subjects.len() < subject_count {
            let subject = data.pick(&SUBJECTS).copied().unwrap_or("Maths");
            if !subjects.iter().any(|s| s == subject) {
                subjects.push(subject.to_string());
            }
        }
        let hobbies = Hobby::ALL.into_iter().filter(|_| data.boolean()).collect();
        Self {
            first_name: data.first_name(),
            last_name: data.last_name(),
            email: data.email(),
            gender: data.pick(&Gender::ALL).copied().unwrap_or(Gender::Other),
            mobile: data.digits(10),
            date_of_birth: data.past_date(40),
            subjects,
            hobbies,
            address: data.street_address(),
            state: state.to_string(),
            city: city.to_string(),
        }
    }

    fn minimal(data: &DataGenerator) -> Self {
        Self::full(data).required_only()
    }
}

/// Values the form must refuse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidForm {
    /// Left empty
    pub first_name: &'static str,
    /// Left empty
    pub last_name: &'static str,
    /// Not an address
    pub email: &'static str,
    /// Too short
    pub mobile: &'static str,
}

/// The invalid submission
pub const INVALID_FORM: InvalidForm = InvalidForm {
    first_name: "",
    last_name: "",
    email: "invalid-email",
    mobile: "123",
};

/// Mobile numbers shorter than ten digits
pub const SHORT_MOBILES: [&str; 2] = ["123", "123456789"];
