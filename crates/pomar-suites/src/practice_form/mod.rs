//! DemoQA automation practice form.
//!
//! A single React form: text inputs, radio and checkbox labels, a
//! datepicker, an autocomplete and two dependent dropdowns. Validation is
//! only visible through border colours.

mod data;
mod page;
mod scenarios;

pub use data::{
    day_class, FormData, Gender, Hobby, InvalidForm, INVALID_FORM, SHORT_MOBILES, STATES, SUBJECTS,
};
pub use page::{PracticeFormPage, CONFIRMATION_TITLE, ERROR_BORDER, SUCCESS_BORDER};
pub use scenarios::suite;

use pomar::SuiteDefaults;

/// Hosted form
pub const DEFAULTS: SuiteDefaults = SuiteDefaults::new("practice-form", "https://demoqa.com");
