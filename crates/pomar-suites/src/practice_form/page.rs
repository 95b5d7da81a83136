use std::time::Duration;

use chrono::Datelike;
use pomar::wait::{Deadline, DEFAULT_POLL_INTERVAL_MS};
use pomar::{Driver, Locator, LocatorRegistry, PageObject, PomarError, PomarResult, Selector};
use tracing::{debug, info};

use super::data::{day_class, FormData, Gender, Hobby};

/// Border colour of a field that failed validation
pub const ERROR_BORDER: &str = "rgb(220, 53, 69)";
/// Border colour of a field that passed validation
pub const SUCCESS_BORDER: &str = "rgb(40, 167, 69)";
/// Heading of the confirmation modal
pub const CONFIRMATION_TITLE: &str = "Thanks for submitting the form";

const REACT_SELECT_OPTION: &str = r#"div[id*="react-select"][id*="option"]"#;

/// The student registration form
#[derive(Debug)]
pub struct PracticeFormPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> PracticeFormPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("practice form")
            .css("first_name", "#firstName")
            .css("last_name", "#lastName")
            .css("email", "#userEmail")
            .css("mobile", "#userNumber")
            .css("date_of_birth", "#dateOfBirthInput")
            .css("month_select", ".react-datepicker__month-select")
            .css("year_select", ".react-datepicker__year-select")
            .css("subjects", "#subjectsInput")
            .css("subject_option", ".subjects-auto-complete__option")
            .css("selected_subjects", ".subjects-auto-complete__multi-value__label")
            .css("address", "#currentAddress")
            .css("state", "#state")
            .css("city", "#city")
            .css("submit", "#submit")
            .css("modal", ".modal-content")
            .css("modal_title", "#example-modal-sizes-title-lg")
            .css("modal_rows", ".modal-content tbody tr")
            .css("close", "#closeLargeModal")
            .build();
        Self { driver, locators }
    }

    /// Navigate here and wait for the form
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.driver.wait_visible(self.locator("first_name")?).await
    }

    fn gender_label(gender: Gender) -> Locator {
        Locator::new(format!(r#"label[for="gender-radio-{}"]"#, gender.index()))
    }

    fn gender_radio(gender: Gender) -> Locator {
        Locator::new(format!("#gender-radio-{}", gender.index()))
    }

    fn hobby_label(hobby: Hobby) -> Locator {
        Locator::new(format!(r#"label[for="hobbies-checkbox-{}"]"#, hobby.index()))
    }

    fn hobby_checkbox(hobby: Hobby) -> Locator {
        Locator::new(format!("#hobbies-checkbox-{}", hobby.index()))
    }

    fn select_option(text: &str) -> Locator {
        Locator::from_selector(Selector::css_with_text(REACT_SELECT_OPTION, text))
    }

    /// Type into a field by locator key
    pub async fn fill_field(&self, key: &str, value: &str) -> PomarResult<()> {
        self.driver.fill(self.locator(key)?, value).await
    }

    /// Names, email, gender and mobile
    pub async fn fill_personal_info(&self, form: &FormData) -> PomarResult<()> {
        self.fill_field("first_name", &form.first_name).await?;
        self.fill_field("last_name", &form.last_name).await?;
        self.fill_field("email", &form.email).await?;
        self.select_gender(form.gender).await?;
        self.fill_field("mobile", &form.mobile).await
    }

    /// Click a gender label
    pub async fn select_gender(&self, gender: Gender) -> PomarResult<()> {
        self.driver.click(&Self::gender_label(gender)).await
    }

    /// Pick a date through the datepicker; the month select is 0-based
    pub async fn fill_date_of_birth(&self, date: chrono::NaiveDate) -> PomarResult<()> {
        debug!(%date, "picking date of birth");
        self.driver.click(self.locator("date_of_birth")?).await?;
        self.driver
            .select_option(self.locator("month_select")?, &date.month0().to_string())
            .await?;
        self.driver
            .select_option(self.locator("year_select")?, &date.year().to_string())
            .await?;
        self.driver.click(&Locator::new(day_class(date))).await
    }

    /// Type each subject and take the first suggestion
    pub async fn fill_subjects(&self, subjects: &[String]) -> PomarResult<()> {
        let option = self.locator("subject_option")?;
        for subject in subjects {
            self.fill_field("subjects", subject).await?;
            self.driver.wait_visible(option).await?;
            self.driver.click(option).await?;
        }
        Ok(())
    }

    /// Tick each hobby
    pub async fn select_hobbies(&self, hobbies: &[Hobby]) -> PomarResult<()> {
        for hobby in hobbies {
            self.driver.click(&Self::hobby_label(*hobby)).await?;
        }
        Ok(())
    }

    /// Current address
    pub async fn fill_address(&self, address: &str) -> PomarResult<()> {
        self.fill_field("address", address).await
    }

    /// Choose a state, then one of its cities
    pub async fn select_state_and_city(&self, state: &str, city: &str) -> PomarResult<()> {
        self.driver.click(self.locator("state")?).await?;
        self.driver.click(&Self::select_option(state)).await?;
        self.driver.click(self.locator("city")?).await?;
        self.driver.click(&Self::select_option(city)).await
    }

    /// Fill every field `form` sets
    pub async fn fill_complete_form(&self, form: &FormData) -> PomarResult<()> {
        info!(student = %form.student_name(), "filling practice form");
        self.fill_personal_info(form).await?;
        self.fill_date_of_birth(form.date_of_birth).await?;
        self.fill_subjects(&form.subjects).await?;
        self.select_hobbies(&form.hobbies).await?;
        if !form.address.is_empty() {
            self.fill_address(&form.address).await?;
        }
        if !form.state.is_empty() {
            self.select_state_and_city(&form.state, &form.city).await?;
        }
        Ok(())
    }

    /// Press submit
    pub async fn submit(&self) -> PomarResult<()> {
        self.driver.click(self.locator("submit")?).await
    }

    /// Expect the confirmation modal with its title
    pub async fn expect_submitted(&self) -> PomarResult<()> {
        self.driver.expect_visible(self.locator("modal")?).await?;
        self.driver
            .expect_text(self.locator("modal_title")?, CONFIRMATION_TITLE)
            .await
    }

    /// Whether the confirmation modal is open
    pub async fn is_submitted(&self) -> bool {
        match self.locator("modal") {
            Ok(modal) => self.driver.is_visible(modal).await,
            Err(_) => false,
        }
    }

    /// Value of one confirmation row by its label
    pub async fn submitted_value(&self, label: &str) -> PomarResult<String> {
        let rows = self.driver.all_texts(self.locator("modal_rows")?).await?;
        rows.iter()
            .find_map(|row| row.strip_prefix(label))
            .map(|value| value.trim().to_string())
            .ok_or_else(|| PomarError::assertion(format!("no confirmation row '{label}'")))
    }

    /// Dismiss the confirmation modal
    pub async fn close_confirmation(&self) -> PomarResult<()> {
        self.driver.click(self.locator("close")?).await?;
        self.driver.wait_hidden(self.locator("modal")?).await
    }

    /// Border colour of a field right now
    pub async fn border_color(&self, key: &str) -> PomarResult<String> {
        self.driver.css_value(self.locator(key)?, "border-color").await
    }

    /// Wait until the field's border shows the expected validation state
    pub async fn expect_field_validation(&self, key: &str, has_error: bool) -> PomarResult<()> {
        let expected = if has_error { ERROR_BORDER } else { SUCCESS_BORDER };
        let deadline = Deadline::new(
            self.driver.timeouts().assertion,
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        );
        loop {
            let actual = self.border_color(key).await?;
            if actual == expected {
                return Ok(());
            }
            if deadline.expired() {
                return Err(PomarError::assertion(format!(
                    "{key} border is {actual}, expected {expected}"
                )));
            }
            deadline.tick().await;
        }
    }

    /// Current value of a text field
    pub async fn field_value(&self, key: &str) -> PomarResult<String> {
        self.driver.input_value(self.locator(key)?).await
    }

    /// Subjects shown as chips
    pub async fn selected_subjects(&self) -> PomarResult<Vec<String>> {
        self.driver.all_texts(self.locator("selected_subjects")?).await
    }

    /// Whether a gender radio is checked
    pub async fn is_gender_selected(&self, gender: Gender) -> PomarResult<bool> {
        self.driver.is_checked(&Self::gender_radio(gender)).await
    }

    /// Whether a hobby box is ticked
    pub async fn is_hobby_selected(&self, hobby: Hobby) -> PomarResult<bool> {
        self.driver.is_checked(&Self::hobby_checkbox(hobby)).await
    }

    /// Text shown by the state or city dropdown
    pub async fn dropdown_text(&self, key: &str) -> PomarResult<String> {
        self.driver.text(self.locator(key)?).await
    }

    /// Whether the city dropdown accepts input
    pub async fn is_city_enabled(&self) -> PomarResult<bool> {
        self.driver.is_enabled(self.locator("city")?).await
    }
}

impl PageObject for PracticeFormPage<'_> {
    fn path(&self) -> &str {
        "/automation-practice-form"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}
