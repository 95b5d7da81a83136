use pomar::{Driver, Locator, LocatorRegistry, PageObject, PomarError, PomarResult, Selector};

use super::data::{ContactData, UserData};

/// Sign-in form at the site root
#[derive(Debug)]
pub struct LoginPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> LoginPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("contact-list login")
            .css("email", "#email")
            .css("password", "#password")
            .css("submit", "#submit")
            .css("signup", "#signup")
            .css("error", "#error")
            .build();
        Self { driver, locators }
    }

    /// Navigate here
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.driver.wait_visible(self.locator("submit")?).await
    }

    /// Sign in
    pub async fn login(&self, email: &str, password: &str) -> PomarResult<()> {
        tracing::info!(email, "contact-list login");
        self.driver.fill(self.locator("email")?, email).await?;
        self.driver.fill(self.locator("password")?, password).await?;
        self.driver.click(self.locator("submit")?).await
    }

    /// Follow the sign-up button
    pub async fn go_to_signup(&self) -> PomarResult<()> {
        self.driver.click(self.locator("signup")?).await
    }

    /// Error text, empty when there is none
    pub async fn error_message(&self) -> PomarResult<String> {
        Ok(self.driver.text_or_default(self.locator("error")?).await)
    }

    /// Whether the form is on screen
    pub async fn is_displayed(&self) -> PomarResult<bool> {
        Ok(self.driver.is_visible(self.locator("submit")?).await)
    }
}

impl PageObject for LoginPage<'_> {
    fn path(&self) -> &str {
        "/"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// Account registration form
#[derive(Debug)]
pub struct SignupPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> SignupPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("contact-list signup")
            .css("first_name", "#firstName")
            .css("last_name", "#lastName")
            .css("email", "#email")
            .css("password", "#password")
            .css("submit", "#submit")
            .css("cancel", "#cancel")
            .css("error", "#error")
            .build();
        Self { driver, locators }
    }

    /// Navigate here
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.driver.wait_visible(self.locator("submit")?).await
    }

    /// Fill the form without submitting
    pub async fn fill_form(&self, user: &UserData) -> PomarResult<()> {
        self.driver.fill(self.locator("first_name")?, &user.first_name).await?;
        self.driver.fill(self.locator("last_name")?, &user.last_name).await?;
        self.driver.fill(self.locator("email")?, &user.email).await?;
        self.driver.fill(self.locator("password")?, &user.password).await
    }

    /// Fill and submit
    pub async fn register(&self, user: &UserData) -> PomarResult<()> {
        tracing::info!(email = %user.email, "register user");
        self.fill_form(user).await?;
        self.driver.click(self.locator("submit")?).await
    }

    /// Leave without registering
    pub async fn cancel(&self) -> PomarResult<()> {
        self.driver.click(self.locator("cancel")?).await
    }

    /// Error text, empty when there is none
    pub async fn error_message(&self) -> PomarResult<String> {
        Ok(self.driver.text_or_default(self.locator("error")?).await)
    }
}

impl PageObject for SignupPage<'_> {
    fn path(&self) -> &str {
        "/addUser"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// Cells of one contact-table row, as displayed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRow {
    /// `First Last`
    pub name: String,
    /// `YYYY-MM-DD`
    pub birthdate: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Street lines
    pub address: String,
    /// City, state and postal code
    pub city: String,
    /// Country
    pub country: String,
}

/// The signed-in user's contact table
#[derive(Debug)]
pub struct ContactsPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

const ROW: &str = ".contactTableBodyRow";

impl<'s> ContactsPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("contact-list contacts")
            .css("heading", "h1")
            .css("add_contact", "#add-contact")
            .css("logout", "#logout")
            .css("table", "#myTable")
            .css("rows", ROW)
            .css("names", ".contactTableBodyRow td:nth-child(2)")
            .css("search", "#search")
            .text("no_contacts", "No contacts found")
            .build();
        Self { driver, locators }
    }

    /// Navigate here
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.expect_loaded().await
    }

    /// Wait until the list is on screen
    pub async fn expect_loaded(&self) -> PomarResult<()> {
        self.driver.expect_url(self).await?;
        self.driver.wait_visible(self.locator("add_contact")?).await
    }

    /// Text of every row, one per line
    pub async fn list_text(&self) -> PomarResult<String> {
        Ok(self.driver.all_texts(self.locator("rows")?).await?.join("\n"))
    }

    /// Full names in table order
    pub async fn contact_names(&self) -> PomarResult<Vec<String>> {
        self.driver.all_texts(self.locator("names")?).await
    }

    /// Number of rows
    pub async fn contact_count(&self) -> PomarResult<usize> {
        self.driver.count(self.locator("rows")?).await
    }

    /// Expect exactly `count` rows
    pub async fn expect_contact_count(&self, count: usize) -> PomarResult<()> {
        self.driver.expect_count(self.locator("rows")?, count).await
    }

    /// Wait for the table to settle; `true` when it has rows, `false` when
    /// it shows the empty-list message
    pub async fn wait_for_contacts(&self) -> PomarResult<bool> {
        let rows = self.locator("rows")?;
        let empty = self.locator("no_contacts")?;
        Ok(self.driver.wait_visible_any(&[rows, empty]).await? == 0)
    }

    /// Expect the empty-list message
    pub async fn expect_no_contacts(&self) -> PomarResult<()> {
        self.driver.expect_visible(self.locator("no_contacts")?).await
    }

    /// Type into the search box
    pub async fn search(&self, term: &str) -> PomarResult<()> {
        self.driver.fill(self.locator("search")?, term).await
    }

    /// Cells of the row whose name is `name`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] when no row has that name.
    pub async fn contact_row(&self, name: &str) -> PomarResult<ContactRow> {
        let names = self.contact_names().await?;
        let row = names
            .iter()
            .position(|n| n.trim() == name)
            .ok_or_else(|| PomarError::assertion(format!("no contact named '{name}' in the list")))?;
        Ok(ContactRow {
            name: self.cell(row, 2).await?,
            birthdate: self.cell(row, 3).await?,
            email: self.cell(row, 4).await?,
            phone: self.cell(row, 5).await?,
            address: self.cell(row, 6).await?,
            city: self.cell(row, 7).await?,
            country: self.cell(row, 8).await?,
        })
    }

    async fn cell(&self, row: usize, column: usize) -> PomarResult<String> {
        let cells = Locator::new(format!("{ROW} td:nth-child({column})"));
        let texts = self.driver.all_texts(&cells).await?;
        Ok(texts.get(row).cloned().unwrap_or_default())
    }

    /// Whether a row mentions `name`
    pub async fn is_contact_present(&self, name: &str) -> bool {
        self.driver.is_visible(&row_with(name)).await
    }

    /// Open the details of the row mentioning `name`
    pub async fn open_contact(&self, name: &str) -> PomarResult<()> {
        self.driver.click(&row_with(name)).await
    }

    /// Go to the add-contact form
    pub async fn open_add_contact(&self) -> PomarResult<()> {
        self.driver.click(self.locator("add_contact")?).await
    }

    /// Sign out
    pub async fn logout(&self) -> PomarResult<()> {
        self.driver.click(self.locator("logout")?).await
    }
}

fn row_with(text: &str) -> Locator {
    Locator::from_selector(Selector::css_with_text(ROW, text))
}

impl PageObject for ContactsPage<'_> {
    fn path(&self) -> &str {
        "/contactList"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// New-contact form
#[derive(Debug)]
pub struct AddContactPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> AddContactPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("contact-list add contact")
            .css("first_name", "#firstName")
            .css("last_name", "#lastName")
            .css("birthdate", "#birthdate")
            .css("email", "#email")
            .css("phone", "#phone")
            .css("street1", "#street1")
            .css("street2", "#street2")
            .css("city", "#city")
            .css("state_province", "#stateProvince")
            .css("postal_code", "#postalCode")
            .css("country", "#country")
            .css("submit", "#submit")
            .css("cancel", "#cancel")
            .css("error", "#error")
            .build();
        Self { driver, locators }
    }

    /// Navigate here
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.driver.wait_visible(self.locator("submit")?).await
    }

    /// Fill every field the record carries; empty fields are left blank
    pub async fn fill_form(&self, contact: &ContactData) -> PomarResult<()> {
        let fields = [
            ("first_name", &contact.first_name),
            ("last_name", &contact.last_name),
            ("birthdate", &contact.birthdate),
            ("email", &contact.email),
            ("phone", &contact.phone),
            ("street1", &contact.street1),
            ("street2", &contact.street2),
            ("city", &contact.city),
            ("state_province", &contact.state_province),
            ("postal_code", &contact.postal_code),
            ("country", &contact.country),
        ];
        for (key, value) in fields {
            if !value.is_empty() {
                self.driver.fill(self.locator(key)?, value).await?;
            }
        }
        Ok(())
    }

    /// Submit the form
    pub async fn submit(&self) -> PomarResult<()> {
        self.driver.click(self.locator("submit")?).await
    }

    /// Fill and submit
    pub async fn add_contact(&self, contact: &ContactData) -> PomarResult<()> {
        tracing::info!(contact = %contact.full_name(), "add contact");
        self.fill_form(contact).await?;
        self.submit().await
    }

    /// Leave without saving
    pub async fn cancel(&self) -> PomarResult<()> {
        self.driver.click(self.locator("cancel")?).await
    }

    /// Validation message, empty when there is none
    pub async fn error_message(&self) -> PomarResult<String> {
        Ok(self.driver.text_or_default(self.locator("error")?).await)
    }

    /// Whether a validation message is shown
    pub async fn has_error(&self) -> PomarResult<bool> {
        Ok(self.driver.is_visible(self.locator("error")?).await)
    }
}

impl PageObject for AddContactPage<'_> {
    fn path(&self) -> &str {
        "/addContact"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// One contact's details
#[derive(Debug)]
pub struct ContactDetailsPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> ContactDetailsPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("contact-list details")
            .css("first_name", "#firstName")
            .css("last_name", "#lastName")
            .css("email", "#email")
            .css("phone", "#phone")
            .css("birthdate", "#birthdate")
            .css("edit", "#edit-contact")
            .css("delete", "#delete")
            .css("delete_confirm", "#delete-confirm")
            .css("back", "#return")
            .build();
        Self { driver, locators }
    }

    /// Wait until the details are on screen
    pub async fn expect_loaded(&self) -> PomarResult<()> {
        self.driver.expect_url(self).await?;
        self.driver.wait_visible(self.locator("delete")?).await
    }

    /// `First Last`
    pub async fn full_name(&self) -> PomarResult<String> {
        let first = self.driver.text(self.locator("first_name")?).await?;
        let last = self.driver.text(self.locator("last_name")?).await?;
        Ok(format!("{first} {last}"))
    }

    /// Email
    pub async fn email(&self) -> PomarResult<String> {
        self.driver.text(self.locator("email")?).await
    }

    /// Phone
    pub async fn phone(&self) -> PomarResult<String> {
        self.driver.text(self.locator("phone")?).await
    }

    /// Birthdate
    pub async fn birthdate(&self) -> PomarResult<String> {
        self.driver.text(self.locator("birthdate")?).await
    }

    /// Delete the contact, confirming the prompt when one is shown
    pub async fn delete_contact(&self) -> PomarResult<()> {
        tracing::info!("delete contact");
        self.driver.click(self.locator("delete")?).await?;
        let confirm = self.locator("delete_confirm")?;
        self.driver
            .optional_step("confirm delete", confirm, self.driver.click(confirm))
            .await
            .into_result()
    }

    /// Back to the list
    pub async fn return_to_list(&self) -> PomarResult<()> {
        self.driver.click(self.locator("back")?).await
    }
}

impl PageObject for ContactDetailsPage<'_> {
    fn path(&self) -> &str {
        "/contactDetails"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// Every contact-list page bound to one session
#[derive(Debug)]
pub struct ContactPages<'s> {
    /// Sign-in
    pub login: LoginPage<'s>,
    /// Registration
    pub signup: SignupPage<'s>,
    /// Contact table
    pub contacts: ContactsPage<'s>,
    /// New-contact form
    pub add_contact: AddContactPage<'s>,
    /// Contact details
    pub details: ContactDetailsPage<'s>,
}

impl<'s> ContactPages<'s> {
    /// Construct every page over `driver`
    #[must_use]
    pub fn new(driver: &Driver<'s>) -> Self {
        Self {
            login: LoginPage::new(driver.clone()),
            signup: SignupPage::new(driver.clone()),
            contacts: ContactsPage::new(driver.clone()),
            add_contact: AddContactPage::new(driver.clone()),
            details: ContactDetailsPage::new(driver.clone()),
        }
    }
}
