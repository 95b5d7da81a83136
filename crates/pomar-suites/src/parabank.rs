//! ParaBank administration page.
//!
//! The admin page layout varies between deployments (some hide the data
//! access mode, some save on change), so every setter is an optional step
//! and reports whether it was performed or skipped.

use pomar::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Hosted bank; the app lives under `/parabank`
pub const DEFAULTS: SuiteDefaults =
    SuiteDefaults::new("parabank", "https://parabank.parasoft.com/parabank")
        .with_credentials("admin", "admin");

/// Where loans are decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanProvider {
    /// Available funds
    Funds,
    /// Funds and down payment
    Combined,
    /// Web service
    Wsapi,
}

impl LoanProvider {
    /// `<option>` value
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Funds => "funds",
            Self::Combined => "combined",
            Self::Wsapi => "wsapi",
        }
    }
}

/// Persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataAccessMode {
    /// Plain JDBC
    Jdbc,
    /// JPA
    Jpa,
}

impl DataAccessMode {
    /// `<option>` value
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Jdbc => "jdbc",
            Self::Jpa => "jpa",
        }
    }
}

/// Settings applied through the admin form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Loan decision provider
    pub loan_provider: LoanProvider,
    /// Persistence layer
    pub data_access_mode: DataAccessMode,
    /// Balance of new accounts
    pub initial_balance: f64,
    /// Balance below which accounts are flagged
    pub minimum_balance: f64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            loan_provider: LoanProvider::Funds,
            data_access_mode: DataAccessMode::Jdbc,
            initial_balance: 515.50,
            minimum_balance: 100.0,
        }
    }
}

/// `admin.htm`
#[derive(Debug)]
pub struct AdminPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> AdminPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("parabank admin")
            .css("username", r#"input[name="username"]"#)
            .css("password", r#"input[name="password"]"#)
            .css("login", r#"input[value="Log In"]"#)
            .css("initialize", r#"button[value="INIT"]"#)
            .css("clean", r#"button[value="CLEAN"]"#)
            .css("loan_provider", "#loanProvider")
            .css("data_access_mode", "#dataAccessMode")
            .css("initial_balance", "#initialBalance")
            .css("minimum_balance", "#minimumBalance")
            .css("submit", r#"input[value="Submit"]"#)
            .css("message", "#rightPanel p")
            .build();
        Self { driver, locators }
    }

    /// Navigate here
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await
    }

    /// Sign in through the side panel when it is shown
    pub async fn login(&self, username: &str, password: &str) -> PomarResult<StepOutcome> {
        let anchor = self.locator("login")?;
        let step = async {
            self.driver.fill(self.locator("username")?, username).await?;
            self.driver.fill(self.locator("password")?, password).await?;
            self.driver.click(anchor).await
        };
        Ok(self.driver.optional_step("login", anchor, step).await)
    }

    async fn press(&self, key: &str) -> PomarResult<StepOutcome> {
        let button = self.locator(key)?;
        Ok(self.driver.optional_step(key, button, self.driver.click(button)).await)
    }

    /// Click "Initialize" when offered
    pub async fn initialize_database(&self) -> PomarResult<StepOutcome> {
        self.press("initialize").await
    }

    /// Click "Clean" when offered
    pub async fn clean_database(&self) -> PomarResult<StepOutcome> {
        self.press("clean").await
    }

    /// Whether the initialize button is gone
    pub async fn is_database_initialized(&self) -> bool {
        match self.locator("initialize") {
            Ok(button) => !self.driver.is_visible(button).await,
            Err(_) => true,
        }
    }

    async fn choose(&self, key: &str, value: &str) -> PomarResult<StepOutcome> {
        let select = self.locator(key)?;
        let step = async {
            self.driver.select_option(select, value).await?;
            self.submit().await
        };
        Ok(self.driver.optional_step(key, select, step).await)
    }

    async fn type_value(&self, key: &str, value: &str) -> PomarResult<StepOutcome> {
        let input = self.locator(key)?;
        let step = async {
            self.driver.fill(input, value).await?;
            self.submit().await
        };
        Ok(self.driver.optional_step(key, input, step).await)
    }

    /// Submit the settings form; skipped where the form saves on change
    async fn submit(&self) -> PomarResult<()> {
        let button = self.locator("submit")?;
        self.driver
            .optional_step("submit", button, self.driver.click(button))
            .await
            .into_result()
    }

    /// Pick the loan provider
    pub async fn set_loan_provider(&self, provider: LoanProvider) -> PomarResult<StepOutcome> {
        self.choose("loan_provider", provider.value()).await
    }

    /// Pick the data access mode
    pub async fn set_data_access_mode(&self, mode: DataAccessMode) -> PomarResult<StepOutcome> {
        self.choose("data_access_mode", mode.value()).await
    }

    /// Set the balance of new accounts
    pub async fn set_initial_balance(&self, balance: f64) -> PomarResult<StepOutcome> {
        self.type_value("initial_balance", &format_amount(balance)).await
    }

    /// Set the minimum balance
    pub async fn set_minimum_balance(&self, balance: f64) -> PomarResult<StepOutcome> {
        self.type_value("minimum_balance", &format_amount(balance)).await
    }

    /// Apply every setting in order, one outcome per setting
    pub async fn apply_config(&self, config: &DatabaseConfig) -> PomarResult<Vec<StepOutcome>> {
        info!(?config, "applying parabank configuration");
        Ok(vec![
            self.set_loan_provider(config.loan_provider).await?,
            self.set_data_access_mode(config.data_access_mode).await?,
            self.set_initial_balance(config.initial_balance).await?,
            self.set_minimum_balance(config.minimum_balance).await?,
        ])
    }

    /// Status paragraph, empty when there is none
    pub async fn message(&self) -> String {
        match self.locator("message") {
            Ok(message) => self.driver.text_or_default(message).await,
            Err(_) => String::new(),
        }
    }

    /// Current loan provider, empty when the field is absent
    pub async fn current_loan_provider(&self) -> String {
        self.current_value("loan_provider").await
    }

    /// Current initial balance, 0 when absent or unparsable
    pub async fn current_initial_balance(&self) -> f64 {
        self.current_value("initial_balance").await.parse().unwrap_or(0.0)
    }

    async fn current_value(&self, key: &str) -> String {
        let Ok(locator) = self.locator(key) else {
            return String::new();
        };
        if !self.driver.is_visible(locator).await {
            return String::new();
        }
        self.driver.input_value(locator).await.unwrap_or_default()
    }
}

impl PageObject for AdminPage<'_> {
    fn path(&self) -> &str {
        "/admin.htm"
    }

    fn url_pattern(&self) -> &str {
        "/*/admin.htm"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

/// ParaBank scenario catalogue
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios([
        Scenario::ui("admin page opens", |ctx| Box::pin(admin_page_opens(ctx)))
            .with_tag("smoke"),
        Scenario::ui("database can be initialized", |ctx| {
            Box::pin(database_can_be_initialized(ctx))
        }),
        Scenario::ui("configuration applies step by step", |ctx| {
            Box::pin(configuration_applies(ctx))
        }),
        Scenario::ui("clean then initialize", |ctx| Box::pin(clean_then_initialize(ctx))),
    ])
}

async fn open_admin(ctx: &ScenarioContext) -> PomarResult<AdminPage<'_>> {
    let admin = AdminPage::new(ctx.driver());
    admin.open().await?;
    let credentials = &ctx.config().credentials;
    admin
        .login(&credentials.username, &credentials.password)
        .await?
        .into_result()?;
    admin.open().await?;
    Ok(admin)
}

async fn admin_page_opens(ctx: &ScenarioContext) -> PomarResult<()> {
    let admin = open_admin(ctx).await?;
    ctx.driver().expect_url(&admin).await?;
    ctx.driver().expect_title("ParaBank | Administration").await
}

async fn database_can_be_initialized(ctx: &ScenarioContext) -> PomarResult<()> {
    let admin = open_admin(ctx).await?;
    admin.initialize_database().await?.into_result()?;
    let initialized = admin.is_database_initialized().await || !admin.message().await.is_empty();
    Assertion::is_true(initialized, "database reports initialized").check()
}

async fn configuration_applies(ctx: &ScenarioContext) -> PomarResult<()> {
    let admin = open_admin(ctx).await?;
    let config = DatabaseConfig {
        loan_provider: LoanProvider::Combined,
        ..DatabaseConfig::default()
    };
    let outcomes = admin.apply_config(&config).await?;
    Assertion::has_length(&outcomes, 4).check()?;
    for outcome in outcomes {
        outcome.into_result()?;
    }
    let provider = admin.current_loan_provider().await;
    Assertion::is_true(
        provider.is_empty() || provider == config.loan_provider.value(),
        &format!("loan provider is {provider}"),
    )
    .check()?;
    let balance = admin.current_initial_balance().await;
    Assertion::is_true(
        balance.abs() < f64::EPSILON || (balance - config.initial_balance).abs() < 0.01,
        &format!("initial balance is {balance}"),
    )
    .check()
}

async fn clean_then_initialize(ctx: &ScenarioContext) -> PomarResult<()> {
    let admin = open_admin(ctx).await?;
    admin.clean_database().await?.into_result()?;
    admin.initialize_database().await?.into_result()
}
