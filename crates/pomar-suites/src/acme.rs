//! ACME demo bank: login form and dashboard.
//!
//! The demo accepts any non-empty credentials, so scenarios check the
//! page mechanics (enter-key submit, remember-me, logout) rather than
//! authentication rules.

use async_trait::async_trait;
use pomar::prelude::*;
use tracing::info;

/// Hosted demo and its documented account
pub const DEFAULTS: SuiteDefaults =
    SuiteDefaults::new("acme", "https://demo.applitools.com").with_credentials("testuser", "testpass");

/// Login form at the site root
#[derive(Debug)]
pub struct LoginPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> LoginPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("acme login")
            .css("form", ".form-container")
            .css("username", "#username")
            .css("password", "#password")
            .css("submit", "#log-in")
            .css("remember_me", r#"input[name="remember-me"]"#)
            .css("logo", ".logo-w img")
            .css("title", "h4")
            .css("alert", ".alert")
            .build();
        Self { driver, locators }
    }

    /// Navigate here and wait for the form
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.driver.wait_visible(self.locator("submit")?).await
    }

    /// Type credentials without submitting
    pub async fn fill_credentials(&self, username: &str, password: &str) -> PomarResult<()> {
        self.driver.fill(self.locator("username")?, username).await?;
        self.driver.fill(self.locator("password")?, password).await
    }

    /// Type credentials and click the button
    pub async fn login(&self, username: &str, password: &str) -> PomarResult<()> {
        info!(username, "acme login");
        self.fill_credentials(username, password).await?;
        self.driver.click(self.locator("submit")?).await
    }

    /// Type credentials and submit with Enter
    pub async fn login_with_enter(&self, username: &str, password: &str) -> PomarResult<()> {
        self.fill_credentials(username, password).await?;
        self.driver.press(self.locator("password")?, "Enter").await
    }

    /// Flip the remember-me box
    pub async fn toggle_remember_me(&self) -> PomarResult<()> {
        self.driver.click(self.locator("remember_me")?).await
    }

    /// Whether remember-me is ticked
    pub async fn is_remember_me_checked(&self) -> PomarResult<bool> {
        self.driver.is_checked(self.locator("remember_me")?).await
    }

    /// Heading above the form
    pub async fn app_title(&self) -> PomarResult<String> {
        self.driver.text(self.locator("title")?).await
    }

    /// Alert text, empty when there is none
    pub async fn alert_message(&self) -> String {
        match self.locator("alert") {
            Ok(alert) => self.driver.text_or_default(alert).await,
            Err(_) => String::new(),
        }
    }

    /// Username and password as typed
    pub async fn field_values(&self) -> PomarResult<(String, String)> {
        let username = self.driver.input_value(self.locator("username")?).await?;
        let password = self.driver.input_value(self.locator("password")?).await?;
        Ok((username, password))
    }

    /// Whether the login form is on screen
    pub async fn is_displayed(&self) -> bool {
        match self.locator("form") {
            Ok(form) => self.driver.is_visible(form).await,
            Err(_) => false,
        }
    }

    /// Expect logo, inputs, button and remember-me to be visible
    pub async fn expect_elements(&self) -> PomarResult<()> {
        for key in ["logo", "username", "password", "submit", "remember_me"] {
            self.driver.expect_visible(self.locator(key)?).await?;
        }
        Ok(())
    }

    /// Whether the login button accepts clicks
    pub async fn is_submit_enabled(&self) -> PomarResult<bool> {
        self.driver.is_enabled(self.locator("submit")?).await
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

/// Sections reachable from the dashboard menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Overview
    Dashboard,
    /// Accounts list
    Accounts,
    /// Statements
    Statements,
    /// User profile
    Profile,
}

impl Section {
    /// Every section in menu order
    pub const ALL: [Self; 4] = [Self::Dashboard, Self::Accounts, Self::Statements, Self::Profile];

    /// Fragment the menu link's `href` contains
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Accounts => "accounts",
            Self::Statements => "statements",
            Self::Profile => "profile",
        }
    }
}

/// Account overview shown after login
#[derive(Debug)]
pub struct DashboardPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> DashboardPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("acme dashboard")
            .css("main", ".main-content")
            .css("welcome", "h1, h2")
            .css("logout", "#log-out")
            .css("balance", ".balance-amount")
            .build();
        Self { driver, locators }
    }

    /// Wait until the dashboard is on screen
    pub async fn expect_loaded(&self) -> PomarResult<()> {
        self.driver.expect_url(self).await?;
        self.driver.wait_visible(self.locator("main")?).await
    }

    /// Whether the dashboard is on screen
    pub async fn is_loaded(&self) -> bool {
        match self.locator("main") {
            Ok(main) => self.driver.is_visible(main).await,
            Err(_) => false,
        }
    }

    /// First heading of the page
    pub async fn welcome_message(&self) -> PomarResult<String> {
        self.driver.text(self.locator("welcome")?).await
    }

    /// Balance figure
    pub async fn balance(&self) -> PomarResult<String> {
        self.driver.text(self.locator("balance")?).await
    }

    /// Log out when the button is shown
    pub async fn logout(&self) -> PomarResult<StepOutcome> {
        let button = self.locator("logout")?;
        Ok(self
            .driver
            .optional_step("logout", button, self.driver.click(button))
            .await)
    }

    /// Follow a menu link when the menu offers it
    pub async fn navigate_to(&self, section: Section) -> StepOutcome {
        let link = Locator::new(format!(r#"a[href*="{}"]"#, section.slug()));
        self.driver
            .optional_step(section.slug(), &link, self.driver.click(&link))
            .await
    }
}

impl PageObject for DashboardPage<'_> {
    fn path(&self) -> &str {
        "/app.html"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// Both pages over one session
#[derive(Debug)]
pub struct AcmePages<'s> {
    /// Login form
    pub login: LoginPage<'s>,
    /// Dashboard
    pub dashboard: DashboardPage<'s>,
}

/// Builds [`AcmePages`] without touching the browser
#[derive(Debug, Clone, Copy, Default)]
pub struct AcmePagesFixture;

#[async_trait]
impl<'s> Fixture<'s> for AcmePagesFixture {
    type Output = AcmePages<'s>;

    fn name(&self) -> &str {
        "acme_pages"
    }

    async fn setup(&self, driver: &Driver<'s>) -> PomarResult<AcmePages<'s>> {
        Ok(AcmePages {
            login: LoginPage::new(driver.clone()),
            dashboard: DashboardPage::new(driver.clone()),
        })
    }
}

/// ACME scenario catalogue
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios([
        Scenario::ui("login page shows its elements", |ctx| {
            Box::pin(login_page_shows_elements(ctx))
        })
        .with_tag("smoke"),
        Scenario::ui("valid login opens the dashboard", |ctx| {
            Box::pin(valid_login_opens_dashboard(ctx, false))
        })
        .with_tag("smoke"),
        Scenario::ui("enter key submits the login", |ctx| {
            Box::pin(valid_login_opens_dashboard(ctx, true))
        }),
        Scenario::ui("typed credentials stay in the form", |ctx| {
            Box::pin(typed_credentials_stay(ctx))
        }),
        Scenario::ui("remember me toggles", |ctx| Box::pin(remember_me_toggles(ctx))),
        Scenario::ui("logout returns to login", |ctx| Box::pin(logout_returns_to_login(ctx))),
        Scenario::ui("menu sections are optional", |ctx| {
            Box::pin(menu_sections_are_optional(ctx))
        }),
    ])
}

async fn login_page_shows_elements(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    with_fixture(&AcmePagesFixture, &driver, |pages| {
        Box::pin(async move {
            pages.login.open().await?;
            pages.login.expect_elements().await?;
            Assertion::contains(&pages.login.app_title().await?, "Login Form").check()?;
            Assertion::is_true(pages.login.is_displayed().await, "login form is shown").check()?;
            Assertion::equals("", pages.login.alert_message().await.as_str()).check()?;
            Assertion::is_true(pages.login.is_submit_enabled().await?, "login is enabled").check()
        })
    })
    .await
}

async fn valid_login_opens_dashboard(ctx: &ScenarioContext, with_enter: bool) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AcmePagesFixture;
    let pages = Provided::setup(&fixture, &driver).await?;
    let credentials = &ctx.config().credentials;

    pages.login.open().await?;
    if with_enter {
        pages
            .login
            .login_with_enter(&credentials.username, &credentials.password)
            .await?;
    } else {
        pages.login.login(&credentials.username, &credentials.password).await?;
    }
    pages.dashboard.expect_loaded().await?;
    Assertion::is_true(pages.dashboard.is_loaded().await, "dashboard is shown").check()?;
    Assertion::is_true(
        !pages.dashboard.welcome_message().await?.is_empty(),
        "dashboard has a heading",
    )
    .check()
}

async fn typed_credentials_stay(ctx: &ScenarioContext) -> PomarResult<()> {
    let login = LoginPage::new(ctx.driver());
    login.open().await?;
    login.fill_credentials("someone", "secret").await?;
    let (username, password) = login.field_values().await?;
    Assertion::equals("someone", username.as_str()).check()?;
    Assertion::equals("secret", password.as_str()).check()
}

async fn remember_me_toggles(ctx: &ScenarioContext) -> PomarResult<()> {
    let login = LoginPage::new(ctx.driver());
    login.open().await?;
    Assertion::is_true(!login.is_remember_me_checked().await?, "starts unticked").check()?;
    login.toggle_remember_me().await?;
    Assertion::is_true(login.is_remember_me_checked().await?, "ticked after a click").check()?;
    login.toggle_remember_me().await?;
    Assertion::is_true(!login.is_remember_me_checked().await?, "unticked again").check()
}

async fn logged_in<'c>(ctx: &'c ScenarioContext, driver: &Driver<'c>) -> PomarResult<AcmePages<'c>> {
    let pages = Provided::setup(&AcmePagesFixture, driver).await?.into_output();
    let credentials = &ctx.config().credentials;
    pages.login.open().await?;
    pages.login.login(&credentials.username, &credentials.password).await?;
    pages.dashboard.expect_loaded().await?;
    Ok(pages)
}

async fn logout_returns_to_login(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let pages = logged_in(ctx, &driver).await?;
    pages.dashboard.logout().await?.into_result()?;
    Assertion::is_true(pages.login.is_displayed().await, "login form is shown after logout").check()
}

async fn menu_sections_are_optional(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let pages = logged_in(ctx, &driver).await?;
    for section in Section::ALL {
        let outcome = pages.dashboard.navigate_to(section).await;
        Assertion::is_true(!outcome.is_failed(), &format!("{} navigation: {outcome}", section.slug()))
            .check()?;
    }
    Ok(())
}
