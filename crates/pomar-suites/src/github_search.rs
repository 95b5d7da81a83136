//! GitHub user search app.

use pomar::prelude::*;

/// Hosted app
pub const DEFAULTS: SuiteDefaults =
    SuiteDefaults::new("github-search", "https://gh-users-search.netlify.app");

/// A login GitHub always knows
pub const KNOWN_USER: &str = "octocat";
/// A login nobody has
pub const UNKNOWN_USER: &str = "nonexistentuser_xyz_123";

/// Search box and result cards
#[derive(Debug)]
pub struct SearchPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> SearchPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("github search")
            .css("input", "#username-input")
            .css("search", "#search-button")
            .css("results", ".user-card")
            .css("usernames", ".user-card .username")
            .css("error", ".error-message")
            .build();
        Self { driver, locators }
    }

    /// Navigate here
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.driver.wait_visible(self.locator("input")?).await
    }

    /// Type a login and press search
    pub async fn search(&self, username: &str) -> PomarResult<()> {
        tracing::info!(username, "github user search");
        self.driver.fill(self.locator("input")?, username).await?;
        self.driver.click(self.locator("search")?).await
    }

    /// Number of result cards right now
    pub async fn results_count(&self) -> PomarResult<usize> {
        self.driver.count(self.locator("results")?).await
    }

    /// Logins shown on the cards
    pub async fn result_usernames(&self) -> PomarResult<Vec<String>> {
        self.driver.all_texts(self.locator("usernames")?).await
    }

    /// Wait for the error banner
    pub async fn expect_error(&self) -> PomarResult<()> {
        self.driver.expect_visible(self.locator("error")?).await
    }

    /// Clear the box
    pub async fn clear(&self) -> PomarResult<()> {
        self.driver.fill(self.locator("input")?, "").await
    }

    /// Whether search is disabled
    pub async fn is_search_disabled(&self) -> PomarResult<bool> {
        Ok(!self.driver.is_enabled(self.locator("search")?).await?)
    }
}

impl PageObject for SearchPage<'_> {
    fn path(&self) -> &str {
        "/"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// GitHub search scenario catalogue
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios([
        Scenario::ui("known user is found", |ctx| Box::pin(known_user_is_found(ctx)))
            .with_tag("smoke"),
        Scenario::ui("unknown user shows an error", |ctx| {
            Box::pin(unknown_user_shows_error(ctx))
        }),
        Scenario::ui("empty input disables search", |ctx| {
            Box::pin(empty_input_disables_search(ctx))
        }),
    ])
}

async fn known_user_is_found(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let page = SearchPage::new(driver.clone());
    page.open().await?;
    page.search(KNOWN_USER).await?;
    driver.wait_visible(page.locator("results")?).await?;
    Assertion::is_true(page.results_count().await? > 0, "at least one result").check()?;
    let usernames = page.result_usernames().await?;
    Assertion::is_true(
        usernames.iter().any(|name| name == KNOWN_USER),
        &format!("{KNOWN_USER} among {usernames:?}"),
    )
    .check()
}

async fn unknown_user_shows_error(ctx: &ScenarioContext) -> PomarResult<()> {
    let page = SearchPage::new(ctx.driver());
    page.open().await?;
    page.search(UNKNOWN_USER).await?;
    page.expect_error().await?;
    Assertion::equals(&0, &page.results_count().await?).check()
}

async fn empty_input_disables_search(ctx: &ScenarioContext) -> PomarResult<()> {
    let page = SearchPage::new(ctx.driver());
    page.open().await?;
    page.clear().await?;
    Assertion::is_true(page.is_search_disabled().await?, "search is disabled").check()
}
