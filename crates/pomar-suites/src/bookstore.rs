//! DemoQA book store search.

use pomar::prelude::*;

/// Hosted store
pub const DEFAULTS: SuiteDefaults = SuiteDefaults::new("bookstore", "https://demoqa.com");

/// A search and how many books it should list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookSearch {
    /// Typed query
    pub query: &'static str,
    /// Expected number of title links
    pub expected: usize,
}

/// Title and author searches, hits and misses
pub const SEARCHES: [BookSearch; 4] = [
    BookSearch { query: "git", expected: 1 },
    BookSearch { query: "Marijn", expected: 1 },
    BookSearch { query: "agit", expected: 0 },
    BookSearch { query: "marijni", expected: 0 },
];

/// `/books` with its filter box
#[derive(Debug)]
pub struct BookstorePage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> BookstorePage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("bookstore")
            .css("search", "#searchBox")
            .css("titles", ".action-buttons a")
            .build();
        Self { driver, locators }
    }

    /// Navigate here
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.driver.wait_visible(self.locator("search")?).await
    }

    /// Filter the list
    pub async fn search(&self, query: &str) -> PomarResult<()> {
        self.driver.fill(self.locator("search")?, query).await
    }

    /// Expect exactly `count` titles, waiting for the filter to settle
    pub async fn expect_result_count(&self, count: usize) -> PomarResult<()> {
        self.driver.expect_count(self.locator("titles")?, count).await
    }

    /// Titles listed right now
    pub async fn titles(&self) -> PomarResult<Vec<String>> {
        self.driver.all_texts(self.locator("titles")?).await
    }
}

impl PageObject for BookstorePage<'_> {
    fn path(&self) -> &str {
        "/books"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// Book store scenario catalogue, one scenario per search
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios(SEARCHES.map(|search| {
        let tag = if search.expected > 0 { "hit" } else { "miss" };
        Scenario::ui(format!("search '{}' lists {}", search.query, search.expected), move |ctx| {
            Box::pin(search_lists(ctx, search))
        })
        .with_tag(tag)
    }))
}

async fn search_lists(ctx: &ScenarioContext, search: BookSearch) -> PomarResult<()> {
    let page = BookstorePage::new(ctx.driver());
    page.open().await?;
    page.search(search.query).await?;
    page.expect_result_count(search.expected).await
}
