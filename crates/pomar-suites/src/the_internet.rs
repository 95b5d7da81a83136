//! The Internet: exit intent modal.

use pomar::prelude::*;

/// Hosted playground
pub const DEFAULTS: SuiteDefaults =
    SuiteDefaults::new("the-internet", "https://the-internet.herokuapp.com");

/// Body of the exit intent modal
pub const MODAL_TEXT: &str = "It's commonly used to encourage a user to take an action \
(e.g., give their e-mail address to sign up for something).";

/// `/exit_intent`
#[derive(Debug)]
pub struct ExitIntentPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> ExitIntentPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("exit intent")
            .css("document", "html")
            .css("modal", "#ouibounce-modal .modal")
            .text("modal_text", MODAL_TEXT)
            .css("close", ".modal-footer p")
            .build();
        Self { driver, locators }
    }

    /// Navigate here
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await
    }

    /// Pretend the mouse left the viewport
    pub async fn trigger_exit_intent(&self) -> PomarResult<()> {
        self.driver
            .dispatch_event(self.locator("document")?, "mouseleave")
            .await
    }

    /// Expect the modal body to be visible
    pub async fn expect_modal(&self) -> PomarResult<()> {
        self.driver.expect_visible(self.locator("modal_text")?).await
    }

    /// Close the modal and wait for it to go
    pub async fn close_modal(&self) -> PomarResult<()> {
        self.driver.click(self.locator("close")?).await?;
        self.driver.wait_hidden(self.locator("modal_text")?).await
    }
}

impl PageObject for ExitIntentPage<'_> {
    fn path(&self) -> &str {
        "/exit_intent"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// Exit intent scenario catalogue
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios([
        Scenario::ui("leaving the viewport opens the modal", |ctx| {
            Box::pin(leaving_viewport_opens_modal(ctx))
        })
        .with_tag("smoke"),
        Scenario::ui("modal can be closed", |ctx| Box::pin(modal_can_be_closed(ctx))),
    ])
}

async fn leaving_viewport_opens_modal(ctx: &ScenarioContext) -> PomarResult<()> {
    let page = ExitIntentPage::new(ctx.driver());
    page.open().await?;
    page.trigger_exit_intent().await?;
    page.expect_modal().await
}

async fn modal_can_be_closed(ctx: &ScenarioContext) -> PomarResult<()> {
    let page = ExitIntentPage::new(ctx.driver());
    page.open().await?;
    page.trigger_exit_intent().await?;
    page.expect_modal().await?;
    page.close_modal().await
}
