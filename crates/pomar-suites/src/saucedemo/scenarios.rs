use pomar::prelude::*;

use super::data::{
    SortOrder, BACKPACK, BOLT_T_SHIRT, FLEECE_JACKET, INVALID_LOGINS, LOCKED_OUT_USER, USERS,
};
use super::pages::{InventoryPage, LoggedInInventory, LoginPage};

/// Sauce Demo scenario catalogue
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios([
        Scenario::ui("standard user lands on products", |ctx| {
            Box::pin(standard_user_lands_on_products(ctx))
        })
        .with_tag("smoke"),
        Scenario::ui("locked out user is rejected", |ctx| {
            Box::pin(locked_out_user_is_rejected(ctx))
        }),
        Scenario::ui("invalid credentials show errors", |ctx| {
            Box::pin(invalid_credentials_show_errors(ctx))
        }),
        Scenario::ui("login page lists accepted usernames", |ctx| {
            Box::pin(login_page_lists_usernames(ctx))
        }),
        Scenario::ui("cart badge follows add and remove", |ctx| {
            Box::pin(cart_badge_follows_add_and_remove(ctx))
        })
        .with_tag("cart"),
        Scenario::ui("cart lists added products", |ctx| {
            Box::pin(cart_lists_added_products(ctx))
        })
        .with_tag("cart"),
        Scenario::ui("sort by price low to high", |ctx| {
            Box::pin(sort_by_price_low_to_high(ctx))
        }),
        Scenario::ui("sort by name Z to A", |ctx| Box::pin(sort_by_name_descending(ctx))),
        Scenario::ui("logout returns to login", |ctx| Box::pin(logout_returns_to_login(ctx)))
            .with_tag("smoke"),
    ])
}

async fn standard_user_lands_on_products(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let login = LoginPage::new(driver.clone());
    login.open().await?;
    let credentials = &ctx.config().credentials;
    login.login(&credentials.username, &credentials.password).await?;

    let inventory = InventoryPage::new(driver);
    inventory.expect_loaded().await?;
    inventory.expect_title("Products").await
}

async fn locked_out_user_is_rejected(ctx: &ScenarioContext) -> PomarResult<()> {
    let login = LoginPage::new(ctx.driver());
    login.open().await?;
    login.login_as(&LOCKED_OUT_USER).await?;
    let message = login.error_message().await;
    Assertion::contains(&message, "Sorry, this user has been locked out").check()?;
    Assertion::is_true(login.is_displayed().await, "still on the login form").check()
}

async fn invalid_credentials_show_errors(ctx: &ScenarioContext) -> PomarResult<()> {
    let login = LoginPage::new(ctx.driver());
    for case in &INVALID_LOGINS {
        login.open().await?;
        login.login(case.username, case.password).await?;
        let message = login.error_message().await;
        Assertion::contains(&message, case.expected_error).check()?;
    }
    Ok(())
}

async fn login_page_lists_usernames(ctx: &ScenarioContext) -> PomarResult<()> {
    let login = LoginPage::new(ctx.driver());
    login.open().await?;
    let listed = login.available_usernames().await;
    for user in &USERS {
        let found = listed.iter().any(|name| name == user.username);
        Assertion::is_true(found, &format!("{} is listed", user.username)).check()?;
    }
    Ok(())
}

async fn cart_badge_follows_add_and_remove(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    with_fixture(&LoggedInInventory::default(), &driver, |inventory| {
        Box::pin(async move {
            Assertion::equals("0", inventory.cart_count().await.as_str()).check()?;
            inventory.add_to_cart(&BACKPACK).await?;
            inventory.add_to_cart(&BOLT_T_SHIRT).await?;
            Assertion::equals("2", inventory.cart_count().await.as_str()).check()?;
            inventory.remove_from_cart(&BACKPACK).await?;
            Assertion::equals("1", inventory.cart_count().await.as_str()).check()?;
            inventory.remove_from_cart(&BOLT_T_SHIRT).await?;
            Assertion::equals("0", inventory.cart_count().await.as_str()).check()
        })
    })
    .await
}

async fn cart_lists_added_products(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    with_fixture(&LoggedInInventory::default(), &driver, |inventory| {
        Box::pin(async move {
            inventory.add_to_cart(&BACKPACK).await?;
            inventory.add_to_cart(&FLEECE_JACKET).await?;
            let cart = inventory.open_cart().await?;

            let names = cart.item_names().await?;
            Assertion::has_length(&names, 2).check()?;
            for product in [BACKPACK, FLEECE_JACKET] {
                let listed = names.iter().any(|name| name == product.name);
                Assertion::is_true(listed, &format!("cart lists {}", product.name)).check()?;
            }

            cart.remove(&BACKPACK).await?;
            Assertion::equals(&1, &cart.item_count().await?).check()?;
            let inventory = cart.continue_shopping().await?;
            Assertion::equals("1", inventory.cart_count().await.as_str()).check()
        })
    })
    .await
}

async fn sort_by_price_low_to_high(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    with_fixture(&LoggedInInventory::default(), &driver, |inventory| {
        Box::pin(async move {
            inventory.sort_by(SortOrder::PriceLowHigh).await?;
            let prices = inventory.item_prices().await?;
            Assertion::is_true(!prices.is_empty(), "inventory lists prices").check()?;
            let mut sorted = prices.clone();
            sorted.sort_by(f64::total_cmp);
            Assertion::equals(&sorted, &prices).check()
        })
    })
    .await
}

async fn sort_by_name_descending(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    with_fixture(&LoggedInInventory::default(), &driver, |inventory| {
        Box::pin(async move {
            inventory.sort_by(SortOrder::NameDesc).await?;
            let names = inventory.item_names().await?;
            let mut sorted = names.clone();
            sorted.sort_by(|a, b| b.cmp(a));
            Assertion::equals(&sorted, &names).check()
        })
    })
    .await
}

async fn logout_returns_to_login(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = LoggedInInventory::default();
    let inventory = Provided::setup(&fixture, &driver).await?;
    inventory.logout().await?;

    let login = LoginPage::new(driver.clone());
    driver.expect_url(&login).await?;
    Assertion::is_true(login.is_displayed().await, "login form is shown after logout").check()
}
