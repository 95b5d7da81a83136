use pomar::prelude::*;
use serde_json::json;

use super::api::ContactApi;
use super::data::{ContactData, UserData, INVALID_EMAILS, INVALID_PHONES};
use super::fixtures::{create_contact, AuthenticatedUser, AuthenticatedUserWithContacts};
use super::pages::{AddContactPage, LoginPage, SignupPage};

/// Contact-list scenario catalogue (UI and REST API)
#[must_use]
pub fn suite(config: SuiteConfig) -> Suite {
    Suite::new(config).with_scenarios([
        Scenario::ui("login page is displayed", |ctx| Box::pin(login_page_is_displayed(ctx)))
            .with_tag("smoke"),
        Scenario::ui("invalid login shows an error", |ctx| {
            Box::pin(invalid_login_shows_error(ctx))
        }),
        Scenario::ui("new user lands on the contact list", |ctx| {
            Box::pin(new_user_lands_on_contact_list(ctx))
        })
        .with_tag("smoke"),
        Scenario::ui("created contact appears in the list", |ctx| {
            Box::pin(created_contact_appears_in_list(ctx))
        }),
        Scenario::ui("contact details echo the contact", |ctx| {
            Box::pin(contact_details_echo_contact(ctx))
        }),
        Scenario::ui("minimal contact is accepted", |ctx| {
            Box::pin(minimal_contact_is_accepted(ctx))
        }),
        Scenario::ui("invalid email is rejected", |ctx| Box::pin(invalid_email_is_rejected(ctx)))
            .with_tag("validation"),
        Scenario::ui("invalid phone is rejected", |ctx| Box::pin(invalid_phone_is_rejected(ctx)))
            .with_tag("validation"),
        Scenario::ui("deleted contact leaves the list", |ctx| {
            Box::pin(deleted_contact_leaves_list(ctx))
        }),
        Scenario::ui("seeded user owns three contacts", |ctx| {
            Box::pin(seeded_user_owns_three_contacts(ctx))
        }),
        Scenario::ui("logout returns to login", |ctx| Box::pin(logout_returns_to_login(ctx))),
        Scenario::api("api register and login", |ctx| Box::pin(api_register_and_login(ctx)))
            .with_tag("api"),
        Scenario::api("api contact lifecycle", |ctx| Box::pin(api_contact_lifecycle(ctx)))
            .with_tag("api"),
    ])
}

async fn login_page_is_displayed(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let login = LoginPage::new(driver.clone());
    login.open().await?;
    for key in ["email", "password", "submit", "signup"] {
        driver.expect_visible(login.locator(key)?).await?;
    }
    login.go_to_signup().await?;
    SignupPage::new(driver.clone()).cancel().await?;
    let back = driver.is_visible(login.locator("signup")?).await;
    Assertion::is_true(back, "cancelled sign-up returns to login").check()
}

async fn invalid_login_shows_error(ctx: &ScenarioContext) -> PomarResult<()> {
    let login = LoginPage::new(ctx.driver());
    login.open().await?;
    let stranger = UserData::full(ctx.data());
    login.login(&stranger.email, &stranger.password).await?;
    let message = login.error_message().await?;
    Assertion::contains(&message, "Incorrect username or password").check()
}

async fn new_user_lands_on_contact_list(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUser::new(ctx.data());
    with_fixture(&fixture, &driver, |signed_in| {
        Box::pin(async move {
            let contacts = &signed_in.pages.contacts;
            contacts.expect_loaded().await?;
            Assertion::equals(&0, &contacts.contact_count().await?).check()
        })
    })
    .await
}

async fn created_contact_appears_in_list(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUserWithContacts::new(ctx.data(), 1);
    with_fixture(&fixture, &driver, |seeded| {
        Box::pin(async move {
            seeded.signed_in.pages.contacts.open().await?;
            let rows_first = seeded.signed_in.pages.contacts.wait_for_contacts().await?;
            Assertion::is_true(rows_first, "contact table rendered rows").check()?;
            let text = seeded.signed_in.pages.contacts.list_text().await?;
            let contact = seeded
                .contacts
                .first()
                .ok_or_else(|| PomarError::assertion("no contact was seeded"))?;
            Assertion::contains(&text, &contact.first_name).check()?;
            Assertion::contains(&text, &contact.last_name).check()?;

            let row = seeded.signed_in.pages.contacts.contact_row(&contact.full_name()).await?;
            Assertion::equals(contact.email.as_str(), row.email.as_str()).check()?;
            Assertion::equals(contact.phone.as_str(), row.phone.as_str()).check()
        })
    })
    .await
}

async fn contact_details_echo_contact(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUserWithContacts::new(ctx.data(), 1);
    with_fixture(&fixture, &driver, |seeded| {
        Box::pin(async move {
            let pages = &seeded.signed_in.pages;
            let contact = seeded
                .contacts
                .first()
                .ok_or_else(|| PomarError::assertion("no contact was seeded"))?;
            pages.contacts.open_contact(&contact.full_name()).await?;
            pages.details.expect_loaded().await?;

            Assertion::equals(&contact.full_name(), &pages.details.full_name().await?).check()?;
            Assertion::equals(&contact.email, &pages.details.email().await?).check()?;
            Assertion::equals(&contact.phone, &pages.details.phone().await?).check()?;
            Assertion::equals(&contact.birthdate, &pages.details.birthdate().await?).check()?;

            pages.details.return_to_list().await?;
            pages.contacts.open_add_contact().await?;
            pages.add_contact.cancel().await?;
            pages.contacts.expect_loaded().await
        })
    })
    .await
}

async fn minimal_contact_is_accepted(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUser::new(ctx.data());
    let signed_in = Provided::setup(&fixture, &driver).await?;

    let contact = ContactData::minimal(ctx.data());
    create_contact(&signed_in.pages, &contact).await?;
    let present = signed_in.pages.contacts.is_contact_present(&contact.full_name()).await;
    Assertion::is_true(present, "minimal contact is listed").check()
}

/// Submit `contact` and expect the form to stay put with an error
async fn expect_rejected(driver: &Driver<'_>, contact: &ContactData) -> PomarResult<()> {
    let form = AddContactPage::new(driver.clone());
    form.open().await?;
    form.add_contact(contact).await?;
    Assertion::is_true(form.has_error().await?, "validation error is shown").check()?;
    driver.expect_url(&form).await
}

async fn invalid_email_is_rejected(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUser::new(ctx.data());
    let _signed_in = Provided::setup(&fixture, &driver).await?;

    for email in INVALID_EMAILS.into_iter().filter(|e| !e.is_empty()) {
        let contact = ContactData::with_invalid_email(ctx.data(), email);
        expect_rejected(&driver, &contact).await?;
    }
    Ok(())
}

async fn invalid_phone_is_rejected(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUser::new(ctx.data());
    let _signed_in = Provided::setup(&fixture, &driver).await?;

    for phone in INVALID_PHONES {
        let contact = ContactData::with_invalid_phone(ctx.data(), phone);
        expect_rejected(&driver, &contact).await?;
    }
    Ok(())
}

async fn deleted_contact_leaves_list(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUserWithContacts::new(ctx.data(), 1);
    let seeded = Provided::setup(&fixture, &driver).await?;
    let pages = &seeded.signed_in.pages;
    let name = seeded
        .contacts
        .first()
        .map(ContactData::full_name)
        .ok_or_else(|| PomarError::assertion("no contact was seeded"))?;

    pages.contacts.open_contact(&name).await?;
    pages.details.expect_loaded().await?;
    pages.details.delete_contact().await?;
    pages.contacts.expect_loaded().await?;
    pages.contacts.expect_contact_count(0).await?;
    let present = pages.contacts.is_contact_present(&name).await;
    Assertion::is_true(!present, "deleted contact is gone").check()
}

async fn seeded_user_owns_three_contacts(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUserWithContacts::new(ctx.data(), 3);
    let seeded = Provided::setup(&fixture, &driver).await?;

    seeded.signed_in.pages.contacts.expect_contact_count(3).await?;
    let names = seeded.signed_in.pages.contacts.contact_names().await?;
    for contact in &seeded.contacts {
        let listed = names.contains(&contact.full_name());
        Assertion::is_true(listed, &format!("{} is listed", contact.full_name())).check()?;
    }
    Ok(())
}

async fn logout_returns_to_login(ctx: &ScenarioContext) -> PomarResult<()> {
    let driver = ctx.driver();
    let fixture = AuthenticatedUser::new(ctx.data());
    let signed_in = Provided::setup(&fixture, &driver).await?;

    signed_in.pages.contacts.logout().await?;
    driver.expect_url(&signed_in.pages.login).await?;
    Assertion::is_true(signed_in.pages.login.is_displayed().await?, "login form is shown").check()
}

async fn api_register_and_login(ctx: &ScenarioContext) -> PomarResult<()> {
    let api = ContactApi::new(ctx.api().clone());
    let user = UserData::full(ctx.data());
    let token = api.register(&user).await?;
    Assertion::is_true(!token.is_empty(), "registration returns a token").check()?;

    let token = api.login(&user.email, &user.password).await?;
    Assertion::is_true(!token.is_empty(), "login returns a token").check()?;
    api.authenticated(&token).logout().await
}

async fn api_contact_lifecycle(ctx: &ScenarioContext) -> PomarResult<()> {
    let anonymous = ContactApi::new(ctx.api().clone());
    let token = anonymous.register(&UserData::full(ctx.data())).await?;
    let api = anonymous.authenticated(&token);

    let contact = ContactData::full(ctx.data());
    let created = api.add_contact(&contact).await?;
    Assertion::is_true(!created.id.is_empty(), "contact has an id").check()?;
    Assertion::equals(&contact.first_name, &created.contact.first_name).check()?;

    let listed = api.contacts().await?;
    let found = listed.iter().any(|c| c.id == created.id);
    Assertion::is_true(found, "new contact is listed").check()?;
    let fetched = api.get_contact(&created.id).await?;
    Assertion::equals(&contact.email, &fetched.contact.email).check()?;

    let replacement = ContactData::full(ctx.data());
    let updated = api.update_contact(&created.id, &replacement).await?;
    Assertion::equals(&replacement.last_name, &updated.contact.last_name).check()?;

    let patched = api
        .patch_contact(&created.id, &json!({ "firstName": "Patched" }))
        .await?;
    Assertion::equals("Patched", patched.contact.first_name.as_str()).check()?;
    Assertion::equals(&replacement.last_name, &patched.contact.last_name).check()?;

    api.delete_contact(&created.id).await?;
    let gone = api.contact(&created.id).await?;
    Assertion::status(404, gone.status).check()?;
    api.logout().await
}
