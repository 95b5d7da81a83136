use async_trait::async_trait;
use pomar::{DataGenerator, Driver, Fixture, Generate, PageObject, PomarResult, Provided};

use super::data::{ContactData, UserData};
use super::pages::ContactPages;

/// Every page, constructed directly
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactPagesFixture;

#[async_trait]
impl<'s> Fixture<'s> for ContactPagesFixture {
    type Output = ContactPages<'s>;

    fn name(&self) -> &str {
        "contact_pages"
    }

    async fn setup(&self, driver: &Driver<'s>) -> PomarResult<ContactPages<'s>> {
        Ok(ContactPages::new(driver))
    }
}

/// Pages plus the account they are signed in as
#[derive(Debug)]
pub struct SignedInUser<'s> {
    /// Pages bound to the session
    pub pages: ContactPages<'s>,
    /// The generated account
    pub user: UserData,
}

/// Registers a fresh generated account, then signs in with it
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser<'g> {
    data: &'g DataGenerator,
}

impl<'g> AuthenticatedUser<'g> {
    /// Draw account data from `data`
    #[must_use]
    pub const fn new(data: &'g DataGenerator) -> Self {
        Self { data }
    }
}

#[async_trait]
impl<'s> Fixture<'s> for AuthenticatedUser<'_> {
    type Output = SignedInUser<'s>;

    fn name(&self) -> &str {
        "authenticated_user"
    }

    async fn setup(&self, driver: &Driver<'s>) -> PomarResult<SignedInUser<'s>> {
        let pages = Provided::setup(&ContactPagesFixture, driver).await?.into_output();
        let user = UserData::full(self.data);

        pages.signup.open().await?;
        pages.signup.register(&user).await?;
        pages.contacts.expect_loaded().await?;

        pages.login.open().await?;
        pages.login.login(&user.email, &user.password).await?;
        pages.contacts.expect_loaded().await?;
        Ok(SignedInUser { pages, user })
    }

    async fn teardown(&self, driver: &Driver<'s>, signed_in: &SignedInUser<'s>) -> PomarResult<()> {
        let logout = signed_in.pages.contacts.locator("logout")?;
        driver
            .optional_step("logout", logout, signed_in.pages.contacts.logout())
            .await
            .into_result()
    }
}

/// A signed-in account that already owns some contacts
#[derive(Debug)]
pub struct UserWithContacts<'s> {
    /// Pages and account from [`AuthenticatedUser`]
    pub signed_in: SignedInUser<'s>,
    /// Contacts created, in creation order
    pub contacts: Vec<ContactData>,
}

/// [`AuthenticatedUser`] followed by `count` generated contacts
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserWithContacts<'g> {
    user: AuthenticatedUser<'g>,
    count: usize,
}

impl<'g> AuthenticatedUserWithContacts<'g> {
    /// Seed `count` contacts drawn from `data`
    #[must_use]
    pub const fn new(data: &'g DataGenerator, count: usize) -> Self {
        Self {
            user: AuthenticatedUser::new(data),
            count,
        }
    }
}

#[async_trait]
impl<'s> Fixture<'s> for AuthenticatedUserWithContacts<'_> {
    type Output = UserWithContacts<'s>;

    fn name(&self) -> &str {
        "authenticated_user_with_contacts"
    }

    async fn setup(&self, driver: &Driver<'s>) -> PomarResult<UserWithContacts<'s>> {
        // a failed contact still logs the account out
        let provided = Provided::setup(&self.user, driver).await?;
        let contacts = ContactData::many(self.user.data, self.count);
        for contact in &contacts {
            if let Err(err) = create_contact(&provided.pages, contact).await {
                let _ = provided.teardown().await;
                return Err(err);
            }
        }
        Ok(UserWithContacts {
            signed_in: provided.into_output(),
            contacts,
        })
    }

    async fn teardown(&self, driver: &Driver<'s>, seeded: &UserWithContacts<'s>) -> PomarResult<()> {
        self.user.teardown(driver, &seeded.signed_in).await
    }
}

/// Create a contact through the form and wait for the list
pub async fn create_contact(pages: &ContactPages<'_>, contact: &ContactData) -> PomarResult<()> {
    pages.add_contact.open().await?;
    pages.add_contact.add_contact(contact).await?;
    pages.contacts.expect_loaded().await
}
