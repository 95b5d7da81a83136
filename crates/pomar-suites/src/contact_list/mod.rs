//! Contact List: sign-up, sign-in and contact management.
//!
//! Every UI scenario registers its own generated account, so runs never
//! depend on pre-existing users. The same app exposes a bearer-token REST
//! API under `/users` and `/contacts`.

mod api;
mod data;
mod fixtures;
mod pages;
mod scenarios;

pub use api::{ContactApi, ContactRecord};
pub use data::{ContactData, UserData, INVALID_EMAILS, INVALID_PHONES};
pub use fixtures::{
    create_contact, AuthenticatedUser, AuthenticatedUserWithContacts, ContactPagesFixture,
    SignedInUser, UserWithContacts,
};
pub use pages::{
    AddContactPage, ContactDetailsPage, ContactPages, ContactRow, ContactsPage, LoginPage,
    SignupPage,
};
pub use scenarios::suite;

use pomar::SuiteDefaults;

/// Hosted app; accounts are generated per scenario
pub const DEFAULTS: SuiteDefaults =
    SuiteDefaults::new("contact-list", "https://thinking-tester-contact-list.herokuapp.com");
