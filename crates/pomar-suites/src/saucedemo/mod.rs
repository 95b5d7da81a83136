//! Sauce Demo: login, inventory and cart.
//!
//! Users share the password `secret_sauce`; each username switches the demo
//! into a different behaviour (locked out, broken images, slow responses).

mod data;
mod pages;
mod scenarios;

pub use data::{
    InvalidLogin, Product, SortOrder, User, BACKPACK, BOLT_T_SHIRT, ERROR_USER, FLEECE_JACKET,
    INVALID_LOGINS, LOCKED_OUT_USER, PERFORMANCE_GLITCH_USER, PROBLEM_USER, PRODUCTS,
    STANDARD_USER, USERS, VISUAL_USER,
};
pub use pages::{CartPage, InventoryPage, LoggedInInventory, LoginPage};
pub use scenarios::suite;

use pomar::SuiteDefaults;

/// Hosted demo and its default user
pub const DEFAULTS: SuiteDefaults =
    SuiteDefaults::new("saucedemo", "https://www.saucedemo.com").with_credentials("standard_user", "secret_sauce");
