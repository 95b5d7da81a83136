use serde::{Deserialize, Serialize};

/// Shared password of every demo user
pub const PASSWORD: &str = "secret_sauce";

/// A demo account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct User {
    /// Login name
    pub username: &'static str,
    /// Password
    pub password: &'static str,
}

impl User {
    const fn new(username: &'static str) -> Self {
        Self {
            username,
            password: PASSWORD,
        }
    }
}

/// Regular shopper
pub const STANDARD_USER: User = User::new("standard_user");
/// Rejected at login
pub const LOCKED_OUT_USER: User = User::new("locked_out_user");
/// Broken images and sorting
pub const PROBLEM_USER: User = User::new("problem_user");
/// Slow login
pub const PERFORMANCE_GLITCH_USER: User = User::new("performance_glitch_user");
/// Cart and checkout errors
pub const ERROR_USER: User = User::new("error_user");
/// Visual glitches
pub const VISUAL_USER: User = User::new("visual_user");

/// Every account listed on the login page
pub const USERS: [User; 6] = [
    STANDARD_USER,
    LOCKED_OUT_USER,
    PROBLEM_USER,
    PERFORMANCE_GLITCH_USER,
    ERROR_USER,
    VISUAL_USER,
];

/// An inventory item
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Product {
    /// Display name
    pub name: &'static str,
    /// Slug used in `add-to-cart-<id>` / `remove-<id>` test ids
    pub id: &'static str,
    /// Price in dollars
    pub price: f64,
}

/// Sauce Labs Backpack
pub const BACKPACK: Product = Product {
    name: "Sauce Labs Backpack",
    id: "sauce-labs-backpack",
    price: 29.99,
};

/// Sauce Labs Fleece Jacket
pub const FLEECE_JACKET: Product = Product {
    name: "Sauce Labs Fleece Jacket",
    id: "sauce-labs-fleece-jacket",
    price: 49.99,
};

/// Sauce Labs Bolt T-Shirt
pub const BOLT_T_SHIRT: Product = Product {
    name: "Sauce Labs Bolt T-Shirt",
    id: "sauce-labs-bolt-t-shirt",
    price: 15.99,
};

/// Products the scenarios shop for
pub const PRODUCTS: [Product; 3] = [BACKPACK, FLEECE_JACKET, BOLT_T_SHIRT];

/// A rejected login and the message it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLogin {
    /// Username typed
    pub username: &'static str,
    /// Password typed
    pub password: &'static str,
    /// Fragment of the error banner
    pub expected_error: &'static str,
}

/// Credential combinations the login form must reject
pub const INVALID_LOGINS: [InvalidLogin; 4] = [
    InvalidLogin {
        username: "invalid_user",
        password: "wrong_password",
        expected_error: "Username and password do not match",
    },
    InvalidLogin {
        username: "",
        password: PASSWORD,
        expected_error: "Username is required",
    },
    InvalidLogin {
        username: "standard_user",
        password: "",
        expected_error: "Password is required",
    },
    InvalidLogin {
        username: "locked_out_user",
        password: PASSWORD,
        expected_error: "Sorry, this user has been locked out",
    },
];

/// Inventory sort options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Name (A to Z)
    NameAsc,
    /// Name (Z to A)
    NameDesc,
    /// Price (low to high)
    PriceLowHigh,
    /// Price (high to low)
    PriceHighLow,
}

impl SortOrder {
    /// `<option>` value in the sort select
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::NameAsc => "az",
            Self::NameDesc => "za",
            Self::PriceLowHigh => "lohi",
            Self::PriceHighLow => "hilo",
        }
    }
}

/// Parse a displayed price such as `$29.99`
pub(crate) fn parse_price(text: &str) -> Option<f64> {
    text.trim().trim_start_matches('$').parse().ok()
}
