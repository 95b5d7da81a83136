use async_trait::async_trait;
use pomar::{Driver, Fixture, Locator, LocatorRegistry, PageObject, PomarResult, Selector};

use super::data::{parse_price, Product, SortOrder, User, STANDARD_USER};

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
        let locators = LocatorRegistry::builder("saucedemo login")
            .data_test("username", "username")
            .data_test("password", "password")
            .data_test("submit", "login-button")
            .data_test("error", "error")
            .css("logo", ".login_logo")
            .css("credentials", "#login_credentials")
            .build();
        Self { driver, locators }
    }

    /// Navigate here and wait for the form
    pub async fn open(&self) -> PomarResult<()> {
        self.driver.open(self).await?;
        self.driver.wait_visible(self.locator("submit")?).await
    }

    /// Type credentials and submit
    pub async fn login(&self, username: &str, password: &str) -> PomarResult<()> {
        tracing::info!(username, "saucedemo login");
        self.driver.fill(self.locator("username")?, username).await?;
        self.driver.fill(self.locator("password")?, password).await?;
        self.driver.click(self.locator("submit")?).await
    }

    /// Log in as a demo account
    pub async fn login_as(&self, user: &User) -> PomarResult<()> {
        self.login(user.username, user.password).await
    }

    /// Error banner text, empty when there is none
    pub async fn error_message(&self) -> String {
        match self.locator("error") {
            Ok(locator) => self.driver.text_or_default(locator).await,
            Err(_) => String::new(),
        }
    }

    /// Whether the form is on screen
    pub async fn is_displayed(&self) -> bool {
        match self.locator("submit") {
            Ok(locator) => self.driver.is_visible(locator).await,
            Err(_) => false,
        }
    }

    /// Usernames advertised under the form
    pub async fn available_usernames(&self) -> Vec<String> {
        let text = match self.locator("credentials") {
            Ok(locator) => self.driver.text_or_default(locator).await,
            Err(_) => String::new(),
        };
        parse_usernames(&text)
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

fn parse_usernames(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches("Accepted usernames are:").trim())
        .take_while(|line| !line.starts_with("Password for all users"))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Product listing shown after login
#[derive(Debug)]
pub struct InventoryPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> InventoryPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("saucedemo inventory")
            .css("title", ".title")
            .css("container", ".inventory_container")
            .css("items", ".inventory_item")
            .css("item_names", ".inventory_item_name")
            .css("item_prices", ".inventory_item_price")
            .css("cart_link", ".shopping_cart_link")
            .css("cart_badge", ".shopping_cart_badge")
            .css("sort", ".product_sort_container")
            .css("menu", "#react-burger-menu-btn")
            .css("about", "#about_sidebar_link")
            .css("logout", "#logout_sidebar_link")
            .build();
        Self { driver, locators }
    }

    /// Wait until the listing is on screen
    pub async fn expect_loaded(&self) -> PomarResult<()> {
        self.driver.expect_url(self).await?;
        self.driver.wait_visible(self.locator("container")?).await
    }

    /// Header title
    pub async fn title(&self) -> PomarResult<String> {
        self.driver.text(self.locator("title")?).await
    }

    /// Expect the header title to read `expected`
    pub async fn expect_title(&self, expected: &str) -> PomarResult<()> {
        self.driver.expect_text(self.locator("title")?, expected).await
    }

    /// Add a product through its `add-to-cart-<id>` button
    pub async fn add_to_cart(&self, product: &Product) -> PomarResult<()> {
        tracing::info!(product = product.name, "add to cart");
        let button = Locator::from_selector(Selector::data_test(format!("add-to-cart-{}", product.id)));
        self.driver.click(&button).await
    }

    /// Remove a product through its `remove-<id>` button
    pub async fn remove_from_cart(&self, product: &Product) -> PomarResult<()> {
        tracing::info!(product = product.name, "remove from cart");
        let button = Locator::from_selector(Selector::data_test(format!("remove-{}", product.id)));
        self.driver.click(&button).await
    }

    /// Cart badge text; `"0"` when the badge is not rendered
    pub async fn cart_count(&self) -> String {
        let text = match self.locator("cart_badge") {
            Ok(locator) => self.driver.text_or_default(locator).await,
            Err(_) => String::new(),
        };
        if text.is_empty() {
            "0".to_string()
        } else {
            text
        }
    }

    /// Choose a sort order
    pub async fn sort_by(&self, order: SortOrder) -> PomarResult<()> {
        self.driver.select_option(self.locator("sort")?, order.value()).await
    }

    /// Product names in display order
    pub async fn item_names(&self) -> PomarResult<Vec<String>> {
        self.driver.wait_visible(self.locator("items")?).await?;
        self.driver.all_texts(self.locator("item_names")?).await
    }

    /// Product prices in display order
    pub async fn item_prices(&self) -> PomarResult<Vec<f64>> {
        self.driver.wait_visible(self.locator("items")?).await?;
        let texts = self.driver.all_texts(self.locator("item_prices")?).await?;
        Ok(texts.iter().filter_map(|t| parse_price(t)).collect())
    }

    /// Go to the cart
    pub async fn open_cart(&self) -> PomarResult<CartPage<'s>> {
        self.driver.click(self.locator("cart_link")?).await?;
        let cart = CartPage::new(self.driver.clone());
        cart.expect_loaded().await?;
        Ok(cart)
    }

    /// Open the burger menu
    pub async fn open_menu(&self) -> PomarResult<()> {
        self.driver.click(self.locator("menu")?).await?;
        self.driver.wait_visible(self.locator("logout")?).await
    }

    /// Log out through the burger menu
    pub async fn logout(&self) -> PomarResult<()> {
        self.open_menu().await?;
        self.driver.click(self.locator("logout")?).await
    }
}

impl PageObject for InventoryPage<'_> {
    fn path(&self) -> &str {
        "/inventory.html"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// Shopping cart
#[derive(Debug)]
pub struct CartPage<'s> {
    driver: Driver<'s>,
    locators: LocatorRegistry,
}

impl<'s> CartPage<'s> {
    /// Bind to a driver
    #[must_use]
    pub fn new(driver: Driver<'s>) -> Self {
        let locators = LocatorRegistry::builder("saucedemo cart")
            .css("container", ".cart_contents_container")
            .css("items", ".cart_item")
            .css("item_names", ".inventory_item_name")
            .css("item_prices", ".inventory_item_price")
            .data_test("checkout", "checkout")
            .data_test("continue", "continue-shopping")
            .build();
        Self { driver, locators }
    }

    /// Wait until the cart is on screen
    pub async fn expect_loaded(&self) -> PomarResult<()> {
        self.driver.expect_url(self).await?;
        self.driver.wait_visible(self.locator("container")?).await
    }

    /// Names of the items in the cart
    pub async fn item_names(&self) -> PomarResult<Vec<String>> {
        self.driver.all_texts(self.locator("item_names")?).await
    }

    /// Number of cart rows
    pub async fn item_count(&self) -> PomarResult<usize> {
        self.driver.count(self.locator("items")?).await
    }

    /// Whether the cart has no rows
    pub async fn is_empty(&self) -> PomarResult<bool> {
        Ok(self.item_count().await? == 0)
    }

    /// Whether a product with this name is in the cart
    pub async fn contains(&self, name: &str) -> PomarResult<bool> {
        Ok(self.item_names().await?.iter().any(|n| n == name))
    }

    /// Remove a product
    pub async fn remove(&self, product: &Product) -> PomarResult<()> {
        let button = Locator::from_selector(Selector::data_test(format!("remove-{}", product.id)));
        self.driver.click(&button).await
    }

    /// Back to the inventory
    pub async fn continue_shopping(&self) -> PomarResult<InventoryPage<'s>> {
        self.driver.click(self.locator("continue")?).await?;
        let inventory = InventoryPage::new(self.driver.clone());
        inventory.expect_loaded().await?;
        Ok(inventory)
    }

    /// Start checkout
    pub async fn checkout(&self) -> PomarResult<()> {
        self.driver.click(self.locator("checkout")?).await?;
        self.driver.expect_url_contains("checkout-step-one").await
    }
}

impl PageObject for CartPage<'_> {
    fn path(&self) -> &str {
        "/cart.html"
    }

    fn locators(&self) -> &LocatorRegistry {
        &self.locators
    }
}

/// Logs a user in and yields the inventory; logs out on teardown
#[derive(Debug, Clone, Copy)]
pub struct LoggedInInventory {
    user: User,
}

impl LoggedInInventory {
    /// Log in as `user`
    #[must_use]
    pub const fn new(user: User) -> Self {
        Self { user }
    }
}

impl Default for LoggedInInventory {
    fn default() -> Self {
        Self::new(STANDARD_USER)
    }
}

#[async_trait]
impl<'s> Fixture<'s> for LoggedInInventory {
    type Output = InventoryPage<'s>;

    fn name(&self) -> &str {
        "logged_in_inventory"
    }

    async fn setup(&self, driver: &Driver<'s>) -> PomarResult<InventoryPage<'s>> {
        let login = LoginPage::new(driver.clone());
        login.open().await?;
        login.login_as(&self.user).await?;
        let inventory = InventoryPage::new(driver.clone());
        inventory.expect_loaded().await?;
        Ok(inventory)
    }

    async fn teardown(&self, _driver: &Driver<'s>, inventory: &InventoryPage<'s>) -> PomarResult<()> {
        inventory.logout().await
    }
}
