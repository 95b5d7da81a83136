//! Sauce Demo replica: login, inventory with sorting, cart and burger menu.

use pomar::fake::{AppState, Dom};
use pomar::{FakeElement, FakePage, FakeSite};
use serde_json::{json, Value};

const PASSWORD: &str = "secret_sauce";

/// `(name, slug, price)` in the demo's default order
pub const CATALOGUE: [(&str, &str, f64); 6] = [
    ("Sauce Labs Backpack", "sauce-labs-backpack", 29.99),
    ("Sauce Labs Bike Light", "sauce-labs-bike-light", 9.99),
    ("Sauce Labs Bolt T-Shirt", "sauce-labs-bolt-t-shirt", 15.99),
    ("Sauce Labs Fleece Jacket", "sauce-labs-fleece-jacket", 49.99),
    ("Sauce Labs Onesie", "sauce-labs-onesie", 7.99),
    ("Test.allTheThings() T-Shirt (Red)", "test.allthethings()-t-shirt-(red)", 15.99),
];

const ACCEPTED: [&str; 6] = [
    "standard_user",
    "locked_out_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

fn cart(state: &AppState) -> Vec<String> {
    state
        .get("cart")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn set_cart(dom: &mut Dom<'_>, items: &[String]) {
    let _ = dom.state_mut().insert("cart".into(), json!(items));
}

fn sort_order(state: &AppState) -> String {
    state
        .get("sort")
        .and_then(Value::as_str)
        .unwrap_or("az")
        .to_string()
}

fn login_error(username: &str, password: &str) -> Option<&'static str> {
    if username.is_empty() {
        Some("Epic sadface: Username is required")
    } else if password.is_empty() {
        Some("Epic sadface: Password is required")
    } else if username == "locked_out_user" && password == PASSWORD {
        Some("Epic sadface: Sorry, this user has been locked out.")
    } else if !ACCEPTED.contains(&username) || password != PASSWORD {
        Some("Epic sadface: Username and password do not match any user in this service")
    } else {
        None
    }
}

fn login_page() -> FakePage {
    let credentials = format!(
        "Accepted usernames are:\n{}\n\nPassword for all users:\n{PASSWORD}",
        ACCEPTED.join("\n")
    );
    FakePage::new("Swag Labs").elements([
        FakeElement::new(".login_logo").text("Swag Labs"),
        FakeElement::new("#user-name").data_test("username"),
        FakeElement::new("#password").data_test("password"),
        FakeElement::new("h3").data_test("error").hidden(),
        FakeElement::new("#login-button")
            .data_test("login-button")
            .on_click(|dom| {
                let username = dom.value("#user-name");
                let password = dom.value("#password");
                match login_error(&username, &password) {
                    Some(message) => {
                        dom.set_text("h3", message);
                        dom.show("h3");
                    }
                    None => {
                        let _ = dom.state_mut().insert("user".into(), json!(username));
                        set_cart(dom, &[]);
                        dom.navigate("/inventory.html");
                    }
                }
            }),
        FakeElement::new("#login_credentials").text(credentials),
    ])
}

fn header(items: &[String]) -> Vec<FakeElement> {
    let mut elements = vec![
        FakeElement::new(".shopping_cart_link").on_click(|dom| dom.navigate("/cart.html")),
        FakeElement::new("#react-burger-menu-btn").on_click(|dom| {
            dom.show("#about_sidebar_link");
            dom.show("#logout_sidebar_link");
        }),
        FakeElement::new("#about_sidebar_link").text("About").hidden(),
        FakeElement::new("#logout_sidebar_link")
            .text("Logout")
            .hidden()
            .on_click(|dom| {
                let _ = dom.state_mut().remove("user");
                set_cart(dom, &[]);
                dom.navigate("/");
            }),
    ];
    if !items.is_empty() {
        elements.push(FakeElement::new(".shopping_cart_badge").text(items.len().to_string()));
    }
    elements
}

fn toggle_button(slug: &str, in_cart: bool, page: &'static str) -> FakeElement {
    let owned = slug.to_string();
    if in_cart {
        FakeElement::new(format!("#remove-{slug}"))
            .data_test(&format!("remove-{slug}"))
            .text("Remove")
            .on_click(move |dom| {
                let items: Vec<String> = cart(dom.state()).into_iter().filter(|s| *s != owned).collect();
                set_cart(dom, &items);
                dom.navigate(page);
            })
    } else {
        FakeElement::new(format!("#add-to-cart-{slug}"))
            .data_test(&format!("add-to-cart-{slug}"))
            .text("Add to cart")
            .on_click(move |dom| {
                let mut items = cart(dom.state());
                items.push(owned.clone());
                set_cart(dom, &items);
                dom.navigate(page);
            })
    }
}

fn inventory_page(state: &AppState) -> FakePage {
    let items = cart(state);
    let order = sort_order(state);
    let mut products = CATALOGUE.to_vec();
    match order.as_str() {
        "za" => products.sort_by(|a, b| b.0.cmp(&a.0)),
        "lohi" => products.sort_by(|a, b| a.2.total_cmp(&b.2)),
        "hilo" => products.sort_by(|a, b| b.2.total_cmp(&a.2)),
        _ => products.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    let mut page = FakePage::new("Swag Labs")
        .element(FakeElement::new(".title").text("Products"))
        .element(FakeElement::new(".inventory_container"))
        .element(
            FakeElement::new(".product_sort_container")
                .options(["az", "za", "lohi", "hilo"])
                .value(order)
                .on("change", |dom| {
                    let order = dom.value(".product_sort_container");
                    let _ = dom.state_mut().insert("sort".into(), json!(order));
                    dom.navigate("/inventory.html");
                }),
        )
        .elements(header(&items));
    for (name, slug, price) in products {
        let in_cart = items.iter().any(|s| s == slug);
        page = page.elements([
            FakeElement::new(".inventory_item").text(format!("{name} ${price:.2}")),
            FakeElement::new(".inventory_item_name").text(name),
            FakeElement::new(".inventory_item_price").text(format!("${price:.2}")),
            toggle_button(slug, in_cart, "/inventory.html"),
        ]);
    }
    page
}

fn cart_page(state: &AppState) -> FakePage {
    let items = cart(state);
    let mut page = FakePage::new("Swag Labs")
        .element(FakeElement::new(".title").text("Your Cart"))
        .element(FakeElement::new(".cart_contents_container"))
        .element(
            FakeElement::new("#continue-shopping")
                .data_test("continue-shopping")
                .on_click(|dom| dom.navigate("/inventory.html")),
        )
        .element(
            FakeElement::new("#checkout")
                .data_test("checkout")
                .on_click(|dom| dom.navigate("/checkout-step-one.html")),
        )
        .elements(header(&items));
    for slug in &items {
        if let Some((name, _, price)) = CATALOGUE.iter().find(|(_, s, _)| *s == slug.as_str()) {
            page = page.elements([
                FakeElement::new(".cart_item").text(format!("1 {name} ${price:.2}")),
                FakeElement::new(".inventory_item_name").text(*name),
                FakeElement::new(".inventory_item_price").text(format!("${price:.2}")),
                toggle_button(slug, true, "/cart.html"),
            ]);
        }
    }
    page
}

/// The whole demo served at `base_url`
pub fn saucedemo(base_url: &str) -> FakeSite {
    FakeSite::new(base_url)
        .route("/", |_| login_page())
        .route("/inventory.html", inventory_page)
        .route("/cart.html", cart_page)
        .page(
            "/checkout-step-one.html",
            FakePage::new("Swag Labs").element(FakeElement::new(".title").text("Checkout: Your Information")),
        )
}
