//! Small single-purpose demos: ACME bank, ParaBank admin, GitHub user
//! search, the DemoQA book store and the exit intent modal.

use pomar::fake::AppState;
use pomar::{FakeElement, FakePage, FakeSite};
use pomar_suites::{acme, bookstore, github_search, parabank, the_internet};
use serde_json::{json, Value};

/// ACME login and dashboard; any credentials are accepted
pub fn acme_site() -> FakeSite {
    let login = FakePage::new("ACME demo app").elements([
        FakeElement::new(".form-container"),
        FakeElement::new(".logo-w img"),
        FakeElement::new("h4").text("Login Form"),
        FakeElement::new("#username"),
        FakeElement::new("#password").on_press("Enter", |dom| dom.navigate("/app.html")),
        FakeElement::new("#log-in")
            .text("Log In")
            .on_click(|dom| dom.navigate("/app.html")),
        FakeElement::new(r#"input[name="remember-me"]"#).attr("type", "checkbox"),
    ]);
    let dashboard = FakePage::new("ACME demo app").elements([
        FakeElement::new(".main-content"),
        FakeElement::new("h1, h2").text("Financial Overview"),
        FakeElement::new(".balance-amount").text("$350"),
        FakeElement::new("#log-out").on_click(|dom| dom.navigate("/")),
        FakeElement::new(r#"a[href*="dashboard"]"#).text("Dashboard"),
        FakeElement::new(r#"a[href*="accounts"]"#).text("Accounts"),
    ]);
    FakeSite::new(acme::DEFAULTS.base_url)
        .page("/", login)
        .page("/app.html", dashboard)
}

fn setting(state: &AppState, key: &str, default: &str) -> String {
    state
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn admin_page(state: &AppState) -> FakePage {
    let mut page = FakePage::new("ParaBank | Administration");
    if state.get("logged_in").is_none() {
        page = page.elements([
            FakeElement::new(r#"input[name="username"]"#),
            FakeElement::new(r#"input[name="password"]"#),
            FakeElement::new(r#"input[value="Log In"]"#).on_click(|dom| {
                let _ = dom.state_mut().insert("logged_in".into(), json!(true));
                dom.navigate("/admin.htm");
            }),
        ]);
    }
    let message = setting(state, "message", "");
    if !message.is_empty() {
        page = page.element(FakeElement::new("#rightPanel p").text(message));
    }
    page.elements([
        FakeElement::new(r#"button[value="INIT"]"#)
            .text("Initialize")
            .on_click(|dom| {
                let _ = dom.state_mut().insert("message".into(), json!("Database Initialized"));
                dom.navigate("/admin.htm");
            }),
        FakeElement::new(r#"button[value="CLEAN"]"#)
            .text("Clean")
            .on_click(|dom| {
                let _ = dom.state_mut().insert("message".into(), json!("Database Cleaned"));
                dom.navigate("/admin.htm");
            }),
        FakeElement::new("#loanProvider")
            .options(["funds", "combined", "wsapi"])
            .value(setting(state, "loanProvider", "funds")),
        FakeElement::new("#dataAccessMode")
            .options(["jdbc", "jpa"])
            .value(setting(state, "dataAccessMode", "jdbc")),
        FakeElement::new("#initialBalance").value(setting(state, "initialBalance", "515.50")),
        FakeElement::new("#minimumBalance").value(setting(state, "minimumBalance", "100")),
        FakeElement::new(r#"input[value="Submit"]"#).on_click(|dom| {
            for key in ["loanProvider", "dataAccessMode", "initialBalance", "minimumBalance"] {
                let value = dom.value(&format!("#{key}"));
                let _ = dom.state_mut().insert(key.into(), json!(value));
            }
            let _ = dom
                .state_mut()
                .insert("message".into(), json!("Settings saved successfully."));
            dom.navigate("/admin.htm");
        }),
    ])
}

/// ParaBank administration under its `/parabank` context path
pub fn parabank_site() -> FakeSite {
    FakeSite::new(parabank::DEFAULTS.base_url).route("/admin.htm", admin_page)
}

/// GitHub search knowing only the octocat account
pub fn github_search_site() -> FakeSite {
    let page = FakePage::new("GitHub User Search").elements([
        FakeElement::new("#username-input").on("input", |dom| {
            let typed = !dom.value("#username-input").is_empty();
            dom.set_enabled("#search-button", typed);
        }),
        FakeElement::new("#search-button")
            .text("Search")
            .disabled()
            .on_click(|dom| {
                dom.remove(".user-card");
                dom.remove(".user-card .username");
                dom.hide(".error-message");
                let login = dom.value("#username-input");
                if login == github_search::KNOWN_USER {
                    dom.push(FakeElement::new(".user-card").text(format!("The Octocat @{login}")));
                    dom.push(FakeElement::new(".user-card .username").text(login));
                } else {
                    dom.show(".error-message");
                }
            }),
        FakeElement::new(".error-message")
            .text("There is no user with that username")
            .hidden(),
    ]);
    FakeSite::new(github_search::DEFAULTS.base_url).page("/", page)
}

const BOOKS: [(&str, &str); 8] = [
    ("Git Pocket Guide", "Richard E. Silverman"),
    ("Learning JavaScript Design Patterns", "Addy Osmani"),
    ("Designing Evolvable Web APIs with ASP.NET", "Glenn Block et al."),
    ("Speaking JavaScript", "Axel Rauschmayer"),
    ("You Don't Know JS", "Kyle Simpson"),
    ("Programming JavaScript Applications", "Eric Elliott"),
    ("Eloquent JavaScript, Second Edition", "Marijn Haverbeke"),
    ("Understanding ECMAScript 6", "Nicholas C. Zakas"),
];

fn title_link(title: &str) -> FakeElement {
    FakeElement::new(".action-buttons a").text(title)
}

/// Book store list filtered by title or author as the box changes
pub fn bookstore_site() -> FakeSite {
    let page = FakePage::new("DEMOQA")
        .element(FakeElement::new("#searchBox").on("input", |dom| {
            let query = dom.value("#searchBox").to_lowercase();
            dom.remove(".action-buttons a");
            for (title, author) in BOOKS {
                if title.to_lowercase().contains(&query) || author.to_lowercase().contains(&query) {
                    dom.push(title_link(title));
                }
            }
        }))
        .elements(BOOKS.map(|(title, _)| title_link(title)));
    FakeSite::new(bookstore::DEFAULTS.base_url).page("/books", page)
}

/// Exit intent page whose modal opens on `mouseleave`
pub fn the_internet_site() -> FakeSite {
    let page = FakePage::new("The Internet").elements([
        FakeElement::new("html").on("mouseleave", |dom| {
            dom.show("#ouibounce-modal .modal");
            dom.show(".modal-body p");
        }),
        FakeElement::new("#ouibounce-modal .modal").hidden(),
        FakeElement::new(".modal-body p")
            .text(the_internet::MODAL_TEXT)
            .hidden(),
        FakeElement::new(".modal-footer p").text("Close").on_click(|dom| {
            dom.hide("#ouibounce-modal .modal");
            dom.hide(".modal-body p");
        }),
    ]);
    FakeSite::new(the_internet::DEFAULTS.base_url).page("/exit_intent", page)
}
