//! Contact List replicas: the web UI as a fake site and the REST API as an
//! axum app. Both live at one base URL so a single suite config drives UI
//! and API scenarios alike.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pomar::fake::{AppState, Dom};
use pomar::{FakeElement, FakePage, FakeSite};
use serde_json::{json, Map, Value};

/// Contact fields in form order: `(element id, API field)`
const FIELDS: [(&str, &str); 11] = [
    ("#firstName", "firstName"),
    ("#lastName", "lastName"),
    ("#birthdate", "birthdate"),
    ("#email", "email"),
    ("#phone", "phone"),
    ("#street1", "street1"),
    ("#street2", "street2"),
    ("#city", "city"),
    ("#stateProvince", "stateProvince"),
    ("#postalCode", "postalCode"),
    ("#country", "country"),
];

/// `local@domain.tld`, no empty dot-separated parts on either side
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let parts_ok = |s: &str| {
        !s.is_empty()
            && s.split('.').all(|part| {
                !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || "_-+".contains(c))
            })
    };
    parts_ok(local) && parts_ok(domain) && domain.contains('.')
}

/// Digits only, 10 to 15 of them
pub fn is_valid_phone(phone: &str) -> bool {
    (10..=15).contains(&phone.len()) && phone.chars().all(|c| c.is_ascii_digit())
}

/// Validation message for a contact, `None` when it is acceptable
fn contact_error(contact: &Map<String, Value>) -> Option<String> {
    let field = |name: &str| contact.get(name).and_then(Value::as_str).unwrap_or_default();
    if field("firstName").is_empty() || field("lastName").is_empty() {
        return Some("Contact validation failed: firstName: Path `firstName` is required.".into());
    }
    let email = field("email");
    if !email.is_empty() && !is_valid_email(email) {
        return Some("Contact validation failed: email: Email is invalid".into());
    }
    let phone = field("phone");
    if !phone.is_empty() && !is_valid_phone(phone) {
        return Some("Contact validation failed: phone: Phone number is invalid".into());
    }
    None
}

// ============================================================================
// Web UI
// ============================================================================

fn session_user(state: &AppState) -> Option<String> {
    state.get("session").and_then(Value::as_str).map(str::to_string)
}

fn contacts_of(state: &AppState, email: &str) -> Vec<Map<String, Value>> {
    state
        .get("contacts")
        .and_then(|all| all.get(email))
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_object).cloned().collect())
        .unwrap_or_default()
}

fn store_contacts(dom: &mut Dom<'_>, email: &str, contacts: Vec<Map<String, Value>>) {
    let mut all = dom
        .state()
        .get("contacts")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let _ = all.insert(email.to_string(), Value::Array(contacts.into_iter().map(Value::Object).collect()));
    let _ = dom.state_mut().insert("contacts".into(), Value::Object(all));
}

fn show_error(dom: &mut Dom<'_>, message: &str) {
    dom.set_text("#error", message);
    dom.show("#error");
}

fn login_page() -> FakePage {
    FakePage::new("Contact List App").elements([
        FakeElement::new("h1").text("Contact List App"),
        FakeElement::new("#email"),
        FakeElement::new("#password"),
        FakeElement::new("#error").hidden(),
        FakeElement::new("#submit").text("Submit").on_click(|dom| {
            let email = dom.value("#email").to_lowercase();
            let password = dom.value("#password");
            let known = dom
                .state()
                .get("users")
                .and_then(|users| users.get(&email))
                .and_then(Value::as_str)
                .is_some_and(|stored| stored == password);
            if known {
                let _ = dom.state_mut().insert("session".into(), json!(email));
                dom.navigate("/contactList");
            } else {
                show_error(dom, "Incorrect username or password");
            }
        }),
        FakeElement::new("#signup").text("Sign up").on_click(|dom| dom.navigate("/addUser")),
    ])
}

fn signup_page() -> FakePage {
    FakePage::new("Add User").elements([
        FakeElement::new("h1").text("Add User"),
        FakeElement::new("#firstName"),
        FakeElement::new("#lastName"),
        FakeElement::new("#email"),
        FakeElement::new("#password"),
        FakeElement::new("#error").hidden(),
        FakeElement::new("#cancel").on_click(|dom| dom.navigate("/")),
        FakeElement::new("#submit").text("Submit").on_click(|dom| {
            let email = dom.value("#email").to_lowercase();
            let password = dom.value("#password");
            if !is_valid_email(&email) || password.len() < 7 {
                show_error(dom, "User validation failed");
                return;
            }
            let mut users = dom
                .state()
                .get("users")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            if users.contains_key(&email) {
                show_error(dom, "Email address is already in use");
                return;
            }
            let _ = users.insert(email.clone(), json!(password));
            let _ = dom.state_mut().insert("users".into(), Value::Object(users));
            let _ = dom.state_mut().insert("session".into(), json!(email));
            dom.navigate("/contactList");
        }),
    ])
}

/// Visible cells of a table row: name, birthdate, email, phone, address,
/// city/state/postal code, country
fn row_cells(contact: &Map<String, Value>) -> Vec<String> {
    let field = |name: &str| contact.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
    let address = [field("street1"), field("street2")].join(" ");
    let place = [field("city"), field("stateProvince"), field("postalCode")].join(" ");
    vec![
        format!("{} {}", field("firstName"), field("lastName")),
        field("birthdate"),
        field("email"),
        field("phone"),
        address.trim().to_string(),
        place.trim().to_string(),
        field("country"),
    ]
}

fn contact_list_page(state: &AppState) -> FakePage {
    let Some(email) = session_user(state) else {
        return login_page();
    };
    let search = state
        .get("search")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    let mut page = FakePage::new("My Contacts").elements([
        FakeElement::new("h1").text("Contact List"),
        FakeElement::new("#add-contact").on_click(|dom| dom.navigate("/addContact")),
        FakeElement::new("#logout").on_click(|dom| {
            let _ = dom.state_mut().remove("session");
            let _ = dom.state_mut().remove("search");
            dom.navigate("/");
        }),
        FakeElement::new("#search").on("input", |dom| {
            let term = dom.value("#search");
            let _ = dom.state_mut().insert("search".into(), json!(term));
            dom.navigate("/contactList");
        }),
        FakeElement::new("#myTable"),
    ]);
    let mut shown = 0;
    for (index, contact) in contacts_of(state, &email).iter().enumerate() {
        let cells = row_cells(contact);
        let text = cells.join(" ");
        if !text.to_lowercase().contains(&search) {
            continue;
        }
        shown += 1;
        page = page.element(FakeElement::new(".contactTableBodyRow").text(text).on_click(
            move |dom| {
                let _ = dom.state_mut().insert("selected".into(), json!(index));
                dom.navigate("/contactDetails");
            },
        ));
        for (column, cell) in cells.into_iter().enumerate() {
            page = page.element(
                FakeElement::new(format!(".contactTableBodyRow td:nth-child({})", column + 2)).text(cell),
            );
        }
    }
    if shown == 0 {
        page = page.element(FakeElement::new("#no-contacts").text("No contacts found"));
    }
    page
}

fn add_contact_page(state: &AppState) -> FakePage {
    if session_user(state).is_none() {
        return login_page();
    }
    FakePage::new("Add Contact")
        .element(FakeElement::new("h1").text("Add Contact"))
        .elements(FIELDS.iter().map(|(css, _)| FakeElement::new(*css)))
        .element(FakeElement::new("#error").hidden())
        .element(FakeElement::new("#cancel").on_click(|dom| dom.navigate("/contactList")))
        .element(FakeElement::new("#submit").text("Submit").on_click(|dom| {
            let contact: Map<String, Value> = FIELDS
                .iter()
                .map(|(css, name)| ((*name).to_string(), json!(dom.value(css))))
                .collect();
            if let Some(message) = contact_error(&contact) {
                show_error(dom, &message);
                return;
            }
            let Some(email) = session_user(dom.state()) else {
                return;
            };
            let mut contacts = contacts_of(dom.state(), &email);
            contacts.push(contact);
            store_contacts(dom, &email, contacts);
            dom.navigate("/contactList");
        }))
}

fn details_page(state: &AppState) -> FakePage {
    let Some(email) = session_user(state) else {
        return login_page();
    };
    let index = state.get("selected").and_then(Value::as_u64).unwrap_or(0) as usize;
    let Some(contact) = contacts_of(state, &email).get(index).cloned() else {
        return FakePage::new("Contact Details").element(FakeElement::new("h1").text("Contact Details"));
    };
    let field = |name: &str| contact.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
    FakePage::new("Contact Details").elements([
        FakeElement::new("h1").text("Contact Details"),
        FakeElement::new("#firstName").text(field("firstName")),
        FakeElement::new("#lastName").text(field("lastName")),
        FakeElement::new("#birthdate").text(field("birthdate")),
        FakeElement::new("#email").text(field("email")),
        FakeElement::new("#phone").text(field("phone")),
        FakeElement::new("#edit-contact"),
        FakeElement::new("#return").on_click(|dom| dom.navigate("/contactList")),
        FakeElement::new("#delete").on_click(move |dom| {
            let Some(owner) = session_user(dom.state()) else {
                return;
            };
            let mut contacts = contacts_of(dom.state(), &owner);
            if index < contacts.len() {
                let _ = contacts.remove(index);
            }
            store_contacts(dom, &owner, contacts);
            dom.navigate("/contactList");
        }),
    ])
}

/// The contact-list web app served at `base_url`
pub fn contact_list_site(base_url: &str) -> FakeSite {
    FakeSite::new(base_url)
        .with_state("users", json!({}))
        .with_state("contacts", json!({}))
        .route("/", |_| login_page())
        .route("/addUser", |_| signup_page())
        .route("/contactList", contact_list_page)
        .route("/addContact", add_contact_page)
        .route("/contactDetails", details_page)
}

// ============================================================================
// REST API
// ============================================================================

#[derive(Default)]
struct Store {
    users: HashMap<String, String>,
    tokens: HashMap<String, String>,
    contacts: HashMap<String, Vec<Map<String, Value>>>,
    next_id: u64,
}

type Shared = Arc<Mutex<Store>>;

fn owner(store: &Store, headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))?;
    store.tokens.get(token).cloned()
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Please authenticate." }))).into_response()
}

fn issue_token(store: &mut Store, email: &str) -> String {
    store.next_id += 1;
    let token = format!("token-{}", store.next_id);
    let _ = store.tokens.insert(token.clone(), email.to_string());
    token
}

async fn add_user(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_lowercase();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let mut store = store.lock().unwrap();
    if !is_valid_email(&email) || store.users.contains_key(&email) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Email address is already in use" })))
            .into_response();
    }
    let _ = store.users.insert(email.clone(), password);
    let token = issue_token(&mut store, &email);
    (StatusCode::CREATED, Json(json!({ "user": { "email": email }, "token": token }))).into_response()
}

async fn login(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_lowercase();
    let password = body["password"].as_str().unwrap_or_default();
    let mut store = store.lock().unwrap();
    if store.users.get(&email).map(String::as_str) != Some(password) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let token = issue_token(&mut store, &email);
    Json(json!({ "user": { "email": email }, "token": token })).into_response()
}

async fn logout(State(store): State<Shared>, headers: HeaderMap) -> Response {
    let mut store = store.lock().unwrap();
    if owner(&store, &headers).is_none() {
        return unauthorized();
    }
    store.tokens.retain(|token, _| {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map_or(true, |v| v != format!("Bearer {token}"))
    });
    StatusCode::OK.into_response()
}

async fn add_contact(State(store): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    let Some(email) = owner(&store, &headers) else {
        return unauthorized();
    };
    let mut contact = body.as_object().cloned().unwrap_or_default();
    if let Some(message) = contact_error(&contact) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response();
    }
    store.next_id += 1;
    let _ = contact.insert("_id".into(), json!(format!("{:024x}", store.next_id)));
    let _ = contact.insert("owner".into(), json!(email));
    store.contacts.entry(email).or_default().push(contact.clone());
    (StatusCode::CREATED, Json(Value::Object(contact))).into_response()
}

async fn list_contacts(State(store): State<Shared>, headers: HeaderMap) -> Response {
    let store = store.lock().unwrap();
    let Some(email) = owner(&store, &headers) else {
        return unauthorized();
    };
    let contacts = store.contacts.get(&email).cloned().unwrap_or_default();
    Json(json!(contacts)).into_response()
}

fn position(store: &Store, email: &str, id: &str) -> Option<usize> {
    store
        .contacts
        .get(email)?
        .iter()
        .position(|c| c.get("_id").and_then(Value::as_str) == Some(id))
}

async fn get_contact(State(store): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let store = store.lock().unwrap();
    let Some(email) = owner(&store, &headers) else {
        return unauthorized();
    };
    match position(&store, &email, &id) {
        Some(index) => Json(Value::Object(store.contacts[&email][index].clone())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn change_contact(store: Shared, headers: HeaderMap, id: String, body: Value, replace: bool) -> Response {
    let mut store = store.lock().unwrap();
    let Some(email) = owner(&store, &headers) else {
        return unauthorized();
    };
    let Some(index) = position(&store, &email, &id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let current = store.contacts[&email][index].clone();
    let mut updated = if replace { Map::new() } else { current.clone() };
    for (key, value) in body.as_object().cloned().unwrap_or_default() {
        let _ = updated.insert(key, value);
    }
    for key in ["_id", "owner"] {
        if let Some(value) = current.get(key) {
            let _ = updated.insert(key.to_string(), value.clone());
        }
    }
    if let Some(message) = contact_error(&updated) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response();
    }
    if let Some(list) = store.contacts.get_mut(&email) {
        list[index] = updated.clone();
    }
    Json(Value::Object(updated)).into_response()
}

async fn put_contact(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    change_contact(store, headers, id, body, true).await
}

async fn patch_contact(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    change_contact(store, headers, id, body, false).await
}

async fn delete_contact(State(store): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut store = store.lock().unwrap();
    let Some(email) = owner(&store, &headers) else {
        return unauthorized();
    };
    let Some(index) = position(&store, &email, &id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(list) = store.contacts.get_mut(&email) {
        let _ = list.remove(index);
    }
    (StatusCode::OK, "Contact deleted").into_response()
}

/// Router answering the contact-list REST API
pub fn contact_api() -> Router {
    Router::new()
        .route("/users", post(add_user))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .route("/contacts", post(add_contact).get(list_contacts))
        .route(
            "/contacts/{id}",
            get(get_contact).put(put_contact).patch(patch_contact).delete(delete_contact),
        )
        .with_state(Shared::default())
}
