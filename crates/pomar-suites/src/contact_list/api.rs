//! REST API of the contact-list app (bearer-token auth).

use pomar::{ApiClient, ApiResponse, PomarResult};
use serde::Deserialize;
use serde_json::{json, Value};

use super::data::{ContactData, UserData};

/// A stored contact
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactRecord {
    /// Server-assigned id
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Contact fields
    #[serde(flatten)]
    pub contact: ContactData,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Typed calls against `/users` and `/contacts`
#[derive(Debug, Clone)]
pub struct ContactApi {
    client: ApiClient,
}

impl ContactApi {
    /// Wrap a client rooted at the app's base URL
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Same API, authenticated with `token`
    #[must_use]
    pub fn authenticated(&self, token: &str) -> Self {
        Self::new(self.client.clone().with_bearer(token))
    }

    /// Register an account; returns its token (201)
    pub async fn register(&self, user: &UserData) -> PomarResult<String> {
        let response = self.client.post("/users", user).await?;
        response.expect_status(201)?;
        Ok(response.json::<TokenResponse>()?.token)
    }

    /// Sign in; returns a token (200)
    pub async fn login(&self, email: &str, password: &str) -> PomarResult<String> {
        let body = json!({ "email": email, "password": password });
        let response = self.client.post("/users/login", &body).await?;
        response.expect_status(200)?;
        Ok(response.json::<TokenResponse>()?.token)
    }

    /// Sign out (200)
    pub async fn logout(&self) -> PomarResult<()> {
        self.client.post("/users/logout", &json!({})).await?.expect_status(200)?;
        Ok(())
    }

    /// Create a contact (201)
    pub async fn add_contact(&self, contact: &ContactData) -> PomarResult<ContactRecord> {
        let response = self.client.post("/contacts", contact).await?;
        response.expect_status(201)?;
        response.json()
    }

    /// Every contact of the signed-in user (200)
    pub async fn contacts(&self) -> PomarResult<Vec<ContactRecord>> {
        let response = self.client.get("/contacts").await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Raw `GET /contacts/{id}`, for status checks
    pub async fn contact(&self, id: &str) -> PomarResult<ApiResponse> {
        self.client.get(&format!("/contacts/{id}")).await
    }

    /// One contact (200)
    pub async fn get_contact(&self, id: &str) -> PomarResult<ContactRecord> {
        let response = self.contact(id).await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Replace a contact (200)
    pub async fn update_contact(&self, id: &str, contact: &ContactData) -> PomarResult<ContactRecord> {
        let response = self.client.put(&format!("/contacts/{id}"), contact).await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Change some fields of a contact (200)
    pub async fn patch_contact(&self, id: &str, fields: &Value) -> PomarResult<ContactRecord> {
        let response = self.client.patch(&format!("/contacts/{id}"), fields).await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Delete a contact (200)
    pub async fn delete_contact(&self, id: &str) -> PomarResult<()> {
        self.client.delete(&format!("/contacts/{id}")).await?.expect_status(200)?;
        Ok(())
    }
}
