//! Typed clients for `/auth` and `/booking`.

use pomar::{ApiClient, ApiResponse, Credentials, PomarError, PomarResult};
use serde_json::Value;
use tracing::{debug, info};

use super::model::{AuthRequest, AuthResponse, Booking, BookingId, BookingResponse, PartialBooking};

/// Token issuing
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    /// Wrap a client rooted at the API base URL
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Raw `POST /auth` reply
    pub async fn create_token(&self, request: &AuthRequest) -> PomarResult<AuthResponse> {
        let response = self.client.post("/auth", request).await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Token for `request`; refusals become assertion failures
    pub async fn token(&self, request: &AuthRequest) -> PomarResult<String> {
        let reply = self.create_token(request).await?;
        match reply.token {
            Some(token) if !token.is_empty() => {
                debug!(user = %request.username, "auth token issued");
                Ok(token)
            }
            _ => Err(PomarError::assertion(format!(
                "auth refused for {}: {}",
                request.username,
                reply.reason.unwrap_or_default()
            ))),
        }
    }

    /// Token for the suite's configured credentials
    pub async fn default_token(&self, credentials: &Credentials) -> PomarResult<String> {
        self.token(&AuthRequest::new(&credentials.username, &credentials.password))
            .await
    }
}

/// Booking CRUD; writes need a token sent as the `token` cookie
#[derive(Debug, Clone)]
pub struct BookingService {
    client: ApiClient,
}

impl BookingService {
    /// Unauthenticated service
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Same service, sending `token` with every request
    #[must_use]
    pub fn with_token(&self, token: &str) -> Self {
        Self::new(self.client.clone().with_cookie_token(token))
    }

    /// `GET /ping`; the API answers 201 `Created` when healthy
    pub async fn ping(&self) -> PomarResult<ApiResponse> {
        self.client.get("/ping").await
    }

    /// Create a booking (200)
    pub async fn create(&self, booking: &Booking) -> PomarResult<BookingResponse> {
        let response = self.client.post("/booking", booking).await?;
        response.expect_status(200)?;
        let created: BookingResponse = response.json()?;
        info!(id = created.bookingid, guest = %booking.firstname, "booking created");
        Ok(created)
    }

    /// Raw `POST /booking` with an arbitrary body
    pub async fn create_raw(&self, body: &Value) -> PomarResult<ApiResponse> {
        self.client.post("/booking", body).await
    }

    /// Every booking id (200)
    pub async fn ids(&self) -> PomarResult<Vec<BookingId>> {
        let response = self.client.get("/booking").await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Raw `GET /booking/{id}`
    pub async fn get_raw(&self, id: u64) -> PomarResult<ApiResponse> {
        self.client.get(&format!("/booking/{id}")).await
    }

    /// One booking (200)
    pub async fn get(&self, id: u64) -> PomarResult<Booking> {
        let response = self.get_raw(id).await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Raw `PUT /booking/{id}`
    pub async fn update_raw(&self, id: u64, booking: &Booking) -> PomarResult<ApiResponse> {
        self.client.put(&format!("/booking/{id}"), booking).await
    }

    /// Replace a booking (200)
    pub async fn update(&self, id: u64, booking: &Booking) -> PomarResult<Booking> {
        let response = self.update_raw(id, booking).await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Change some fields of a booking (200)
    pub async fn partial_update(&self, id: u64, fields: &PartialBooking) -> PomarResult<Booking> {
        let response = self.client.patch(&format!("/booking/{id}"), fields).await?;
        response.expect_status(200)?;
        response.json()
    }

    /// Delete a booking (201)
    pub async fn delete(&self, id: u64) -> PomarResult<()> {
        self.client.delete(&format!("/booking/{id}")).await?.expect_status(201)?;
        info!(id, "booking deleted");
        Ok(())
    }
}
