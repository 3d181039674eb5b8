use crate::selection::models::{Member, SelectionEntry};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anti-forgery header the dashboard expects on JSON mutations.
const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint answered with a non-success status. No error body is
    /// parsed; the status is all the caller gets.
    #[error("server rejected the request (status {0})")]
    Rejected(StatusCode),
    #[error("not allowed to access this system")]
    Forbidden,
    /// The request could not be completed at all (connection, DNS, timeout).
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Blocking HTTP client for the admin dashboard.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: String,
    csrf_token: String,
}

impl AdminClient {
    pub fn new(base_url: &str, csrf_token: &str) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token: csrf_token.to_string(),
        })
    }

    fn users_url(&self, system_id: u64) -> String {
        format!("{}/systems/{}/users", self.base_url, system_id)
    }

    /// Fetches the user rows for a system, with their current association
    /// state, as the initial Selection Set.
    pub fn fetch_system_users(&self, system_id: u64) -> Result<Vec<Member>, ApiError> {
        let response = self
            .http
            .get(self.users_url(system_id))
            .header(ACCEPT, "application/json")
            .send()?;

        match response.status() {
            status if status.is_success() => Ok(response.json()?),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            status => Err(ApiError::Rejected(status)),
        }
    }

    /// Sends the full selection snapshot to the update endpoint. The server
    /// applies it atomically, so a 2xx means the whole set was saved.
    pub fn save_system_users(
        &self,
        system_id: u64,
        entries: &[SelectionEntry],
    ) -> Result<(), ApiError> {
        tracing::info!(system_id, entries = entries.len(), "saving user assignments");

        let response = self
            .http
            .post(self.users_url(system_id))
            .header(CONTENT_TYPE, "application/json")
            .header(CSRF_HEADER, &self.csrf_token)
            .json(entries)
            .send()?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            status => {
                tracing::warn!(system_id, %status, "assignment update rejected");
                Err(ApiError::Rejected(status))
            }
        }
    }
}
