use authd_core::{AuthRequest, AuthResponse, UsersResponse};
use log::debug;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status; `message` is its plain-text body
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Login response carried no token")]
    MissingToken,
}

pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP client for the authd API
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!("authd answered {}", status);

        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status,
                message: message.trim().to_string(),
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        Ok(self.send(request).await?.json::<T>().await?)
    }

    pub async fn register(&self, username: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = AuthRequest::new(username, password);
        self.send_json(self.http.post(self.url("/api/register")).json(&body))
            .await
    }

    /// Log in and return the issued token together with the server message
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<(String, String)> {
        let body = AuthRequest::new(username, password);
        let response: AuthResponse = self
            .send_json(self.http.post(self.url("/api/login")).json(&body))
            .await?;
        let token = response.token.ok_or(ClientError::MissingToken)?;
        Ok((token, response.message))
    }

    pub async fn users(&self, token: &str) -> ClientResult<UsersResponse> {
        self.send_json(self.http.get(self.url("/api/users")).bearer_auth(token))
            .await
    }

    pub async fn logout(&self, token: &str) -> ClientResult<AuthResponse> {
        self.send_json(self.http.post(self.url("/api/logout")).bearer_auth(token))
            .await
    }

    pub async fn health(&self) -> ClientResult<String> {
        Ok(self.send(self.http.get(self.url("/healthz"))).await?.text().await?)
    }
}
