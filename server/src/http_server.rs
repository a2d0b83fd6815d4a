use authd_core::{AuthRequest, AuthResponse, SessionStoreError, SessionStoreRef, UsersResponse};
use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

const BEARER_PREFIX: &str = "Bearer ";

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    store: SessionStoreRef,
}

/// Error type for HTTP server
///
/// Each variant maps to exactly one status code and a plain-text body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload")]
    InvalidPayload,
    #[error("missing credentials")]
    MissingCredentials,
    #[error("user exists")]
    UserExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload | Self::MissingCredentials => StatusCode::BAD_REQUEST,
            Self::UserExists => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SessionStoreError> for ApiError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::InvalidInput(_) => Self::MissingCredentials,
            SessionStoreError::AlreadyExists(_) => Self::UserExists,
            SessionStoreError::InvalidCredentials => Self::InvalidCredentials,
            SessionStoreError::Unauthorized => Self::Unauthorized,
            SessionStoreError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(msg) = &self {
            error!(error = %msg, "Internal server error");
        }
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Token taken from an `Authorization: Bearer <token>` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(|token| BearerToken(token.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}

/// Build the router with CORS applied to every route
pub fn app(store: SessionStoreRef) -> Router {
    let state = AppState { store };

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/register", post(register).fallback(method_not_allowed))
        .route("/api/login", post(login).fallback(method_not_allowed))
        .route("/api/logout", post(logout).fallback(method_not_allowed))
        .route(
            "/api/users",
            get(users).head(method_not_allowed).fallback(method_not_allowed),
        )
        .route(
            "/healthz",
            get(health).head(method_not_allowed).fallback(method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(preflight_no_content))
                .layer(cors),
        )
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(addr: SocketAddr, store: SessionStoreRef) -> anyhow::Result<()> {
    let server = axum::Server::try_bind(&addr)
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    info!("authd listening on {}", addr);

    server
        .serve(app(store).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// CorsLayer answers pre-flights itself; this turns its 200 into a 204.
async fn preflight_no_content(req: Request<Body>, next: Next<Body>) -> Response {
    let is_preflight = req.method() == Method::OPTIONS;
    let mut response = next.run(req).await;
    if is_preflight {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// Decodes the first JSON value of the body and ignores anything after it.
/// Keys match case-insensitively, an exact match winning; `null` or absent
/// fields become empty strings.
fn parse_auth_request(body: &[u8]) -> Result<AuthRequest, ApiError> {
    let value = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .ok_or(ApiError::InvalidPayload)?
        .map_err(|_| ApiError::InvalidPayload)?;

    let fields = match value {
        Value::Null => return Ok(AuthRequest::default()),
        Value::Object(fields) => fields,
        _ => return Err(ApiError::InvalidPayload),
    };

    Ok(AuthRequest {
        username: string_field(&fields, "username")?,
        password: string_field(&fields, "password")?,
    })
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<String, ApiError> {
    let value = fields.get(name).or_else(|| {
        fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    });

    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApiError::InvalidPayload),
    }
}

async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = parse_auth_request(&body)?;
    state.store.register(&req.username, &req.password).await?;
    Ok(Json(AuthResponse::message("user registered")))
}

async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = parse_auth_request(&body)?;
    let token = state.store.login(&req.username, &req.password).await?;
    Ok(Json(AuthResponse::with_token(token, "login success")))
}

async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<AuthResponse>, ApiError> {
    let username = state.store.logout(&token).await?;
    Ok(Json(AuthResponse::message(format!("{} logged out", username))))
}

async fn users(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<UsersResponse>, ApiError> {
    let listing = state.store.list_users(&token).await?;
    Ok(Json(listing.into()))
}

/// Health check handler
async fn health() -> &'static str {
    "ok"
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
