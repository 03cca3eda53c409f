//! HTTP client for the catalogue backend.
//!
//! Every request reads the bearer token from the session store at send
//! time. Any 401 clears the session and sends the navigator to `/login`.

pub mod error;
pub mod types;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use types::{LoginRequest, LoginResponse, Product, ProductPage, ProductQuery, ProductRequest};

use crate::config::Config;
use crate::routes::{Navigator, Route};
use crate::session::AuthState;

/// Standard User-Agent header for flogin API requests.
pub const USER_AGENT: &str = concat!("flogin/", env!("CARGO_PKG_VERSION"));

const LOGIN_FAILED: &str = "Login failed";
const FETCH_PRODUCTS_FAILED: &str = "Failed to fetch products";
const FETCH_PRODUCT_FAILED: &str = "Failed to fetch product";
const SAVE_PRODUCT_FAILED: &str = "Failed to save product";
const DELETE_PRODUCT_FAILED: &str = "Failed to delete product";

/// Catalogue API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthState,
    navigator: Navigator,
}

impl ApiClient {
    /// Creates a client for `base_url` (endpoints are appended to it).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        auth: AuthState,
        navigator: Navigator,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            navigator,
        })
    }

    /// Creates a client from config, resolving the base URL and timeout.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn from_config(
        config: &Config,
        base_url_override: Option<&str>,
        auth: AuthState,
        navigator: Navigator,
    ) -> Result<Self> {
        let base_url = config.resolve_base_url(base_url_override)?;
        Self::new(&base_url, config.request_timeout(), auth, navigator)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Builds a request with the bearer token attached when one is stored.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path, "api request");

        let builder = self.http.request(method, url);
        match self.auth.store().token() {
            Ok(Some(token)) => builder.bearer_auth(token),
            Ok(None) => builder,
            Err(e) => {
                tracing::warn!("ignoring unreadable session: {e:#}");
                builder
            }
        }
    }

    /// Sends the request and maps non-2xx statuses to errors.
    async fn execute(&self, builder: RequestBuilder, fallback: &str) -> ApiResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e, fallback))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "api response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }
        Err(ApiError::from_response(status.as_u16(), &body, fallback))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        let response = self.execute(builder, fallback).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::debug!("failed to decode response: {e}");
            ApiError::new(ApiErrorKind::Parse, fallback)
        })
    }

    fn handle_unauthorized(&self) {
        if self.auth.is_authenticated() {
            tracing::warn!("unauthorized response; clearing session");
        } else {
            tracing::debug!("unauthorized response without a session");
        }
        if let Err(e) = self.auth.logout() {
            tracing::warn!("failed to clear session: {e:#}");
        }
        self.navigator.navigate(Route::Login);
    }

    /// `POST /auth/login`.
    ///
    /// A 200 with `success: false` is returned as-is; the caller decides.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        let builder = self.request(Method::POST, "/auth/login").json(credentials);
        self.send_json(builder, LOGIN_FAILED).await
    }

    /// `GET /products` with optional filters.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn list_products(&self, query: &ProductQuery) -> ApiResult<ProductPage> {
        let builder = self
            .request(Method::GET, "/products")
            .query(&query.to_pairs());
        self.send_json(builder, FETCH_PRODUCTS_FAILED).await
    }

    /// `GET /products/{id}`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn get_product(&self, id: i64) -> ApiResult<Product> {
        let builder = self.request(Method::GET, &format!("/products/{id}"));
        self.send_json(builder, FETCH_PRODUCT_FAILED).await
    }

    /// `POST /products`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn create_product(&self, product: &ProductRequest) -> ApiResult<Product> {
        let builder = self.request(Method::POST, "/products").json(product);
        self.send_json(builder, SAVE_PRODUCT_FAILED).await
    }

    /// `PUT /products/{id}`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn update_product(&self, id: i64, product: &ProductRequest) -> ApiResult<Product> {
        let builder = self
            .request(Method::PUT, &format!("/products/{id}"))
            .json(product);
        self.send_json(builder, SAVE_PRODUCT_FAILED).await
    }

    /// `DELETE /products/{id}`. Any response body is ignored.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn delete_product(&self, id: i64) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, &format!("/products/{id}"));
        self.execute(builder, DELETE_PRODUCT_FAILED).await?;
        Ok(())
    }
}
