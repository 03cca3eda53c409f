//! Submit flows for the login and product forms.
//!
//! Both flows validate first and never send a request for invalid input.
//! Errors come back as the list of lines a view renders.

use std::fmt;

use crate::api::{ApiClient, LoginRequest, Product};
use crate::routes::Route;
use crate::validation::{ProductFormData, ValidationResult, validate_credentials};

/// Messages to show above a form after a failed submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors {
    pub messages: Vec<String>,
    /// True when the failure was a 401 and the session is gone
    pub unauthorized: bool,
}

impl FormErrors {
    fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            unauthorized: false,
        }
    }
}

impl From<ValidationResult> for FormErrors {
    fn from(result: ValidationResult) -> Self {
        Self {
            messages: result.errors,
            unauthorized: false,
        }
    }
}

impl From<crate::api::ApiError> for FormErrors {
    fn from(err: crate::api::ApiError) -> Self {
        Self {
            unauthorized: err.is_unauthorized(),
            messages: vec![err.message],
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("\n"))
    }
}

impl std::error::Error for FormErrors {}

/// Submits the login form.
///
/// On success the token is persisted through the client's auth state and
/// the navigator moves to the dashboard.
///
/// # Errors
/// Returns validation messages, the server's message for `success: false`,
/// or the API error message.
pub async fn submit_login(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> Result<(), FormErrors> {
    let credentials = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };

    let validation = validate_credentials(&credentials);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    // A 401 here means bad credentials, not a lost session.
    let response = client
        .login(&credentials)
        .await
        .map_err(|e| FormErrors::single(e.message))?;
    let token = response.issued_token().map(str::to_string);
    let Some(token) = token else {
        let message = if response.message.trim().is_empty() {
            "Login failed".to_string()
        } else {
            response.message
        };
        return Err(FormErrors::single(message));
    };

    client
        .auth()
        .login(&token, Some(&credentials.username))
        .map_err(|e| FormErrors::single(format!("Failed to save session: {e:#}")))?;
    client.navigator().navigate(Route::Dashboard);
    Ok(())
}

/// Submits the product form: creates when `id` is None, updates otherwise.
///
/// # Errors
/// Returns validation messages or the API error message.
pub async fn submit_product(
    client: &ApiClient,
    id: Option<i64>,
    form: &ProductFormData,
) -> Result<Product, FormErrors> {
    let request = form.to_request()?;

    let product = match id {
        Some(id) => client.update_product(id, &request).await?,
        None => client.create_product(&request).await?,
    };
    client
        .navigator()
        .navigate(Route::ProductDetail(product.id));
    Ok(product)
}
