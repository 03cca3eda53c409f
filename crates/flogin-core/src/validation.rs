//! Client-side validation for login and product forms.
//!
//! Every validator is pure and total: it never fails, it only collects
//! human-readable messages. A field that is absent, empty or whitespace-only
//! reports only its "required" message.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::api::types::{LoginRequest, Product, ProductRequest};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 100;
const PRODUCT_NAME_MIN: usize = 3;
const PRODUCT_NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
/// Exclusive upper bound for price.
const PRICE_MAX: f64 = 999_999_999.0;
/// Inclusive upper bound for quantity.
const QUANTITY_MAX: i64 = 99_999;

static USERNAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username regex"));
static HAS_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]").expect("valid letter regex"));
static HAS_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("valid digit regex"));

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Messages in the order the checks ran
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if any message equals `message`.
    pub fn contains(&self, message: &str) -> bool {
        self.errors.iter().any(|e| e == message)
    }

    fn push(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    /// Appends all messages from `other`.
    pub fn extend(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

/// Returns the value as given, or None when it is missing or blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Validates a login username.
pub fn validate_username(username: Option<&str>) -> ValidationResult {
    let mut result = ValidationResult::default();
    let Some(username) = present(username) else {
        result.push("Username is required");
        return result;
    };

    let len = char_len(username);
    if len < USERNAME_MIN {
        result.push("Username must be at least 3 characters");
    }
    if len > USERNAME_MAX {
        result.push("Username must be less than 50 characters");
    }
    if !USERNAME_CHARS.is_match(username) {
        result.push("Username can only contain letters, numbers, and underscores");
    }
    result
}

/// Validates a login password.
pub fn validate_password(password: Option<&str>) -> ValidationResult {
    let mut result = ValidationResult::default();
    let Some(password) = present(password) else {
        result.push("Password is required");
        return result;
    };

    let len = char_len(password);
    if len < PASSWORD_MIN {
        result.push("Password must be at least 6 characters");
    }
    if len > PASSWORD_MAX {
        result.push("Password must be less than 100 characters");
    }
    if !HAS_LETTER.is_match(password) {
        result.push("Password must contain at least one letter");
    }
    if !HAS_DIGIT.is_match(password) {
        result.push("Password must contain at least one number");
    }
    result
}

/// Validates both credential fields, username messages first.
pub fn validate_credentials(credentials: &LoginRequest) -> ValidationResult {
    let mut result = validate_username(Some(&credentials.username));
    result.extend(validate_password(Some(&credentials.password)));
    result
}

/// Raw product form input, before any parsing.
///
/// Price and quantity stay strings so that non-numeric input can be
/// reported instead of rejected by a parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFormData {
    pub name: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl From<&Product> for ProductFormData {
    fn from(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            price: Some(product.price.to_string()),
            quantity: Some(product.quantity.to_string()),
            description: Some(product.description.clone().unwrap_or_default()),
            category: Some(product.category.clone()),
        }
    }
}

impl ProductFormData {
    /// Validates and converts the form into a request body.
    ///
    /// # Errors
    /// Returns every validation message when the form is invalid.
    pub fn to_request(&self) -> Result<ProductRequest, ValidationResult> {
        let validation = validate_product(self);
        if !validation.is_valid() {
            return Err(validation);
        }

        // Validation guarantees every required field parses.
        let price = parse_number(self.price.as_deref()).unwrap_or_default();
        let quantity = parse_number(self.quantity.as_deref()).unwrap_or_default();

        Ok(ProductRequest {
            name: self.name.as_deref().unwrap_or_default().trim().to_string(),
            price,
            quantity: quantity as i64,
            description: self.description.clone().unwrap_or_default(),
            category: self.category.as_deref().unwrap_or_default().trim().to_string(),
        })
    }
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Validates every product field independently, collecting all messages.
pub fn validate_product(form: &ProductFormData) -> ValidationResult {
    let mut result = ValidationResult::default();

    match present(form.name.as_deref()).map(str::trim) {
        None => result.push("Product name is required"),
        Some(name) => {
            let len = char_len(name);
            if len < PRODUCT_NAME_MIN {
                result.push("Product name must be at least 3 characters");
            }
            if len > PRODUCT_NAME_MAX {
                result.push("Product name must be less than 100 characters");
            }
        }
    }

    if present(form.price.as_deref()).is_none() {
        result.push("Price is required");
    } else {
        match parse_number(form.price.as_deref()) {
            None => result.push("Price must be a valid number"),
            Some(price) if price <= 0.0 => result.push("Price must be greater than 0"),
            Some(price) if price >= PRICE_MAX => {
                result.push("Price must be less than 999,999,999");
            }
            Some(_) => {}
        }
    }

    if present(form.quantity.as_deref()).is_none() {
        result.push("Quantity is required");
    } else {
        match parse_number(form.quantity.as_deref()) {
            None => result.push("Quantity must be a valid number"),
            Some(quantity) if quantity.fract() != 0.0 => {
                result.push("Quantity must be a whole number");
            }
            Some(quantity) if quantity < 0.0 => result.push("Quantity must be 0 or greater"),
            Some(quantity) if quantity > QUANTITY_MAX as f64 => {
                result.push("Quantity must be less than 99,999");
            }
            Some(_) => {}
        }
    }

    if let Some(description) = form.description.as_deref()
        && char_len(description) > DESCRIPTION_MAX
    {
        result.push("Description must be less than 500 characters");
    }

    if present(form.category.as_deref()).is_none() {
        result.push("Category is required");
    }

    result
}
