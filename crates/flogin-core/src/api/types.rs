//! Wire types for the catalogue REST API.

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /auth/login`.
///
/// The backend answers failed logins with `success: false` and no token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Returns the token when the login succeeded and a non-empty token was issued.
    pub fn issued_token(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub description: String,
    pub category: String,
}

/// A product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub active: bool,
}

/// One page of `GET /products`.
///
/// Paging metadata follows the backend's page envelope and is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    #[serde(default)]
    pub content: Vec<Product>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Zero-based page index
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

/// Filters for `GET /products`; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl ProductQuery {
    /// Returns the query as key/value pairs for the request URL.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        pairs
    }
}

/// Error envelope returned by the backend on failures.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_page_accepts_bare_content() {
        let page: ProductPage = serde_json::from_str(
            r#"{"content":[{"id":1,"name":"Laptop","price":999.5,"quantity":4,"category":"Electronics"}]}"#,
        )
        .unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].description, None);
        assert!(!page.content[0].active);
        assert_eq!(page.total_pages, None);
    }

    #[test]
    fn test_product_page_reads_paging_metadata() {
        let page: ProductPage = serde_json::from_str(
            r#"{"content":[],"totalElements":42,"totalPages":5,"number":1,"size":10}"#,
        )
        .unwrap();
        assert_eq!(page.total_elements, Some(42));
        assert_eq!(page.total_pages, Some(5));
        assert_eq!(page.number, Some(1));
    }

    #[test]
    fn test_login_response_issued_token() {
        let ok: LoginResponse =
            serde_json::from_str(r#"{"success":true,"message":"ok","token":"abc"}"#).unwrap();
        assert_eq!(ok.issued_token(), Some("abc"));

        let failed: LoginResponse =
            serde_json::from_str(r#"{"success":false,"message":"Invalid credentials"}"#).unwrap();
        assert_eq!(failed.issued_token(), None);

        let empty: LoginResponse =
            serde_json::from_str(r#"{"success":true,"message":"ok","token":""}"#).unwrap();
        assert_eq!(empty.issued_token(), None);
    }

    #[test]
    fn test_query_skips_unset_and_empty() {
        let query = ProductQuery {
            name: Some(String::new()),
            category: Some("Books".to_string()),
            page: Some(0),
            size: None,
        };
        assert_eq!(
            query.to_pairs(),
            vec![("category", "Books".to_string()), ("page", "0".to_string())]
        );
    }
}
