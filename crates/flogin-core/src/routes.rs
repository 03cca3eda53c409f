//! Views of the application and the rules for reaching them.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A view of the application, addressed by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`, always redirected
    Root,
    Login,
    Dashboard,
    Products,
    ProductCreate,
    ProductEdit(i64),
    ProductDetail(i64),
    NotFound,
}

impl Route {
    /// Parses a path such as `/products/edit/3`. Query strings and trailing
    /// slashes are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["dashboard"] => Route::Dashboard,
            ["products"] => Route::Products,
            ["products", "create"] => Route::ProductCreate,
            ["products", "edit", id] => id.parse().map_or(Route::NotFound, Route::ProductEdit),
            ["products", id] => id.parse().map_or(Route::NotFound, Route::ProductDetail),
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Products => "/products".to_string(),
            Route::ProductCreate => "/products/create".to_string(),
            Route::ProductEdit(id) => format!("/products/edit/{id}"),
            Route::ProductDetail(id) => format!("/products/{id}"),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Routes that require an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::Products
                | Route::ProductCreate
                | Route::ProductEdit(_)
                | Route::ProductDetail(_)
        )
    }

    /// Routes only meant for anonymous users.
    pub fn is_public_only(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// Resolves redirects until a view that may be shown is reached.
    pub fn guard(self, is_authenticated: bool) -> Route {
        match self {
            Route::Root => Route::Dashboard.guard(is_authenticated),
            route if route.is_protected() && !is_authenticated => Route::Login,
            route if route.is_public_only() && is_authenticated => Route::Dashboard,
            route => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Shared record of the current view.
///
/// The API client uses it to force the login view after a 401.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Arc<RwLock<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: Arc::new(RwLock::new(start)),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(to = %route, "navigate");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = route;
    }

    /// Navigates to `route` after applying the guard; returns where it landed.
    pub fn visit(&self, route: Route, is_authenticated: bool) -> Route {
        let landed = route.guard(is_authenticated);
        self.navigate(landed);
        landed
    }
}
