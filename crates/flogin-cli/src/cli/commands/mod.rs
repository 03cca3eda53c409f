//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod products;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, anyhow};
use flogin_core::api::{ApiClient, ApiError};
use flogin_core::forms::FormErrors;
use flogin_core::routes::Route;

const SESSION_EXPIRED: &str = "Session expired. Please log in again with `flogin login`.";
const NOT_LOGGED_IN: &str = "Not logged in. Run `flogin login` first.";

/// Runs the route guard for a view; fails if it redirects to the login view.
fn require(client: &ApiClient, route: Route) -> Result<()> {
    let landed = client
        .navigator()
        .visit(route, client.auth().is_authenticated());
    if landed == Route::Login && route != Route::Login {
        anyhow::bail!(NOT_LOGGED_IN);
    }
    Ok(())
}

/// Converts an API failure into the message a user sees.
fn api_failure(err: ApiError) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow!(SESSION_EXPIRED)
    } else {
        anyhow!(err)
    }
}

/// Converts form errors into one message per line.
fn form_failure(err: FormErrors) -> anyhow::Error {
    if err.unauthorized {
        anyhow!(SESSION_EXPIRED)
    } else {
        anyhow!(err)
    }
}

/// Prints a loading line when stderr is interactive.
fn loading(what: &str) {
    if io::stderr().is_terminal() {
        eprintln!("Loading {what}...");
    }
}

/// Prompts on stderr and reads one trimmed line from stdin.
fn prompt(label: &str) -> Result<String> {
    eprint!("{label}: ");
    io::stderr().flush().context("flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks a yes/no question; anything but `y`/`yes` is a no.
fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N]"))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
