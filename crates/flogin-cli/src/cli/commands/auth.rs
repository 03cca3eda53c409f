//! Login, logout and session status.

use anyhow::Result;
use flogin_core::api::ApiClient;
use flogin_core::forms;
use flogin_core::routes::Route;
use flogin_core::session::mask_token;

use super::{dashboard, form_failure, loading, prompt};

pub async fn login(
    client: &ApiClient,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let auth = client.auth();
    if client.navigator().visit(Route::Login, auth.is_authenticated()) != Route::Login {
        match auth.username() {
            Some(name) => println!("Already logged in as {name}."),
            None => println!("Already logged in."),
        }
        return dashboard::show(client);
    }

    let username = match username {
        Some(u) => u,
        None => prompt("Username")?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt("Password")?,
    };

    loading("session");
    forms::submit_login(client, &username, &password)
        .await
        .map_err(form_failure)?;

    println!("Logged in as {username}.");
    dashboard::show(client)
}

pub fn logout(client: &ApiClient) -> Result<()> {
    let was_authenticated = client.auth().is_authenticated();
    client.auth().logout()?;
    client.navigator().navigate(Route::Login);

    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn status(client: &ApiClient) {
    let auth = client.auth();
    match auth.token() {
        Some(token) => {
            let who = auth.username().unwrap_or_else(|| "unknown user".to_string());
            println!("Logged in as {who} (token {})", mask_token(&token));
        }
        None => println!("Not logged in."),
    }
    println!("API: {}", client.base_url());
    println!("Session file: {}", auth.store().path().display());
}
