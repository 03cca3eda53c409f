//! Dashboard view.

use anyhow::Result;
use flogin_core::api::ApiClient;
use flogin_core::routes::Route;

pub fn show(client: &ApiClient) -> Result<()> {
    let landed = client
        .navigator()
        .visit(Route::Root, client.auth().is_authenticated());

    if landed == Route::Login {
        println!("Welcome! Log in to manage products:");
        println!();
        println!("  flogin login");
        return Ok(());
    }

    println!("Dashboard");
    println!("Welcome to your dashboard!");
    println!();
    println!("  flogin products list      View products");
    println!("  flogin products create    Create a new product");
    println!("  flogin logout             Log out");
    Ok(())
}
