//! Product list, detail and form commands.

use anyhow::{Context, Result};
use comfy_table::{Table, presets};
use flogin_core::api::{ApiClient, Product, ProductPage, ProductQuery};
use flogin_core::forms;
use flogin_core::routes::Route;
use flogin_core::validation::ProductFormData;

use super::{api_failure, confirm, form_failure, loading, require};

fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

fn status_label(product: &Product) -> &'static str {
    if product.active { "Active" } else { "Inactive" }
}

fn render_table(page: &ProductPage) -> String {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_FULL_CONDENSED).set_header(vec![
        "ID", "Name", "Price", "Quantity", "Category", "Status",
    ]);
    for product in &page.content {
        table.add_row(vec![
            product.id.to_string(),
            product.name.clone(),
            format_price(product.price),
            product.quantity.to_string(),
            product.category.clone(),
            status_label(product).to_string(),
        ]);
    }
    table.to_string()
}

fn page_footer(page: &ProductPage) -> Option<String> {
    let total_pages = page.total_pages?;
    let current = page.number.unwrap_or(0).saturating_add(1);
    let total = page
        .total_elements
        .map(|n| format!(" ({n} products)"))
        .unwrap_or_default();
    Some(format!("Page {current} of {total_pages}{total}"))
}

fn render_detail(product: &Product) -> String {
    let description = product
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description");
    [
        format!("#{} {}", product.id, product.name),
        format!("Price:       {}", format_price(product.price)),
        format!("Quantity:    {}", product.quantity),
        format!("Category:    {}", product.category),
        format!("Description: {description}"),
        format!("Status:      {}", status_label(product)),
    ]
    .join("\n")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

pub async fn list(client: &ApiClient, query: &ProductQuery, json: bool) -> Result<()> {
    require(client, Route::Products)?;

    loading("products");
    let page = client.list_products(query).await.map_err(api_failure)?;

    if json {
        return print_json(&page);
    }
    if page.content.is_empty() {
        println!("No products found.");
        return Ok(());
    }
    println!("{}", render_table(&page));
    if let Some(footer) = page_footer(&page) {
        println!("{footer}");
    }
    Ok(())
}

pub async fn show(client: &ApiClient, id: i64, json: bool) -> Result<()> {
    require(client, Route::ProductDetail(id))?;

    loading("product");
    let product = client.get_product(id).await.map_err(api_failure)?;

    if json {
        return print_json(&product);
    }
    println!("{}", render_detail(&product));
    Ok(())
}

pub async fn create(client: &ApiClient, form: &ProductFormData) -> Result<()> {
    require(client, Route::ProductCreate)?;

    let product = forms::submit_product(client, None, form)
        .await
        .map_err(form_failure)?;

    println!("Created product #{}.", product.id);
    println!("{}", render_detail(&product));
    Ok(())
}

/// Prefills the form from the current product, then applies the given fields.
pub async fn edit(client: &ApiClient, id: i64, changes: ProductFormData) -> Result<()> {
    require(client, Route::ProductEdit(id))?;

    loading("product");
    let current = client.get_product(id).await.map_err(api_failure)?;

    let base = ProductFormData::from(&current);
    let form = ProductFormData {
        name: changes.name.or(base.name),
        price: changes.price.or(base.price),
        quantity: changes.quantity.or(base.quantity),
        description: changes.description.or(base.description),
        category: changes.category.or(base.category),
    };

    let product = forms::submit_product(client, Some(id), &form)
        .await
        .map_err(form_failure)?;

    println!("Updated product #{}.", product.id);
    println!("{}", render_detail(&product));
    Ok(())
}

pub async fn delete(client: &ApiClient, id: i64, yes: bool) -> Result<()> {
    require(client, Route::ProductDetail(id))?;

    loading("product");
    let product = client.get_product(id).await.map_err(api_failure)?;

    if !yes {
        println!("{}", render_detail(&product));
        if !confirm("Are you sure you want to delete this product?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    client.delete_product(id).await.map_err(api_failure)?;
    client.navigator().navigate(Route::Products);
    println!("Deleted product #{id} ({}).", product.name);
    Ok(())
}
