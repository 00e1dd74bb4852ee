//! Catalog commands.

use std::io::Write;

use atelier_client::ApiClient;
use atelier_core::{Product, ProductId, ProductQuery};

use super::{CommandError, require_admin};

pub async fn list(
    api: &ApiClient,
    query: &ProductQuery,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let products = api.list_products(query).await?;
    for product in &products {
        let flags = match (product.is_featured, product.is_available) {
            (true, true) => "featured",
            (_, false) => "unavailable",
            (false, true) => "",
        };
        writeln!(
            out,
            "#{:<5} {:>10}  {:<14} {} {}",
            product.id,
            product.price.to_string(),
            product.category.as_deref().unwrap_or("-"),
            product.title,
            flags,
        )?;
    }
    tracing::info!("{} product(s)", products.len());
    Ok(())
}

pub async fn show(api: &ApiClient, id: ProductId, out: &mut impl Write) -> Result<(), CommandError> {
    let product = api.get_product(id).await?;
    write_product(&product, out)?;
    Ok(())
}

pub async fn delete(api: &ApiClient, id: ProductId) -> Result<(), CommandError> {
    require_admin(api).await?;
    let response = api.delete_product(id).await?;
    tracing::info!("{}", response.message);
    Ok(())
}

fn write_product(product: &Product, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{} (#{})", product.title, product.id)?;
    writeln!(out, "Price:     {}", product.price)?;
    writeln!(out, "Category:  {}", product.category.as_deref().unwrap_or("-"))?;
    writeln!(out, "Featured:  {}", product.is_featured)?;
    writeln!(out, "Available: {}", product.is_available)?;
    if let Some(image) = &product.image_url {
        writeln!(out, "Image:     {image}")?;
    }
    if let Some(description) = &product.description {
        writeln!(out)?;
        writeln!(out, "{description}")?;
    }
    if !product.feature_list().is_empty() {
        writeln!(out)?;
        for feature in product.feature_list() {
            writeln!(out, "  - {feature}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_write_product_lists_features_in_order() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "title": "Portfolio Kit",
            "price": 49.0,
            "features": "[\"SEO\",\"Fast\",\"Responsive\"]",
            "is_featured": true,
            "created_at": "2024-03-01T10:00:00",
            "updated_at": "2024-03-01T10:00:00"
        }))
        .unwrap();

        let mut out = Vec::new();
        write_product(&product, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Portfolio Kit (#3)\n"));
        assert!(text.contains("Price:     49.00\n"));
        assert!(text.ends_with("  - SEO\n  - Fast\n  - Responsive\n"));
    }
}
