//! Demo catalog for local environments

use domain_products::{CreateProduct, Product, ProductRepository, ProductResult};
use tracing::info;

/// `(name, description, price, category, stock)`
const DEMO_CATALOG: &[(&str, &str, f64, &str, i64)] = &[
    (
        "Wireless Headphones Pro",
        "High-fidelity wireless headphones with active noise cancelling",
        15999.99,
        "Electronics",
        10,
    ),
    (
        "Galaxy Max Smartphone",
        "Modern smartphone with a great camera and a fast processor",
        89999.99,
        "Electronics",
        5,
    ),
    (
        "Running Sneakers",
        "Comfortable sneakers for running and training",
        8999.99,
        "Sports & Fitness",
        15,
    ),
    (
        "Moisturizing Cream",
        "Nourishing cream for every skin type",
        2799.99,
        "Beauty & Health",
        20,
    ),
    (
        "Espresso Machine",
        "Automatic coffee machine for espresso",
        45999.99,
        "Home & Living",
        3,
    ),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Inserts every demo product whose name is not taken yet.
pub async fn seed_catalog<R: ProductRepository>(
    repository: &R,
    admin_id: &str,
) -> ProductResult<SeedReport> {
    let mut report = SeedReport::default();

    for &(name, description, price, category, stock) in DEMO_CATALOG {
        if repository.exists_by_name(name).await? {
            report.skipped += 1;
            continue;
        }

        let input = CreateProduct {
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
            stock,
            images: vec![],
        };
        let product = Product::new(input, vec![], admin_id);
        repository.insert(&product).await?;
        info!(product_id = %product.id, name, "Seeded product");
        report.inserted += 1;
    }

    Ok(report)
}
