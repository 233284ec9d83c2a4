use crate::models::Product;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Raw per-category figures as produced by the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryStatRow {
    #[serde(rename = "_id")]
    pub category: String,
    pub count: u64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryStatSummary {
    pub count: u64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Category statistics, serialized as a map ordered by count descending
/// (ties by category name).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryStats(Vec<(String, CategoryStatSummary)>);

impl CategoryStats {
    pub fn from_rows(rows: Vec<CategoryStatRow>) -> Self {
        let mut entries: Vec<(String, CategoryStatSummary)> = rows
            .into_iter()
            .filter(|row| row.count > 0)
            .map(|row| {
                (
                    row.category,
                    CategoryStatSummary {
                        count: row.count,
                        min_price: round2(row.min_price),
                        max_price: round2(row.max_price),
                        avg_price: round2(row.avg_price),
                    },
                )
            })
            .collect();

        entries.sort_by(|(a_name, a), (b_name, b)| {
            b.count.cmp(&a.count).then_with(|| a_name.cmp(b_name))
        });
        Self(entries)
    }

    pub fn entries(&self) -> &[(String, CategoryStatSummary)] {
        &self.0
    }

    pub fn get(&self, category: &str) -> Option<&CategoryStatSummary> {
        self.0.iter().find(|(name, _)| name == category).map(|(_, s)| s)
    }

    pub fn total_count(&self) -> u64 {
        self.0.iter().map(|(_, s)| s.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, summary) in &self.0 {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryStatsResponse {
    #[schema(value_type = std::collections::HashMap<String, CategoryStatSummary>)]
    pub category_stats: CategoryStats,
}

/// Groups the active products by category. Used by the in-memory store; the
/// MongoDB store runs the equivalent `$group` pipeline.
pub fn aggregate(products: &[Product]) -> Vec<CategoryStatRow> {
    let mut groups: BTreeMap<&str, (u64, f64, f64, f64)> = BTreeMap::new();

    for product in products.iter().filter(|p| p.is_active()) {
        let entry = groups
            .entry(product.category.as_str())
            .or_insert((0, f64::INFINITY, f64::NEG_INFINITY, 0.0));
        entry.0 += 1;
        entry.1 = entry.1.min(product.price);
        entry.2 = entry.2.max(product.price);
        entry.3 += product.price;
    }

    groups
        .into_iter()
        .map(|(category, (count, min, max, sum))| CategoryStatRow {
            category: category.to_string(),
            count,
            min_price: min,
            max_price: max,
            avg_price: sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateProduct, ProductStatus};

    fn product(category: &str, price: f64, status: ProductStatus) -> Product {
        let mut p = Product::new(
            CreateProduct {
                name: format!("{category}-{price}"),
                description: String::new(),
                price,
                category: category.to_string(),
                stock: 0,
                images: vec![],
            },
            vec![],
            "admin",
        );
        p.status = status;
        p
    }

    fn row(category: &str, count: u64, avg: f64) -> CategoryStatRow {
        CategoryStatRow {
            category: category.to_string(),
            count,
            min_price: 1.0,
            max_price: 2.0,
            avg_price: avg,
        }
    }

    #[test]
    fn test_aggregate_skips_inactive() {
        let products = vec![
            product("Electronics", 500.0, ProductStatus::Active),
            product("Electronics", 100.0, ProductStatus::Inactive),
            product("Fashion", 20.0, ProductStatus::Active),
            product("Fashion", 30.0, ProductStatus::Active),
        ];

        let stats = CategoryStats::from_rows(aggregate(&products));
        assert_eq!(stats.total_count(), 3);

        let electronics = stats.get("Electronics").unwrap();
        assert_eq!(electronics.count, 1);
        assert_eq!(electronics.min_price, 500.0);

        let fashion = stats.get("Fashion").unwrap();
        assert_eq!(fashion.avg_price, 25.0);
        assert_eq!(fashion.max_price, 30.0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let stats = CategoryStats::from_rows(vec![row("Books", 3, 10.0 / 3.0)]);
        assert_eq!(stats.get("Books").unwrap().avg_price, 3.33);
    }

    #[test]
    fn test_zero_counts_dropped_and_order_by_count() {
        let stats = CategoryStats::from_rows(vec![
            row("Books", 1, 1.0),
            row("Empty", 0, 0.0),
            row("Toys", 5, 1.0),
            row("Art", 1, 1.0),
        ]);
        let names: Vec<&str> = stats.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Toys", "Art", "Books"]);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let response = CategoryStatsResponse {
            category_stats: CategoryStats::from_rows(vec![row("A", 1, 1.5), row("B", 2, 1.0)]),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.starts_with(r#"{"category_stats":{"B":{"count":2"#));
        assert!(json.find("\"B\"").unwrap() < json.find("\"A\"").unwrap());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(CategoryStats::from_rows(aggregate(&[])).is_empty());
    }
}
