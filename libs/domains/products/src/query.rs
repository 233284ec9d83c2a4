//! Turns raw listing parameters into a validated [`ProductQuery`].
//!
//! The same query drives both the MongoDB filter and the in-memory matcher,
//! so the two repositories agree on which products a listing returns.

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

/// Raw query string of `GET /products`. Everything arrives as text so that a
/// malformed number becomes a 400 with the parameter name rather than an
/// extractor rejection.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// Exact category match
    pub category: Option<String>,
    /// Case-insensitive substring of name, description or category
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// One of `price_low`, `price_high`, `name`, `newest`, `oldest`
    pub sort_by: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    PriceLow,
    PriceHigh,
    Name,
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::PriceLow => a.price.total_cmp(&b.price),
            SortOrder::PriceHigh => b.price.total_cmp(&a.price),
            SortOrder::Name => a.name.cmp(&b.name),
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::Oldest => a.created_at.cmp(&b.created_at),
        }
    }
}

/// A validated product listing query. Listings only ever see active products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// `None` keeps storage order
    pub sort: Option<SortOrder>,
    pub limit: Option<u64>,
    pub offset: u64,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_price(name: &'static str, value: Option<String>) -> ProductResult<Option<f64>> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    match f64::from_str(raw.trim()) {
        Ok(price) if price.is_finite() => Ok(Some(price)),
        _ => Err(ProductError::InvalidFilterParameter { name, value: raw }),
    }
}

fn parse_count(name: &'static str, value: Option<String>, min: u64) -> ProductResult<Option<u64>> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    match u64::from_str(raw.trim()) {
        Ok(n) if n >= min && i64::try_from(n).is_ok() => Ok(Some(n)),
        _ => Err(ProductError::InvalidFilterParameter { name, value: raw }),
    }
}

impl ProductQuery {
    pub fn from_params(params: ProductListParams) -> ProductResult<Self> {
        let min_price = parse_price("min_price", params.min_price)?;
        let max_price = parse_price("max_price", params.max_price)?;

        // Unknown sort keys fall back to storage order.
        let sort = non_empty(params.sort_by).and_then(|s| SortOrder::from_str(s.trim()).ok());

        Ok(Self {
            category: non_empty(params.category),
            search: non_empty(params.search),
            min_price,
            max_price,
            sort,
            limit: parse_count("limit", params.limit, 1)?,
            offset: parse_count("offset", params.offset, 0)?.unwrap_or(0),
        })
    }

    pub fn status(&self) -> ProductStatus {
        ProductStatus::Active
    }

    /// Whether `product` passes every filter of this query.
    pub fn matches(&self, product: &Product) -> bool {
        if product.status != self.status() {
            return false;
        }
        if let Some(ref category) = self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let hit = [&product.name, &product.description, &product.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Filters, sorts and pages `products` held in storage order.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let mut matched: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();

        if let Some(sort) = self.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        let skipped = matched.into_iter().skip(self.offset as usize);
        match self.limit {
            Some(limit) => skipped.take(limit as usize).collect(),
            None => skipped.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProduct;

    fn product(name: &str, category: &str, price: f64) -> Product {
        Product::new(
            CreateProduct {
                name: name.to_string(),
                description: format!("{name} description"),
                price,
                category: category.to_string(),
                stock: 1,
                images: vec![],
            },
            vec![],
            "admin",
        )
    }

    fn catalog() -> Vec<Product> {
        let mut old_phone = product("Old Phone", "Electronics", 100.0);
        old_phone.status = ProductStatus::Inactive;
        vec![
            product("Phone", "Electronics", 500.0),
            product("Shirt", "Fashion", 20.0),
            old_phone,
        ]
    }

    fn params(pairs: &[(&str, &str)]) -> ProductListParams {
        let mut p = ProductListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "category" => p.category = value,
                "search" => p.search = value,
                "min_price" => p.min_price = value,
                "max_price" => p.max_price = value,
                "sort_by" => p.sort_by = value,
                "limit" => p.limit = value,
                "offset" => p.offset = value,
                other => panic!("unknown param {other}"),
            }
        }
        p
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_lists_active_in_storage_order() {
        let query = ProductQuery::from_params(ProductListParams::default()).unwrap();
        assert_eq!(names(&query.apply(catalog())), vec!["Phone", "Shirt"]);
    }

    #[test]
    fn test_category_and_price_range() {
        let query = ProductQuery::from_params(params(&[
            ("category", "Electronics"),
            ("min_price", "50"),
        ]))
        .unwrap();
        assert_eq!(names(&query.apply(catalog())), vec!["Phone"]);

        let query = ProductQuery::from_params(params(&[("max_price", "20")])).unwrap();
        assert_eq!(names(&query.apply(catalog())), vec!["Shirt"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_skips_inactive() {
        let query = ProductQuery::from_params(params(&[("search", "PHONE")])).unwrap();
        assert_eq!(names(&query.apply(catalog())), vec!["Phone"]);

        let query = ProductQuery::from_params(params(&[("search", "fash")])).unwrap();
        assert_eq!(names(&query.apply(catalog())), vec!["Shirt"]);
    }

    #[test]
    fn test_sort_orders() {
        let query = ProductQuery::from_params(params(&[("sort_by", "price_low")])).unwrap();
        assert_eq!(names(&query.apply(catalog())), vec!["Shirt", "Phone"]);

        let query = ProductQuery::from_params(params(&[("sort_by", "price_high")])).unwrap();
        assert_eq!(names(&query.apply(catalog())), vec!["Phone", "Shirt"]);

        let query = ProductQuery::from_params(params(&[("sort_by", "name")])).unwrap();
        assert_eq!(names(&query.apply(catalog())), vec!["Phone", "Shirt"]);
    }

    #[test]
    fn test_unknown_sort_keeps_storage_order() {
        let query = ProductQuery::from_params(params(&[("sort_by", "popularity")])).unwrap();
        assert_eq!(query.sort, None);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let query = ProductQuery::from_params(params(&[
            ("category", ""),
            ("min_price", " "),
            ("limit", ""),
        ]))
        .unwrap();
        assert_eq!(query, ProductQuery::default());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for (key, value) in [
            ("min_price", "cheap"),
            ("max_price", "NaN"),
            ("max_price", "inf"),
            ("limit", "0"),
            ("limit", "-3"),
            ("offset", "x"),
            ("limit", "18446744073709551615"),
            ("offset", "9223372036854775808"),
        ] {
            let err = ProductQuery::from_params(params(&[(key, value)])).unwrap_err();
            match err {
                ProductError::InvalidFilterParameter { name, .. } => assert_eq!(name, key),
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_largest_signed_limit_is_accepted() {
        let query = ProductQuery::from_params(params(&[("limit", "9223372036854775807")])).unwrap();
        assert_eq!(query.limit, Some(i64::MAX as u64));
        assert_eq!(names(&query.apply(catalog())), vec!["Phone", "Shirt"]);
    }

    #[test]
    fn test_offset_and_limit_page_after_sorting() {
        let mut products = catalog();
        products.push(product("Cable", "Electronics", 5.0));

        let query = ProductQuery::from_params(params(&[
            ("sort_by", "price_low"),
            ("offset", "1"),
            ("limit", "1"),
        ]))
        .unwrap();
        assert_eq!(names(&query.apply(products)), vec!["Shirt"]);
    }
}
