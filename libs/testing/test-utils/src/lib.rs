//! Shared test utilities for the domain crates.
//!
//! - `TestDataBuilder`: deterministic ids, names and emails per test
//! - `assertions`: ordering and lookup helpers
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["mongo"] }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Seeded test data, so a failing test reproduces with the same values.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic UUID for the `n`th entity of this test.
    pub fn id(&self, n: u64) -> Uuid {
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        uuid_bytes[8..].copy_from_slice(&n.to_le_bytes());
        Uuid::from_bytes(uuid_bytes)
    }

    pub fn user_id(&self) -> Uuid {
        self.id(0)
    }

    /// `test-{prefix}-{seed}-{suffix}`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "phone"), "test-product-7-phone");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    pub fn email(&self, local: &str) -> String {
        format!("{}.{}@test.shop", local, self.seed)
    }

    /// Unique database name, safe for parallel tests sharing a container.
    pub fn database_name(&self) -> String {
        format!("test_{}", self.seed)
    }
}

pub mod assertions {
    use std::fmt::Debug;

    /// Panics with the first offending pair when `values` is not ascending.
    pub fn assert_non_decreasing<T: PartialOrd + Debug>(values: &[T], context: &str) {
        if let Some(pair) = values.windows(2).find(|w| w[0] > w[1]) {
            panic!("{context}: {:?} comes before {:?}", pair[0], pair[1]);
        }
    }

    /// Panics with the first offending pair when `values` is not descending.
    pub fn assert_non_increasing<T: PartialOrd + Debug>(values: &[T], context: &str) {
        if let Some(pair) = values.windows(2).find(|w| w[0] < w[1]) {
            panic!("{context}: {:?} comes before {:?}", pair[0], pair[1]);
        }
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
