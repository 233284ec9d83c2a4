use mongodb::{Collection, IndexModel, bson::Document};
use tracing::info;

use crate::common::DatabaseResult;

/// Creates `indexes` on `collection`. Existing indexes with the same name and
/// keys are left untouched by the server.
pub async fn ensure_indexes<T>(collection: &Collection<T>, indexes: Vec<IndexModel>) -> DatabaseResult<Vec<String>>
where
    T: Send + Sync,
{
    if indexes.is_empty() {
        return Ok(Vec::new());
    }

    let result = collection.create_indexes(indexes).await?;
    info!(
        collection = collection.name(),
        indexes = ?result.index_names,
        "Indexes ensured"
    );
    Ok(result.index_names)
}

/// Index key document, fields in the given order (1 ascending, -1 descending).
pub fn keys(fields: &[(&str, i32)]) -> Document {
    fields
        .iter()
        .map(|(field, order)| (field.to_string(), (*order).into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_keys_preserves_order() {
        let k = keys(&[("status", 1), ("price", -1)]);
        assert_eq!(k, doc! { "status": 1, "price": -1 });
        assert_eq!(k.keys().collect::<Vec<_>>(), vec!["status", "price"]);
    }
}
