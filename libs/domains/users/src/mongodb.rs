//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use axum_helpers::Role;
use database::mongodb::{ensure_indexes, keys};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::doc,
    options::{FindOneAndUpdateOptions, IndexOptions, ReplaceOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::UserResult;
use crate::models::User;
use crate::repository::UserRepository;

pub const COLLECTION: &str = "users";

pub struct MongoUserRepository {
    collection: Collection<User>,
}

fn index(field: &str, unique: bool) -> IndexModel {
    IndexModel::builder()
        .keys(keys(&[(field, 1)]))
        .options(
            IndexOptions::builder()
                .name(format!("idx_{}", field))
                .unique(unique.then_some(true))
                .build(),
        )
        .build()
}

pub fn user_indexes() -> Vec<IndexModel> {
    vec![
        index("email", true),
        index("role", false),
        index("session_token", false),
        index("google_id", false),
    ]
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>(COLLECTION),
        }
    }

    pub async fn init_indexes(&self) -> UserResult<Vec<String>> {
        Ok(ensure_indexes(&self.collection, user_indexes()).await?)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_google_id(&self, google_id: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "google_id": google_id })
            .await?)
    }

    #[instrument(skip_all)]
    async fn find_by_session_token(&self, token: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "session_token": token })
            .await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn save(&self, user: &User) -> UserResult<()> {
        self.collection
            .replace_one(doc! { "id": &user.id }, user)
            .with_options(ReplaceOptions::builder().upsert(true).build())
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_session(&self, id: &str) -> UserResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id },
                doc! { "$unset": { "session_token": "", "session_expires": "" } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn update_name(&self, id: &str, name: &str) -> UserResult<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .collection
            .find_one_and_update(doc! { "id": id }, doc! { "$set": { "name": name } })
            .with_options(options)
            .await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn count(&self, role: Option<Role>) -> UserResult<u64> {
        let filter = match role {
            Some(role) => doc! { "role": role.to_string() },
            None => doc! {},
        };
        Ok(self.collection.count_documents(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_indexes() {
        let indexes = user_indexes();
        let names: Vec<_> = indexes
            .iter()
            .map(|i| i.options.as_ref().and_then(|o| o.name.clone()).unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["idx_email", "idx_role", "idx_session_token", "idx_google_id"]
        );
        assert_eq!(indexes[0].options.as_ref().unwrap().unique, Some(true));
        assert_eq!(indexes[1].options.as_ref().unwrap().unique, None);
    }
}
