//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, PostLike, post, post_like};
use drinklog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Post Operations ====================

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post: {id}")))
    }

    /// Get a post by ID only if `user_id` owns it.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> AppResult<post::Model> {
        Post::find_by_id(id)
            .filter(post::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Post: {id}")))
    }

    /// List all posts, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<post::Model>> {
        Post::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's posts, newest first.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List posts liked by a user, newest first.
    pub async fn find_liked_by_user(&self, user_id: &str) -> AppResult<Vec<post::Model>> {
        let post_ids: Vec<String> = PostLike::find()
            .select_only()
            .column(post_like::Column::PostId)
            .filter(post_like::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        Post::find()
            .filter(post::Column::Id.is_in(post_ids))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ==================== Post Like Operations ====================

    /// Check if a user has liked a post.
    pub async fn has_liked(&self, post_id: &str, user_id: &str) -> AppResult<bool> {
        let count = PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Like a post.
    pub async fn like(&self, model: post_like::ActiveModel) -> AppResult<post_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Unlike a post. Returns whether a like was removed.
    pub async fn unlike(&self, post_id: &str, user_id: &str) -> AppResult<bool> {
        let deleted = PostLike::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }

    /// Count likes on a post.
    pub async fn count_likes(&self, post_id: &str) -> AppResult<u64> {
        PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Friday night".to_string(),
            content: "Two bottles of makgeolli".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_owned_rejects_foreign_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_owned("post1", "intruder").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_owned_found() {
        let post = create_test_post("post1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let found = repo.get_owned("post1", "user1").await.unwrap();

        assert_eq!(found.id, "post1");
    }

    #[tokio::test]
    async fn test_count_likes() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(7))
                }]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert_eq!(repo.count_likes("post1").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_unlike_without_like_removes_nothing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert!(!repo.unlike("post1", "user1").await.unwrap());
    }
}
