//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, CommentLike, comment, comment_like};
use drinklog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment: {id}")))
    }

    /// Get a comment by ID only if `user_id` wrote it.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> AppResult<comment::Model> {
        Comment::find_by_id(id)
            .filter(comment::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Comment: {id}")))
    }

    /// List comments, oldest first, optionally restricted to one post.
    pub async fn find_all(&self, post_id: Option<&str>) -> AppResult<Vec<comment::Model>> {
        let mut query = Comment::find().order_by_asc(comment::Column::CreatedAt);

        if let Some(post_id) = post_id {
            query = query.filter(comment::Column::PostId.eq(post_id));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's comments, newest first.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::UserId.eq(user_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Check if a user has liked a comment.
    pub async fn has_liked(&self, comment_id: &str, user_id: &str) -> AppResult<bool> {
        let count = CommentLike::find()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .filter(comment_like::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Like a comment.
    pub async fn like(&self, model: comment_like::ActiveModel) -> AppResult<comment_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Unlike a comment. Returns whether a like was removed.
    pub async fn unlike(&self, comment_id: &str, user_id: &str) -> AppResult<bool> {
        let deleted = CommentLike::delete_many()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .filter(comment_like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }

    /// Count likes on a comment.
    pub async fn count_likes(&self, comment_id: &str) -> AppResult<u64> {
        CommentLike::find()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
