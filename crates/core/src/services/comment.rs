//! Comment service.

use drinklog_common::{AppResult, IdGenerator};
use drinklog_db::{
    entities::{comment, comment_like},
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::post::LikeToggleResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1))]
    pub post_id: String,

    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            user_id: c.user_id,
            content: c.content,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|t| t.to_rfc3339()),
            like_count: None,
            is_liked: None,
        }
    }
}

#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comment on an existing post.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<CommentResponse> {
        input.validate()?;
        self.post_repo.get_by_id(&input.post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(input.post_id),
            user_id: Set(user_id.to_string()),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.comment_repo.create(model).await?;
        info!(comment_id = %created.id, post_id = %created.post_id, "Comment created");
        Ok(created.into())
    }

    /// Get a comment with its like count and whether `viewer_id` liked it.
    pub async fn get(&self, id: &str, viewer_id: &str) -> AppResult<CommentResponse> {
        let comment = self.comment_repo.get_by_id(id).await?;
        let like_count = self.comment_repo.count_likes(id).await?;
        let is_liked = self.comment_repo.has_liked(id, viewer_id).await?;

        let mut response = CommentResponse::from(comment);
        response.like_count = Some(like_count);
        response.is_liked = Some(is_liked);
        Ok(response)
    }

    /// List comments, optionally for a single post.
    pub async fn list(&self, post_id: Option<&str>) -> AppResult<Vec<CommentResponse>> {
        let comments = self.comment_repo.find_all(post_id).await?;
        Ok(comments.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<CommentResponse>> {
        let comments = self.comment_repo.find_by_user_id(user_id).await?;
        Ok(comments.into_iter().map(Into::into).collect())
    }

    /// Update a comment. Only the author can update.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: UpdateCommentInput,
    ) -> AppResult<CommentResponse> {
        input.validate()?;

        let comment = self.comment_repo.get_owned(id, user_id).await?;
        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(input.content);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.comment_repo.update(active).await?;
        Ok(updated.into())
    }

    /// Delete a comment. Only the author can delete.
    pub async fn delete(&self, id: &str, user_id: &str) -> AppResult<()> {
        self.comment_repo.get_owned(id, user_id).await?;
        self.comment_repo.delete(id).await?;

        info!(comment_id = %id, user_id = %user_id, "Comment deleted");
        Ok(())
    }

    /// Flip `user_id`'s like on a comment.
    pub async fn toggle_like(&self, id: &str, user_id: &str) -> AppResult<LikeToggleResponse> {
        self.comment_repo.get_by_id(id).await?;

        let liked = if self.comment_repo.unlike(id, user_id).await? {
            false
        } else {
            self.comment_repo
                .like(comment_like::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.to_string()),
                    comment_id: Set(id.to_string()),
                    created_at: Set(chrono::Utc::now().into()),
                })
                .await?;
            true
        };

        let like_count = self.comment_repo.count_likes(id).await?;
        Ok(LikeToggleResponse { liked, like_count })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use drinklog_common::AppError;
    use drinklog_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn create_test_comment(id: &str, user_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            post_id: "post1".to_string(),
            user_id: user_id.to_string(),
            content: "Same here".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: MockDatabase) -> CommentService {
        let db = Arc::new(db.into_connection());
        CommentService::new(CommentRepository::new(Arc::clone(&db)), PostRepository::new(db))
    }

    #[tokio::test]
    async fn test_create_on_missing_post() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()]),
        );

        let result = service
            .create(
                "user1",
                CreateCommentInput {
                    post_id: "missing".to_string(),
                    content: "hello".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_long_content() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(
                "user1",
                CreateCommentInput {
                    post_id: "post1".to_string(),
                    content: "x".repeat(2001),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_by_non_author_is_not_found() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()]),
        );

        let result = service.delete("comment1", "intruder").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_by_author() {
        let mut updated = create_test_comment("comment1", "user1");
        updated.content = "Edited".to_string();

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment("comment1", "user1")]])
                .append_query_results([[updated]]),
        );

        let response = service
            .update(
                "comment1",
                "user1",
                UpdateCommentInput {
                    content: "Edited".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(response.content, "Edited");
    }

    #[tokio::test]
    async fn test_get_reports_viewer_like() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment("comment1", "user1")]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(4))
                }]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(0))
                }]]),
        );

        let comment = service.get("comment1", "user2").await.unwrap();
        assert_eq!(comment.like_count, Some(4));
        assert_eq!(comment.is_liked, Some(false));
    }

    #[tokio::test]
    async fn test_toggle_like_off() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment("comment1", "user1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(2))
                }]]),
        );

        let result = service.toggle_like("comment1", "user2").await.unwrap();
        assert!(!result.liked);
        assert_eq!(result.like_count, 2);
    }
}
