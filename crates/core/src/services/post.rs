//! Community post service.

use drinklog_common::{AppResult, IdGenerator};
use drinklog_db::{
    entities::{post, post_like},
    repositories::PostRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

/// Input for updating a post.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub content: Option<String>,
}

/// Response for post operations.
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

impl From<post::Model> for PostResponse {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            title: p.title,
            content: p.content,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
            like_count: None,
            is_liked: None,
        }
    }
}

/// Like state after a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub like_count: u64,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(post_repo: PostRepository) -> Self {
        Self {
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post owned by `user_id`.
    pub async fn create(&self, user_id: &str, input: CreatePostInput) -> AppResult<PostResponse> {
        input.validate()?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.post_repo.create(model).await?;
        info!(post_id = %created.id, user_id = %user_id, "Post created");
        Ok(created.into())
    }

    /// Get a post with its like count and whether `viewer_id` liked it.
    pub async fn get(&self, id: &str, viewer_id: &str) -> AppResult<PostResponse> {
        let post = self.post_repo.get_by_id(id).await?;
        let like_count = self.post_repo.count_likes(id).await?;
        let is_liked = self.post_repo.has_liked(id, viewer_id).await?;

        let mut response = PostResponse::from(post);
        response.like_count = Some(like_count);
        response.is_liked = Some(is_liked);
        Ok(response)
    }

    /// List all posts, newest first.
    pub async fn list(&self) -> AppResult<Vec<PostResponse>> {
        let posts = self.post_repo.find_all().await?;
        Ok(posts.into_iter().map(Into::into).collect())
    }

    /// List posts written by a user.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<PostResponse>> {
        let posts = self.post_repo.find_by_user_id(user_id).await?;
        Ok(posts.into_iter().map(Into::into).collect())
    }

    /// List posts a user has liked.
    pub async fn liked_by_user(&self, user_id: &str) -> AppResult<Vec<PostResponse>> {
        let posts = self.post_repo.find_liked_by_user(user_id).await?;
        Ok(posts
            .into_iter()
            .map(|p| {
                let mut response = PostResponse::from(p);
                response.is_liked = Some(true);
                response
            })
            .collect())
    }

    /// Update a post. Only the owner can update.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<PostResponse> {
        input.validate()?;

        let post = self.post_repo.get_owned(id, user_id).await?;
        let mut active: post::ActiveModel = post.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.post_repo.update(active).await?;
        Ok(updated.into())
    }

    /// Delete a post. Only the owner can delete.
    pub async fn delete(&self, id: &str, user_id: &str) -> AppResult<()> {
        self.post_repo.get_owned(id, user_id).await?;
        self.post_repo.delete(id).await?;

        info!(post_id = %id, user_id = %user_id, "Post deleted");
        Ok(())
    }

    /// Flip `user_id`'s like on a post.
    pub async fn toggle_like(&self, id: &str, user_id: &str) -> AppResult<LikeToggleResponse> {
        self.post_repo.get_by_id(id).await?;

        let liked = if self.post_repo.unlike(id, user_id).await? {
            false
        } else {
            let model = post_like::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                post_id: Set(id.to_string()),
                created_at: Set(chrono::Utc::now().into()),
            };
            self.post_repo.like(model).await?;
            true
        };

        let like_count = self.post_repo.count_likes(id).await?;
        Ok(LikeToggleResponse { liked, like_count })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use drinklog_common::AppError;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Friday soju".to_string(),
            content: "Two bottles with the team".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_like(post_id: &str, user_id: &str) -> post_like::Model {
        post_like::Model {
            id: "like1".to_string(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        maplit::btreemap! { "num_items" => Value::BigInt(Some(n)) }
    }

    fn service_with(db: MockDatabase) -> PostService {
        PostService::new(PostRepository::new(Arc::new(db.into_connection())))
    }

    #[tokio::test]
    async fn test_create_validates_title() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(
                "user1",
                CreatePostInput {
                    title: String::new(),
                    content: "body".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_post() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("post1", "user1")]]),
        );

        let created = service
            .create(
                "user1",
                CreatePostInput {
                    title: "Friday soju".to_string(),
                    content: "Two bottles with the team".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.user_id, "user1");
        assert!(created.like_count.is_none());
    }

    #[tokio::test]
    async fn test_get_includes_like_state() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("post1", "user1")]])
                .append_query_results([[count_row(3)]])
                .append_query_results([[count_row(1)]]),
        );

        let post = service.get("post1", "user2").await.unwrap();
        assert_eq!(post.like_count, Some(3));
        assert_eq!(post.is_liked, Some(true));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_not_found() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()]),
        );

        let result = service
            .update(
                "post1",
                "intruder",
                UpdatePostInput {
                    title: Some("hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("post1", "user1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );

        assert!(service.delete("post1", "user1").await.is_ok());
    }

    #[tokio::test]
    async fn test_toggle_like_on() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("post1", "user1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([[create_test_like("post1", "user2")]])
                .append_query_results([[count_row(1)]]),
        );

        let result = service.toggle_like("post1", "user2").await.unwrap();
        assert_eq!(
            result,
            LikeToggleResponse {
                liked: true,
                like_count: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_like_off() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("post1", "user1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[count_row(0)]]),
        );

        let result = service.toggle_like("post1", "user2").await.unwrap();
        assert_eq!(
            result,
            LikeToggleResponse {
                liked: false,
                like_count: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_like_unknown_post() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()]),
        );

        let result = service.toggle_like("missing", "user2").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
