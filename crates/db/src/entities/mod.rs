//! Database entities.

pub mod alcohol_record;
pub mod alcohol_type;
pub mod comment;
pub mod comment_like;
pub mod post;
pub mod post_like;
pub mod user;

pub use alcohol_record::Entity as AlcoholRecord;
pub use alcohol_type::Entity as AlcoholType;
pub use comment::Entity as Comment;
pub use comment_like::Entity as CommentLike;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use user::Entity as User;
