//! Business logic services.

#![allow(missing_docs)]

pub mod alcohol_type;
pub mod analysis;
pub mod calendar;
pub mod comment;
pub mod post;
pub mod record;
pub mod user;

pub use alcohol_type::{AlcoholTypeResponse, AlcoholTypeService, CreateAlcoholTypeInput};
pub use analysis::{AnalysisReport, AnalysisService, DrinkTypeTotal, MonthlyAnalysis, SixMonthsAnalysis};
pub use calendar::{CalendarService, DailyConsumption, MonthlyConsumption};
pub use comment::{CommentResponse, CommentService, CreateCommentInput, UpdateCommentInput};
pub use post::{CreatePostInput, LikeToggleResponse, PostResponse, PostService, UpdatePostInput};
pub use record::{CreatedRecords, RecordInput, RecordPayload, RecordResponse, RecordService, UpdateRecordInput};
pub use user::{ChangePasswordInput, CreateUserInput, UserResponse, UserService};
