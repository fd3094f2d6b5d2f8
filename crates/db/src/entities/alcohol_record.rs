//! Alcohol record entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Weather on the day of drinking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[sea_orm(string_value = "sunny")]
    Sunny,
    #[sea_orm(string_value = "cloudy")]
    Cloudy,
    #[sea_orm(string_value = "rainy")]
    Rainy,
    #[sea_orm(string_value = "snowy")]
    Snowy,
    #[sea_orm(string_value = "windy")]
    Windy,
}

impl Weather {
    /// Stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Windy => "windy",
        }
    }
}

/// Mood while drinking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[sea_orm(string_value = "happy")]
    Happy,
    #[sea_orm(string_value = "calm")]
    Calm,
    #[sea_orm(string_value = "sad")]
    Sad,
    #[sea_orm(string_value = "angry")]
    Angry,
    #[sea_orm(string_value = "stressed")]
    Stressed,
    #[sea_orm(string_value = "excited")]
    Excited,
}

impl Mood {
    /// Stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Calm => "calm",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Stressed => "stressed",
            Self::Excited => "excited",
        }
    }
}

/// One user's drinking entry for a single calendar date.
///
/// `(user_id, date)` is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alcohol_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    pub date: Date,

    #[sea_orm(indexed)]
    pub alcohol_type_id: String,

    pub servings: i32,

    /// Minutes spent drinking.
    pub drinking_duration: i32,

    pub weather: Weather,

    pub mood: Mood,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::alcohol_type::Entity",
        from = "Column::AlcoholTypeId",
        to = "super::alcohol_type::Column::Id",
        on_delete = "Restrict"
    )]
    AlcoholType,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::alcohol_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlcoholType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
