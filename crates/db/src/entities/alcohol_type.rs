//! Alcohol type entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A kind of drink and how much pure alcohol one serving carries.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alcohol_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub name: String,

    /// Grams of alcohol per serving.
    pub alcohol_content_per_serving: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::alcohol_record::Entity")]
    AlcoholRecords,
}

impl Related<super::alcohol_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlcoholRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
