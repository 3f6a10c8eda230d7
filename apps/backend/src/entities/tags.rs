use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TagCategory {
    #[sea_orm(string_value = "Hot")]
    Hot,
    #[sea_orm(string_value = "Trending")]
    Trending,
    #[sea_orm(string_value = "Newest")]
    Newest,
    #[sea_orm(string_value = "Controversial")]
    Controversial,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_name = "tag_type")]
    #[serde(rename = "type")]
    pub tag_type: String,
    pub category: Option<TagCategory>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tag_blogs::Entity")]
    TagBlogs,
}

impl Related<super::tag_blogs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagBlogs.def()
    }
}

impl Related<super::blogs::Entity> for Entity {
    fn to() -> RelationDef {
        super::tag_blogs::Relation::Blog.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tag_blogs::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
