//! Blog post comment entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_post_comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub blog_post_id: i64,
    pub author: String,
    #[sea_orm(nullable)]
    pub content: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blog_post::Entity",
        from = "Column::BlogPostId",
        to = "super::blog_post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    BlogPost,
}

impl Related<super::blog_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogPost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain BlogPostComment.
impl From<Model> for posts_core::domain::BlogPostComment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author: model.author,
            content: model.content,
        }
    }
}
