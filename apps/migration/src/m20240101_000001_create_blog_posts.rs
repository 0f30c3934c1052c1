use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogPosts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogPosts::Title).string_len(32).not_null())
                    .col(ColumnDef::new(BlogPosts::Description).text().null())
                    .col(
                        ColumnDef::new(BlogPosts::Version)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlogPostComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogPostComments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BlogPostComments::BlogPostId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlogPostComments::Author)
                            .string_len(24)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BlogPostComments::Content).string_len(256).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_post_comments_blog_post")
                            .from(BlogPostComments::Table, BlogPostComments::BlogPostId)
                            .to(BlogPosts::Table, BlogPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_post_comments_blog_post_id")
                    .table(BlogPostComments::Table)
                    .col(BlogPostComments::BlogPostId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogPostComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BlogPosts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BlogPosts {
    Table,
    Id,
    Title,
    Description,
    Version,
}

#[derive(DeriveIden)]
enum BlogPostComments {
    Table,
    Id,
    BlogPostId,
    Author,
    Content,
}
