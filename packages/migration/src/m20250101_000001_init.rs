use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    PasswordHash,
    Age,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Blogs {
    Table,
    Id,
    Title,
    Description,
    Episode,
    CreatedAt,
    UserId,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
    TagType,
    Category,
}

#[derive(Iden)]
enum TagBlogs {
    Table,
    TagId,
    BlogId,
}

#[derive(Iden)]
enum UserFriends {
    Table,
    UserId,
    FriendId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Age).integer().null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Login looks users up by name, so names are unique
        manager
            .create_index(
                Index::create()
                    .name("ux_users_name")
                    .table(Users::Table)
                    .col(Users::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // blogs
        manager
            .create_table(
                Table::create()
                    .table(Blogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blogs::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Blogs::Title).string_len(30).not_null())
                    .col(ColumnDef::new(Blogs::Description).text().not_null())
                    .col(ColumnDef::new(Blogs::Episode).integer().null())
                    .col(
                        ColumnDef::new(Blogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Blogs::UserId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blogs_user_id")
                            .from(Blogs::Table, Blogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_user_id")
                    .table(Blogs::Table)
                    .col(Blogs::UserId)
                    .to_owned(),
            )
            .await?;

        // tags
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(
                        ColumnDef::new(Tags::TagType)
                            .string_len(10)
                            .not_null()
                            .default("Common"),
                    )
                    .col(ColumnDef::new(Tags::Category).string_len(16).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_tags_name")
                    .table(Tags::Table)
                    .col(Tags::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // tag_blogs (blog <-> tag)
        manager
            .create_table(
                Table::create()
                    .table(TagBlogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TagBlogs::TagId).big_integer().not_null())
                    .col(ColumnDef::new(TagBlogs::BlogId).big_integer().not_null())
                    .primary_key(Index::create().col(TagBlogs::TagId).col(TagBlogs::BlogId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_blogs_tag_id")
                            .from(TagBlogs::Table, TagBlogs::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_blogs_blog_id")
                            .from(TagBlogs::Table, TagBlogs::BlogId)
                            .to(Blogs::Table, Blogs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // user_friends (user <-> user)
        manager
            .create_table(
                Table::create()
                    .table(UserFriends::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserFriends::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserFriends::FriendId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserFriends::UserId)
                            .col(UserFriends::FriendId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_friends_user_id")
                            .from(UserFriends::Table, UserFriends::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_friends_friend_id")
                            .from(UserFriends::Table, UserFriends::FriendId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(UserFriends::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TagBlogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
