//! SeaORM adapter for users and friendships.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait,
    NotSet, QueryFilter, QueryOrder, Set,
};

use crate::entities::{blogs, user_friends, users};

pub mod dto;

pub use dto::{UserCreate, UserUpdate};

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn find_user_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Name.eq(name))
        .one(conn)
        .await
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(conn)
        .await
}

/// Blogs owned by any of `user_ids`.
pub async fn blogs_for_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: &[i64],
) -> Result<Vec<blogs::Model>, sea_orm::DbErr> {
    blogs::Entity::find()
        .filter(blogs::Column::UserId.is_in(user_ids.iter().copied()))
        .order_by_asc(blogs::Column::Id)
        .all(conn)
        .await
}

/// `(user_id, friend)` pairs for every user in `user_ids`.
pub async fn friends_for_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: &[i64],
) -> Result<Vec<(i64, users::Model)>, sea_orm::DbErr> {
    let links = user_friends::Entity::find()
        .filter(user_friends::Column::UserId.is_in(user_ids.iter().copied()))
        .order_by_asc(user_friends::Column::FriendId)
        .all(conn)
        .await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let friends = users::Entity::find()
        .filter(users::Column::Id.is_in(links.iter().map(|l| l.friend_id)))
        .all(conn)
        .await?;

    Ok(links
        .into_iter()
        .filter_map(|link| {
            friends
                .iter()
                .find(|f| f.id == link.friend_id)
                .map(|f| (link.user_id, f.clone()))
        })
        .collect())
}

/// Friends of a single user, via the `user_friends` link.
pub async fn friends_of<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: &users::Model,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    user.find_linked(users::FriendsLink)
        .order_by_asc(users::Column::Id)
        .all(conn)
        .await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let user_active = users::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        password_hash: Set(dto.password_hash),
        age: Set(dto.age),
        is_active: Set(true),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    user_active.insert(conn).await
}

/// Apply a partial update. Returns `None` when the user does not exist.
pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: UserUpdate,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    let Some(user) = find_user_by_id(conn, user_id).await? else {
        return Ok(None);
    };
    if dto.is_empty() {
        return Ok(Some(user));
    }

    let mut active = user.into_active_model();
    if let Some(name) = dto.name {
        active.name = Set(name);
    }
    if let Some(age) = dto.age {
        active.age = Set(Some(age));
    }
    if let Some(is_active) = dto.is_active {
        active.is_active = Set(is_active);
    }
    active.update(conn).await.map(Some)
}

/// Returns the number of deleted rows (0 or 1).
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = users::Entity::delete_by_id(user_id).exec(conn).await?;
    Ok(res.rows_affected)
}

/// Insert both directions of the friendship in one statement; existing links are left as is.
///
/// Returns `true` when at least one direction was new.
pub async fn add_friend<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    friend_id: i64,
) -> Result<bool, sea_orm::DbErr> {
    let links = [(user_id, friend_id), (friend_id, user_id)].map(|(from, to)| {
        user_friends::ActiveModel {
            user_id: Set(from),
            friend_id: Set(to),
        }
    });

    let rows = user_friends::Entity::insert_many(links)
        .on_conflict(
            OnConflict::columns([user_friends::Column::UserId, user_friends::Column::FriendId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(rows > 0)
}

/// Delete both directions of the friendship in one statement.
pub async fn remove_friend<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    friend_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let forward = Condition::all()
        .add(user_friends::Column::UserId.eq(user_id))
        .add(user_friends::Column::FriendId.eq(friend_id));
    let backward = Condition::all()
        .add(user_friends::Column::UserId.eq(friend_id))
        .add(user_friends::Column::FriendId.eq(user_id));

    let res = user_friends::Entity::delete_many()
        .filter(Condition::any().add(forward).add(backward))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
