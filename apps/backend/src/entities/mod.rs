pub mod blogs;
pub mod tag_blogs;
pub mod tags;
pub mod user_friends;
pub mod users;

pub use blogs::Entity as Blogs;
pub use blogs::Model as Blog;
pub use tag_blogs::Entity as TagBlogs;
pub use tags::Entity as Tags;
pub use tags::Model as Tag;
pub use tags::TagCategory;
pub use user_friends::Entity as UserFriends;
pub use users::Entity as Users;
pub use users::Model as User;
