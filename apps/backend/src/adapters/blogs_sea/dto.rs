//! DTOs for blogs_sea adapter.

#[derive(Debug, Clone)]
pub struct BlogCreate {
    pub title: String,
    pub description: String,
    pub episode: Option<i32>,
    pub user_id: Option<i64>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub episode: Option<i32>,
    /// `Some(None)` detaches the blog from its owner.
    pub user_id: Option<Option<i64>>,
}

impl BlogUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.episode.is_none()
            && self.user_id.is_none()
    }
}
