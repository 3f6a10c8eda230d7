//! Field rules applied before rows are written.
//!
//! Every check appends to a [`Violations`] list so a request reports all of
//! its problems at once instead of failing on the first.

use lazy_regex::regex_is_match;

use crate::errors::domain::DomainError;

pub const USER_NAME_MIN: usize = 3;
pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 30;
pub const DESCRIPTION_MIN: usize = 3;
pub const TAG_TYPE_MAX: usize = 10;
pub const DEFAULT_TAG_TYPE: &str = "Common";

#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&mut self, ok: bool, msg: impl FnOnce() -> String) {
        if !ok {
            self.0.push(msg());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation_many(self.0))
        }
    }

    pub fn user_name(&mut self, name: &str) -> &mut Self {
        self.check(name.chars().count() >= USER_NAME_MIN, || {
            format!("name must be at least {USER_NAME_MIN} characters")
        });
        self.check(
            regex_is_match!(r#"^[a-zA-Z0-9_ !@#$%^&*()\-+=\[\]{};:'",.<>?/\\|~]*$"#, name),
            || "name contains unsupported characters".to_string(),
        );
        self
    }

    pub fn password(&mut self, password: &str) -> &mut Self {
        self.check(!password.is_empty(), || "password must not be empty".to_string());
        self
    }

    pub fn age(&mut self, age: i32) -> &mut Self {
        self.check(age > 0, || "age must be positive".to_string());
        self
    }

    pub fn blog_title(&mut self, title: &str) -> &mut Self {
        let len = title.chars().count();
        self.check((TITLE_MIN..=TITLE_MAX).contains(&len), || {
            format!("title must be between {TITLE_MIN} and {TITLE_MAX} characters")
        });
        self
    }

    pub fn blog_description(&mut self, description: &str) -> &mut Self {
        self.check(description.chars().count() >= DESCRIPTION_MIN, || {
            format!("description must be at least {DESCRIPTION_MIN} characters")
        });
        self
    }

    pub fn episode(&mut self, episode: i32) -> &mut Self {
        self.check(episode > 0, || "episode must be positive".to_string());
        self
    }

    pub fn tag_name(&mut self, name: &str) -> &mut Self {
        self.check(regex_is_match!(r"^[a-zA-Z_ \-]+$", name), || {
            format!("tag name '{name}' may only contain letters, spaces, '_' and '-'")
        });
        self
    }

    pub fn tag_type(&mut self, tag_type: &str) -> &mut Self {
        self.check(
            tag_type.len() <= TAG_TYPE_MAX && regex_is_match!(r"^[a-zA-Z]+$", tag_type),
            || format!("type must be 1 to {TAG_TYPE_MAX} letters"),
        );
        self
    }
}
