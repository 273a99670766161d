//! Post and draft models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored markdown post
///
/// Field names serialize in camelCase, matching the layout written by the
/// browser version of the notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique id, derived from the creation time in milliseconds
    pub id: i64,

    /// Post title
    pub title: String,

    /// Raw markdown content
    pub content: String,

    /// Post tags, in the order they were entered
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation time, never changes after the first save
    pub created_at: DateTime<Utc>,

    /// Time of the most recent save
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether the post carries `tag` (exact, case-sensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Unvalidated input to [`PostStore::save`](super::PostStore::save)
///
/// A draft without an `id`, or with an id no stored post has, creates a new
/// post. A draft whose id matches a stored post updates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl Draft {
    /// Draft for a new post
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    /// Draft pre-filled from an existing post, for editing
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: Some(post.id),
            title: post.title.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
        }
    }

    /// Set the tags
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Target an existing post id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Parse a comma-separated tag field
///
/// # Examples
/// ```
/// use markdown_pulse::content::parse_tags;
/// assert_eq!(parse_tags("rust, notes,, web "), vec!["rust", "notes", "web"]);
/// ```
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags back into the editable comma-separated form
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
