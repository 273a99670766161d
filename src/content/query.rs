//! Search and tag filtering

use super::Post;

/// Filter over the post collection
///
/// Both predicates are optional and combine with AND. An empty query
/// matches every post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Case-insensitive substring of the title or content
    pub search: Option<String>,
    /// Exact tag
    pub tag: Option<String>,
}

impl PostQuery {
    /// Query matching everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to posts containing `text`
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Restrict to posts tagged `tag`
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether `post` satisfies the query
    pub fn matches(&self, post: &Post) -> bool {
        self.matches_search(post) && self.matches_tag(post)
    }

    fn matches_search(&self, post: &Post) -> bool {
        match self.search.as_deref() {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
            }
        }
    }

    fn matches_tag(&self, post: &Post) -> bool {
        match self.tag.as_deref() {
            None => true,
            Some(tag) => post.has_tag(tag),
        }
    }
}
