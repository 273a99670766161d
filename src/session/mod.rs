//! Session state - what the reader is looking at
//!
//! Tracks the screen, the open post, the search text and the active tag for
//! one notebook window. It holds ids only and goes back to the
//! [`PostStore`] for every read and write.

use crate::content::{Draft, Post, PostQuery, PostStore, StoreError};
use crate::storage::KeyValueStore;

/// Visible panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Shown when there is nothing to view
    Welcome,
    /// Reading a post
    View,
    /// Editing a new or existing post
    Edit,
}

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user did not confirm; nothing changed
    Declined,
    /// No post is open
    NothingSelected,
}

/// View state of one notebook window
#[derive(Debug, Clone)]
pub struct Session {
    screen: Screen,
    current: Option<i64>,
    search: String,
    selected_tag: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session on the welcome screen
    pub fn new() -> Self {
        Self {
            screen: Screen::Welcome,
            current: None,
            search: String::new(),
            selected_tag: None,
        }
    }

    /// Session for an opened store
    pub fn start<S: KeyValueStore>(store: &PostStore<S>) -> Self {
        let mut session = Self::new();
        session.refresh(store);
        session
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn current_id(&self) -> Option<i64> {
        self.current
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selected_tag(&self) -> Option<&str> {
        self.selected_tag.as_deref()
    }

    /// Whether `post` is the open post
    pub fn is_active(&self, post: &Post) -> bool {
        self.current == Some(post.id)
    }

    /// Update the search text
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Select `tag`, or clear the selection if it is already selected
    pub fn toggle_tag(&mut self, tag: &str) -> Option<&str> {
        if self.selected_tag.as_deref() == Some(tag) {
            self.selected_tag = None;
        } else {
            self.selected_tag = Some(tag.to_string());
        }
        self.selected_tag.as_deref()
    }

    /// Query for the current search text and tag
    pub fn query(&self) -> PostQuery {
        PostQuery {
            search: Some(self.search.clone()).filter(|s| !s.is_empty()),
            tag: self.selected_tag.clone(),
        }
    }

    /// Posts to list in the sidebar
    pub fn visible_posts<'a, S: KeyValueStore>(&self, store: &'a PostStore<S>) -> Vec<&'a Post> {
        store.filter(&self.query())
    }

    /// Open the editor on an empty draft
    pub fn new_post(&mut self) -> Draft {
        self.current = None;
        self.screen = Screen::Edit;
        Draft::default()
    }

    /// Open the editor on an existing post
    pub fn edit<S: KeyValueStore>(&mut self, store: &PostStore<S>, id: i64) -> Option<Draft> {
        let post = store.find(id)?;
        self.current = Some(post.id);
        self.screen = Screen::Edit;
        Some(Draft::from_post(post))
    }

    /// Open a post for reading
    pub fn view<'a, S: KeyValueStore>(
        &mut self,
        store: &'a PostStore<S>,
        id: i64,
    ) -> Option<&'a Post> {
        let post = store.find(id)?;
        self.current = Some(post.id);
        self.screen = Screen::View;
        Some(post)
    }

    /// Leave the editor without saving
    pub fn cancel_edit<S: KeyValueStore>(&mut self, store: &PostStore<S>) {
        match self.current.filter(|id| store.find(*id).is_some()) {
            Some(_) => self.screen = Screen::View,
            None => {
                self.current = None;
                self.screen = Screen::Welcome;
            }
        }
    }

    /// Save the editor contents
    ///
    /// The draft targets the open post, if any. On success the saved post is
    /// opened for reading; on failure the editor stays open.
    pub fn save<S: KeyValueStore>(
        &mut self,
        store: &mut PostStore<S>,
        mut draft: Draft,
    ) -> Result<Post, StoreError> {
        draft.id = self.current;
        let post = store.save(draft)?;
        self.current = Some(post.id);
        self.screen = Screen::View;
        Ok(post)
    }

    /// Delete the open post once `confirm` agrees
    pub fn delete_current<S, F>(
        &mut self,
        store: &mut PostStore<S>,
        confirm: F,
    ) -> Result<DeleteOutcome, StoreError>
    where
        S: KeyValueStore,
        F: FnOnce(&Post) -> bool,
    {
        let Some(post) = self.current.and_then(|id| store.find(id)) else {
            return Ok(DeleteOutcome::NothingSelected);
        };
        if !confirm(post) {
            return Ok(DeleteOutcome::Declined);
        }

        let id = post.id;
        store.delete(id)?;
        self.current = None;
        self.screen = Screen::Welcome;
        Ok(DeleteOutcome::Deleted)
    }

    /// Re-check the screen against the store
    pub fn refresh<S: KeyValueStore>(&mut self, store: &PostStore<S>) {
        if store.is_empty() {
            self.current = None;
            self.screen = Screen::Welcome;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn store() -> PostStore<MemoryStore> {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
        PostStore::with_clock(MemoryStore::new(), clock)
    }

    #[test]
    fn test_empty_store_shows_welcome() {
        let store = store();
        let session = Session::start(&store);
        assert_eq!(session.screen(), Screen::Welcome);
    }

    #[test]
    fn test_toggle_tag() {
        let mut session = Session::new();
        assert_eq!(session.toggle_tag("rust"), Some("rust"));
        assert_eq!(session.toggle_tag("web"), Some("web"));
        assert_eq!(session.toggle_tag("web"), None);
        assert_eq!(session.selected_tag(), None);
    }

    #[test]
    fn test_new_save_edit_flow() {
        let mut store = store();
        let mut session = Session::start(&store);

        let mut draft = session.new_post();
        assert_eq!(session.screen(), Screen::Edit);
        draft.title = "First".to_string();
        draft.content = "Hello".to_string();
        let post = session.save(&mut store, draft).unwrap();
        assert_eq!(session.screen(), Screen::View);
        assert!(session.is_active(&post));

        let mut draft = session.edit(&store, post.id).unwrap();
        draft.content = "Hello again".to_string();
        let updated = session.save(&mut store, draft).unwrap();
        assert_eq!(updated.id, post.id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_save_stays_in_editor() {
        let mut store = store();
        let mut session = Session::start(&store);
        let draft = session.new_post();
        assert!(session.save(&mut store, draft).is_err());
        assert_eq!(session.screen(), Screen::Edit);
        assert!(store.is_empty());
    }

    #[test]
    fn test_cancel_edit() {
        let mut store = store();
        let mut session = Session::start(&store);

        session.new_post();
        session.cancel_edit(&store);
        assert_eq!(session.screen(), Screen::Welcome);

        let post = store.save(Draft::new("t", "c")).unwrap();
        session.edit(&store, post.id).unwrap();
        session.cancel_edit(&store);
        assert_eq!(session.screen(), Screen::View);
        assert_eq!(session.current_id(), Some(post.id));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut store = store();
        let post = store.save(Draft::new("t", "c")).unwrap();
        let mut session = Session::start(&store);

        assert_eq!(
            session.delete_current(&mut store, |_| true).unwrap(),
            DeleteOutcome::NothingSelected
        );

        session.view(&store, post.id).unwrap();
        assert_eq!(
            session.delete_current(&mut store, |_| false).unwrap(),
            DeleteOutcome::Declined
        );
        assert_eq!(store.len(), 1);
        assert_eq!(session.screen(), Screen::View);

        assert_eq!(
            session.delete_current(&mut store, |p| p.title == "t").unwrap(),
            DeleteOutcome::Deleted
        );
        assert!(store.is_empty());
        assert_eq!(session.screen(), Screen::Welcome);
        assert_eq!(session.current_id(), None);
    }

    #[test]
    fn test_visible_posts_use_search_and_tag() {
        let mut store = store();
        store
            .save(Draft::new("Rust", "ownership").with_tags(["lang"]))
            .unwrap();
        store
            .save(Draft::new("Soup", "rust-free").with_tags(["food"]))
            .unwrap();

        let mut session = Session::start(&store);
        assert_eq!(session.visible_posts(&store).len(), 2);

        session.set_search("RUST");
        assert_eq!(session.visible_posts(&store).len(), 2);

        session.toggle_tag("lang");
        let visible = session.visible_posts(&store);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Rust");

        session.set_search("");
        session.toggle_tag("lang");
        assert_eq!(session.query(), PostQuery::new());
    }
}
