//! Post store - the authoritative post collection
//!
//! The store keeps every post in memory and mirrors the whole collection to
//! the key-value backend after each mutation. When a write fails the
//! mutation is undone, so memory and storage never drift apart.

use std::collections::BTreeSet;
use thiserror::Error;

use super::clock::{Clock, SystemClock};
use super::{Draft, Post, PostQuery};
use crate::storage::{KeyValueStore, StorageError, POSTS_KEY};

/// Rejected draft
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide a title")]
    EmptyTitle,

    #[error("Please provide some content")]
    EmptyContent,
}

/// Post store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to persist posts: {0}")]
    Persistence(#[from] StorageError),

    #[error("Failed to encode posts: {0}")]
    Encode(#[from] serde_json::Error),
}

/// How the stored collection was found at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing stored yet
    Empty,
    /// Stored collection parsed, with this many posts
    Loaded(usize),
    /// Stored data could not be read or parsed and was ignored
    Corrupt(String),
}

/// Result of reading the stored collection
#[derive(Debug, Clone)]
pub struct Loaded {
    pub posts: Vec<Post>,
    pub status: LoadStatus,
}

/// Read the persisted collection
///
/// Missing, unreadable or unparsable data yields an empty collection. The
/// last two cases are reported in the status and logged, never returned as
/// errors.
pub fn load_all<S: KeyValueStore + ?Sized>(backend: &S) -> Loaded {
    let raw = match backend.get(POSTS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No stored posts found, starting fresh");
            return Loaded {
                posts: Vec::new(),
                status: LoadStatus::Empty,
            };
        }
        Err(e) => return corrupt(e.to_string()),
    };

    match serde_json::from_str::<Vec<Post>>(&raw) {
        Ok(posts) => {
            tracing::info!("Loaded {} posts", posts.len());
            let status = LoadStatus::Loaded(posts.len());
            Loaded { posts, status }
        }
        Err(e) => corrupt(e.to_string()),
    }
}

fn corrupt(message: String) -> Loaded {
    tracing::warn!(
        "Stored posts are unreadable, starting with an empty collection: {}",
        message
    );
    Loaded {
        posts: Vec::new(),
        status: LoadStatus::Corrupt(message),
    }
}

/// Owner of the post collection
pub struct PostStore<S: KeyValueStore> {
    backend: S,
    posts: Vec<Post>,
    clock: Box<dyn Clock>,
    load_status: LoadStatus,
}

impl<S: KeyValueStore> PostStore<S> {
    /// Open the store over `backend`, loading whatever it holds
    pub fn open(backend: S) -> Self {
        Self::with_clock(backend, SystemClock)
    }

    /// Open the store with a custom time source
    pub fn with_clock<C: Clock + 'static>(backend: S, clock: C) -> Self {
        let Loaded { posts, status } = load_all(&backend);
        Self {
            backend,
            posts,
            clock: Box::new(clock),
            load_status: status,
        }
    }

    /// How the collection was found when the store was opened
    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// All posts, newest-created first
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Number of posts
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether there are no posts
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// The persistence backend
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Mutable access to the backend, for settings stored beside the posts
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Create or update a post from a draft
    pub fn save(&mut self, draft: Draft) -> Result<Post, StoreError> {
        let title = draft.title.trim();
        let content = draft.content.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if content.is_empty() {
            return Err(ValidationError::EmptyContent.into());
        }

        let tags: Vec<String> = draft
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let now = self.clock.now();

        match draft.id.and_then(|id| self.position(id)) {
            Some(index) => {
                let existing = &self.posts[index];
                let post = Post {
                    id: existing.id,
                    title: title.to_string(),
                    content: content.to_string(),
                    tags,
                    created_at: existing.created_at,
                    // a clock that went backwards must not make updatedAt decrease
                    updated_at: now.max(existing.updated_at).max(existing.created_at),
                };

                let previous = std::mem::replace(&mut self.posts[index], post.clone());
                if let Err(e) = self.persist() {
                    self.posts[index] = previous;
                    return Err(e);
                }
                tracing::info!("Updated post {} ({})", post.id, post.title);
                Ok(post)
            }
            None => {
                let post = Post {
                    id: self.fresh_id(now.timestamp_millis()),
                    title: title.to_string(),
                    content: content.to_string(),
                    tags,
                    created_at: now,
                    updated_at: now,
                };

                self.posts.insert(0, post.clone());
                if let Err(e) = self.persist() {
                    self.posts.remove(0);
                    return Err(e);
                }
                tracing::info!("Created post {} ({})", post.id, post.title);
                Ok(post)
            }
        }
    }

    /// Delete a post, returning whether one was removed
    pub fn delete(&mut self, id: i64) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.posts.remove(index);
        if let Err(e) = self.persist() {
            self.posts.insert(index, removed);
            return Err(e);
        }
        tracing::info!("Deleted post {} ({})", removed.id, removed.title);
        Ok(true)
    }

    /// Look up a post by id
    pub fn find(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Posts matching `query`, in collection order
    pub fn filter(&self, query: &PostQuery) -> Vec<&Post> {
        self.posts.iter().filter(|p| query.matches(p)).collect()
    }

    /// Distinct tags across all posts, sorted ascending
    pub fn all_tags(&self) -> Vec<String> {
        self.posts
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }

    /// First id at or after `candidate` that no post uses
    fn fresh_id(&self, candidate: i64) -> i64 {
        let mut id = candidate;
        while self.position(id).is_some() {
            id += 1;
        }
        id
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.posts)?;
        self.backend.set(POSTS_KEY, &json)?;
        tracing::debug!("Persisted {} posts ({} bytes)", self.posts.len(), json.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
    }

    fn store() -> (PostStore<MemoryStore>, ManualClock) {
        let clock = clock();
        (PostStore::with_clock(MemoryStore::new(), clock.clone()), clock)
    }

    fn stored_posts(store: &PostStore<MemoryStore>) -> Option<String> {
        store.backend().get(POSTS_KEY).unwrap()
    }

    #[test]
    fn test_save_then_find() {
        let (mut store, _) = store();
        let saved = store
            .save(Draft::new("  Hello  ", "\n# Body\n").with_tags(["a", "b"]))
            .unwrap();

        let found = store.find(saved.id).unwrap();
        assert_eq!(found.title, "Hello");
        assert_eq!(found.content, "# Body");
        assert_eq!(found.tags, vec!["a", "b"]);
        assert_eq!(found.created_at, found.updated_at);
        assert_eq!(found.id, found.created_at.timestamp_millis());
    }

    #[test]
    fn test_empty_title_or_content_is_rejected() {
        let (mut store, _) = store();
        store.save(Draft::new("Keep", "me")).unwrap();
        let before = stored_posts(&store);
        let writes = store.backend().writes();

        let err = store.save(Draft::new("   ", "content")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyTitle)));

        let err = store.save(Draft::new("title", " \n\t")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyContent)));

        assert_eq!(store.len(), 1);
        assert_eq!(stored_posts(&store), before);
        assert_eq!(store.backend().writes(), writes);
    }

    #[test]
    fn test_new_posts_are_prepended_and_updates_keep_order() {
        let (mut store, clock) = store();
        let first = store.save(Draft::new("first", "1")).unwrap();
        clock.advance_millis(10);
        let second = store.save(Draft::new("second", "2")).unwrap();

        let ids: Vec<_> = store.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        clock.advance_millis(10);
        store
            .save(Draft::from_post(&first).with_tags(["edited"]))
            .unwrap();
        let ids: Vec<_> = store.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_update_preserves_created_at() {
        let (mut store, clock) = store();
        let post = store.save(Draft::new("t", "c")).unwrap();

        clock.advance_millis(5_000);
        let updated = store
            .save(Draft::new("t2", "c2").with_id(post.id))
            .unwrap();
        assert_eq!(updated.id, post.id);
        assert_eq!(updated.created_at, post.created_at);
        assert!(updated.updated_at > post.updated_at);

        // Clock going backwards never lowers updatedAt
        clock.advance_millis(-60_000);
        let again = store
            .save(Draft::new("t3", "c3").with_id(post.id))
            .unwrap();
        assert_eq!(again.created_at, post.created_at);
        assert_eq!(again.updated_at, updated.updated_at);
        assert!(again.created_at <= again.updated_at);
    }

    #[test]
    fn test_unknown_id_creates_new_post() {
        let (mut store, _) = store();
        let post = store.save(Draft::new("t", "c").with_id(42)).unwrap();
        assert_ne!(post.id, 42);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ids_stay_unique_within_one_millisecond() {
        let (mut store, _) = store();
        let a = store.save(Draft::new("a", "a")).unwrap();
        let b = store.save(Draft::new("b", "b")).unwrap();
        let c = store.save(Draft::new("c", "c")).unwrap();
        assert_eq!(b.id, a.id + 1);
        assert_eq!(c.id, a.id + 2);
    }

    #[test]
    fn test_tags_are_trimmed_but_not_deduplicated() {
        let (mut store, _) = store();
        let post = store
            .save(Draft::new("t", "c").with_tags([" x ", "", "x", "y"]))
            .unwrap();
        assert_eq!(post.tags, vec!["x", "x", "y"]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut store, clock) = store();
        let a = store.save(Draft::new("a", "a")).unwrap();
        clock.advance_millis(1);
        let b = store.save(Draft::new("b", "b")).unwrap();

        assert!(store.delete(a.id).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.posts()[0].id, b.id);

        let writes = store.backend().writes();
        assert!(!store.delete(a.id).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend().writes(), writes);
    }

    #[test]
    fn test_filter() {
        let (mut store, clock) = store();
        store
            .save(Draft::new("Rust ownership", "borrowing").with_tags(["rust"]))
            .unwrap();
        clock.advance_millis(1);
        store
            .save(Draft::new("Cooking", "Rust-colored pans").with_tags(["food"]))
            .unwrap();
        clock.advance_millis(1);
        store
            .save(Draft::new("Async", "tokio tasks").with_tags(["rust"]))
            .unwrap();

        let titles = |posts: Vec<&Post>| posts.iter().map(|p| p.title.clone()).collect::<Vec<_>>();

        assert_eq!(
            titles(store.filter(&PostQuery::new())),
            vec!["Async", "Cooking", "Rust ownership"]
        );
        assert_eq!(
            titles(store.filter(&PostQuery::new().search("RUST"))),
            vec!["Cooking", "Rust ownership"]
        );
        assert_eq!(
            titles(store.filter(&PostQuery::new().tag("rust"))),
            vec!["Async", "Rust ownership"]
        );
        assert_eq!(
            titles(store.filter(&PostQuery::new().search("rust").tag("rust"))),
            vec!["Rust ownership"]
        );
    }

    #[test]
    fn test_all_tags_sorted_and_distinct() {
        let (mut store, clock) = store();
        store.save(Draft::new("1", "1").with_tags(["b"])).unwrap();
        clock.advance_millis(1);
        store.save(Draft::new("2", "2").with_tags(["a", "b"])).unwrap();
        assert_eq!(store.all_tags(), vec!["a", "b"]);
    }

    #[test]
    fn test_reload_reflects_final_state() {
        let (mut store, clock) = store();
        let a = store.save(Draft::new("a", "a").with_tags(["x"])).unwrap();
        clock.advance_millis(1);
        let b = store.save(Draft::new("b", "b")).unwrap();
        clock.advance_millis(1);
        store.save(Draft::new("c", "c")).unwrap();
        clock.advance_millis(1);
        store.save(Draft::new("a2", "a2").with_id(a.id)).unwrap();
        store.delete(b.id).unwrap();

        let loaded = load_all(store.backend());
        assert_eq!(loaded.status, LoadStatus::Loaded(2));
        assert_eq!(loaded.posts, store.posts());

        let reopened = PostStore::open(store.backend().clone());
        assert_eq!(reopened.posts(), store.posts());
    }

    #[test]
    fn test_missing_and_corrupt_data_load_empty() {
        let empty = PostStore::open(MemoryStore::new());
        assert!(empty.is_empty());
        assert_eq!(empty.load_status(), &LoadStatus::Empty);

        let corrupt = PostStore::open(MemoryStore::new().seed(POSTS_KEY, "{oops"));
        assert!(corrupt.is_empty());
        assert!(matches!(corrupt.load_status(), LoadStatus::Corrupt(_)));
    }

    #[test]
    fn test_write_failure_rolls_back() {
        let (mut store, clock) = store();
        let kept = store.save(Draft::new("kept", "small")).unwrap();
        let before = stored_posts(&store);
        store.backend_mut().set_quota(Some(before.as_ref().unwrap().len() + 20));

        clock.advance_millis(1);
        let err = store
            .save(Draft::new("big", "x".repeat(500)))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Persistence(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(store.posts().len(), 1);

        let err = store
            .save(Draft::new("kept", "y".repeat(500)).with_id(kept.id))
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(store.find(kept.id).unwrap().content, "small");
        assert_eq!(stored_posts(&store), before);
    }

    #[test]
    fn test_delete_failure_restores_post() {
        let (mut store, clock) = store();
        let a = store.save(Draft::new("a", "a")).unwrap();
        clock.advance_millis(1);
        store.save(Draft::new("b", "b")).unwrap();
        store.backend_mut().set_quota(Some(0));

        assert!(store.delete(a.id).is_err());
        assert_eq!(store.len(), 2);
        assert_eq!(store.posts()[1].id, a.id);
    }
}
