//! Content module - posts, drafts, queries and the post store

mod clock;
mod post;
mod query;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use post::{join_tags, parse_tags, Draft, Post};
pub use query::PostQuery;
pub use store::{load_all, LoadStatus, Loaded, PostStore, StoreError, ValidationError};
