//! Edit an existing post

use anyhow::Result;

use crate::content::{parse_tags, Post};
use crate::session::Session;
use crate::Pulse;

/// Fields to change; `None` keeps the current value
#[derive(Debug, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub tags: Option<String>,
    pub content: Option<String>,
}

/// Apply `changes` to the post with `id`
pub fn edit_post(pulse: &Pulse, id: i64, changes: PostChanges) -> Result<Post> {
    let mut store = pulse.open_store()?;
    let mut session = Session::start(&store);

    let Some(mut draft) = session.edit(&store, id) else {
        anyhow::bail!("No post with id {}", id);
    };
    if let Some(title) = changes.title {
        draft.title = title;
    }
    if let Some(tags) = changes.tags {
        draft.tags = parse_tags(&tags);
    }
    if let Some(content) = changes.content {
        draft.content = content;
    }

    Ok(session.save(&mut store, draft)?)
}
