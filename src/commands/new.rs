//! Create a new post

use anyhow::Result;

use crate::content::{parse_tags, Post};
use crate::session::Session;
use crate::Pulse;

/// Create a post from a title, a comma-separated tag field and markdown
pub fn create_post(pulse: &Pulse, title: &str, tags: Option<&str>, content: &str) -> Result<Post> {
    let mut store = pulse.open_store()?;
    let mut session = Session::start(&store);

    let mut draft = session.new_post();
    draft.title = title.to_string();
    draft.content = content.to_string();
    draft.tags = tags.map(parse_tags).unwrap_or_default();

    Ok(session.save(&mut store, draft)?)
}
