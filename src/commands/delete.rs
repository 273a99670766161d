//! Delete a post

use anyhow::Result;

use crate::content::Post;
use crate::session::{DeleteOutcome, Session};
use crate::Pulse;

/// Delete the post with `id` if `confirm` accepts it
pub fn delete_post<F>(pulse: &Pulse, id: i64, confirm: F) -> Result<DeleteOutcome>
where
    F: FnOnce(&Post) -> bool,
{
    let mut store = pulse.open_store()?;
    let mut session = Session::start(&store);

    if session.view(&store, id).is_none() {
        anyhow::bail!("No post with id {}", id);
    }

    Ok(session.delete_current(&mut store, confirm)?)
}
