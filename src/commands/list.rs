//! List posts and tags

use anyhow::Result;

use crate::helpers::format_date;
use crate::session::Session;
use crate::Pulse;

/// Shown instead of a listing when the notebook is empty
pub const WELCOME: &str =
    "Welcome! No posts yet. Create one with: markdown-pulse new --title \"My first post\" --file post.md";

/// Listing lines for the posts matching `search` and `tag`
pub fn post_lines(pulse: &Pulse, search: Option<&str>, tag: Option<&str>) -> Result<Vec<String>> {
    let store = pulse.open_store()?;
    if store.is_empty() {
        return Ok(vec![WELCOME.to_string()]);
    }

    let mut session = Session::start(&store);
    if let Some(search) = search {
        session.set_search(search);
    }
    if let Some(tag) = tag {
        session.toggle_tag(tag);
    }

    let posts = session.visible_posts(&store);
    if posts.is_empty() {
        return Ok(vec!["No posts found".to_string()]);
    }

    let pipeline = pulse.pipeline();
    let mut lines = vec![format!("Posts ({}):", posts.len())];
    for post in posts {
        let tags = if post.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", post.tags.join(", "))
        };
        lines.push(format!(
            "  {} {} - {}{}",
            post.id,
            format_date(&post.created_at, &pulse.config.date_format),
            post.title,
            tags
        ));
        let excerpt = pipeline.excerpt(&post.content, pulse.config.excerpt_length);
        if !excerpt.is_empty() {
            lines.push(format!("      {}", excerpt));
        }
    }
    Ok(lines)
}

/// Listing lines for all tags with their post counts
pub fn tag_lines(pulse: &Pulse) -> Result<Vec<String>> {
    let store = pulse.open_store()?;
    let tags = store.all_tags();

    let mut lines = vec![format!("Tags ({}):", tags.len())];
    for tag in tags {
        let count = store.posts().iter().filter(|p| p.has_tag(&tag)).count();
        lines.push(format!("  {} ({})", tag, count));
    }
    Ok(lines)
}

/// List posts
pub fn run(pulse: &Pulse, search: Option<&str>, tag: Option<&str>) -> Result<()> {
    for line in post_lines(pulse, search, tag)? {
        println!("{}", line);
    }
    Ok(())
}

/// List tags
pub fn run_tags(pulse: &Pulse) -> Result<()> {
    for line in tag_lines(pulse)? {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new::create_post;
    use tempfile::TempDir;

    #[test]
    fn test_empty_notebook_shows_welcome() {
        let dir = TempDir::new().unwrap();
        let pulse = Pulse::new(dir.path()).unwrap();
        assert_eq!(post_lines(&pulse, None, None).unwrap(), vec![WELCOME.to_string()]);
    }

    #[test]
    fn test_filtered_listing() {
        let dir = TempDir::new().unwrap();
        let pulse = Pulse::new(dir.path()).unwrap();
        create_post(&pulse, "Rust notes", Some("rust"), "About **ownership**").unwrap();
        create_post(&pulse, "Groceries", Some("home"), "Milk & eggs").unwrap();

        let lines = post_lines(&pulse, None, None).unwrap();
        assert_eq!(lines[0], "Posts (2):");
        assert!(lines[1].contains("Groceries [home]"));
        assert_eq!(lines[2], "      Milk & eggs");

        let lines = post_lines(&pulse, Some("OWNERSHIP"), None).unwrap();
        assert_eq!(lines[0], "Posts (1):");
        assert!(lines[1].contains("Rust notes"));

        let lines = post_lines(&pulse, Some("milk"), Some("rust")).unwrap();
        assert_eq!(lines, vec!["No posts found".to_string()]);
    }

    #[test]
    fn test_tag_lines() {
        let dir = TempDir::new().unwrap();
        let pulse = Pulse::new(dir.path()).unwrap();
        create_post(&pulse, "One", Some("b"), "1").unwrap();
        create_post(&pulse, "Two", Some("a, b"), "2").unwrap();

        assert_eq!(
            tag_lines(&pulse).unwrap(),
            vec!["Tags (2):", "  a (1)", "  b (2)"]
        );
    }
}
