// src/ports/text.rs
use crate::domain::TagSet;

/// One tag per line.
pub fn render_plain(tags: &[String]) -> String {
    tags.join("\n")
}

/// Tag followed by its link on the next line; entries separated by a blank line.
pub fn render_messaging(set: &TagSet, tags: &[String]) -> String {
    tags.iter()
        .map(|tag| match set.link(tag) {
            Some(url) => format!("{tag}\n{url}"),
            None => tag.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_tags_when_rendering_plain_then_joins_with_newline() {
        let tags = vec!["A".to_string(), "B".to_string()];

        assert_eq!(render_plain(&tags), "A\nB");
    }

    #[test]
    fn given_partially_linked_tags_when_rendering_messaging_then_link_follows_tag() {
        // Arrange
        let mut set = TagSet::from_tags(["A", "B"]);
        set.set_link("A", "https://a.example").unwrap();

        // Act
        let text = render_messaging(&set, set.tags());

        // Assert
        assert_eq!(text, "A\nhttps://a.example\n\nB");
    }
}
