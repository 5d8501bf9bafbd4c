// src/ports/html.rs
use crate::domain::TagSet;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::instrument;

/// Renders tags as a standalone HTML document for rich-text paste targets.
#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    fn render_tag(&self, tag: &str, url: Option<&str>) -> String {
        let text = encode_text(tag);
        match url {
            Some(url) => format!(
                r#"<a href="{}" class="tag">{}</a>"#,
                encode_double_quoted_attribute(url),
                text
            ),
            None => format!(r#"<span class="tag">{text}</span>"#),
        }
    }

    #[instrument(level = "debug", skip(self, set))]
    pub fn render(&self, set: &TagSet, tags: &[String]) -> String {
        let body = tags
            .iter()
            .map(|tag| format!("    {}", self.render_tag(tag, set.link(tag))))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Tags</title>
    <style>
        body {{
            font-family: Arial, sans-serif;
            line-height: 1.8;
            margin: 0;
            padding: 10px;
        }}
        a, span {{
            display: block;
            padding: 4px 0;
            color: #2563eb;
            text-decoration: none;
        }}
        a:hover {{
            text-decoration: underline;
        }}
        .tag {{
            white-space: nowrap;
        }}
    </style>
</head>
<body>
{body}
</body>
</html>"#
        )
    }
}
