// src/application/exporter.rs
use crate::domain::{CopyOutcome, DomainError, ExportFormat, ExportScope, TagSet};
use crate::ports::text::{render_messaging, render_plain};
use crate::ports::HtmlPresenter;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Clipboard backend, tried in order by the rich export.
pub trait ClipboardSink {
    /// Structured write carrying both the plain and the HTML flavour.
    fn write_rich(&mut self, plain: &str, html: &str) -> Result<()>;
    /// Legacy HTML-only write through whatever the platform offers.
    fn write_legacy_html(&mut self, html: &str) -> Result<()>;
    fn write_plain(&mut self, plain: &str) -> Result<()>;
}

/// Rendered payload for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub format: ExportFormat,
    pub count: usize,
    pub plain: String,
    pub html: Option<String>,
}

impl ExportPayload {
    /// Text a user would paste: HTML for rich exports, the plain text otherwise.
    pub fn primary(&self) -> &str {
        self.html.as_deref().unwrap_or(&self.plain)
    }
}

#[derive(Debug, Default)]
pub struct TagExporter {
    presenter: HtmlPresenter,
}

impl TagExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &self,
        set: &TagSet,
        format: ExportFormat,
        scope: ExportScope,
    ) -> Result<ExportPayload, DomainError> {
        let tags = match scope {
            ExportScope::All => set.tags().to_vec(),
            ExportScope::Selected => set.selected_tags(),
        };
        if tags.is_empty() {
            return Err(DomainError::NothingToExport);
        }

        let payload = match format {
            ExportFormat::Plain => ExportPayload {
                format,
                count: tags.len(),
                plain: render_plain(&tags),
                html: None,
            },
            ExportFormat::Messaging => ExportPayload {
                format,
                count: tags.len(),
                plain: render_messaging(set, &tags),
                html: None,
            },
            ExportFormat::Rich => ExportPayload {
                format,
                count: tags.len(),
                plain: render_plain(&tags),
                html: Some(self.presenter.render(set, &tags)),
            },
        };
        debug!(format = %format, count = payload.count, "Rendered export");
        Ok(payload)
    }

    /// Put `payload` on the clipboard, falling back rich → legacy HTML → plain.
    pub fn copy<C: ClipboardSink>(
        &self,
        clipboard: &mut C,
        payload: &ExportPayload,
    ) -> Result<CopyOutcome, DomainError> {
        let Some(html) = payload.html.as_deref() else {
            clipboard
                .write_plain(&payload.plain)
                .map_err(|e| DomainError::Clipboard(format!("{e:#}")))?;
            return Ok(CopyOutcome::PlainText);
        };

        match clipboard.write_rich(&payload.plain, html) {
            Ok(()) => {
                info!("Copied rich payload");
                return Ok(CopyOutcome::Rich);
            }
            Err(e) => warn!(error = %e, "Structured clipboard write failed, trying legacy copy"),
        }
        match clipboard.write_legacy_html(html) {
            Ok(()) => {
                info!("Copied HTML via legacy path");
                return Ok(CopyOutcome::LegacyHtml);
            }
            Err(e) => warn!(error = %e, "Legacy HTML copy failed, falling back to plain text"),
        }
        clipboard
            .write_plain(&payload.plain)
            .map_err(|e| DomainError::Clipboard(format!("{e:#}")))?;
        Ok(CopyOutcome::PlainText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::RecordingClipboard;

    fn set() -> TagSet {
        let mut set = TagSet::from_tags(["A", "B", "C"]);
        set.set_link("B", "https://b.example").unwrap();
        set
    }

    #[test]
    fn given_plain_format_when_rendering_all_then_newline_joined() {
        let payload = TagExporter::new()
            .render(&TagSet::from_tags(["A", "B"]), ExportFormat::Plain, ExportScope::All)
            .unwrap();

        assert_eq!(payload.plain, "A\nB");
        assert_eq!(payload.html, None);
    }

    #[test]
    fn given_selection_when_rendering_selected_then_only_selected_in_order() {
        let mut set = set();
        set.select("C").unwrap();
        set.select("B").unwrap();

        let payload = TagExporter::new()
            .render(&set, ExportFormat::Messaging, ExportScope::Selected)
            .unwrap();

        assert_eq!(payload.plain, "B\nhttps://b.example\n\nC");
        assert_eq!(payload.count, 2);
    }

    #[test]
    fn given_empty_selection_when_rendering_selected_then_nothing_to_export() {
        let result = TagExporter::new().render(&set(), ExportFormat::Plain, ExportScope::Selected);

        assert!(matches!(result, Err(DomainError::NothingToExport)));
    }

    #[test]
    fn given_working_clipboard_when_copying_rich_then_dual_payload() {
        // Arrange
        let exporter = TagExporter::new();
        let payload = exporter.render(&set(), ExportFormat::Rich, ExportScope::All).unwrap();
        let mut clipboard = RecordingClipboard::default();

        // Act
        let outcome = exporter.copy(&mut clipboard, &payload).unwrap();

        // Assert
        assert_eq!(outcome, CopyOutcome::Rich);
        assert_eq!(clipboard.plain.as_deref(), Some("A\nB\nC"));
        assert!(clipboard.html.as_deref().unwrap().contains(r#"<a href="https://b.example""#));
    }

    #[test]
    fn given_rich_write_unsupported_when_copying_then_uses_legacy() {
        let exporter = TagExporter::new();
        let payload = exporter.render(&set(), ExportFormat::Rich, ExportScope::All).unwrap();
        let mut clipboard = RecordingClipboard {
            fail_rich: true,
            ..Default::default()
        };

        let outcome = exporter.copy(&mut clipboard, &payload).unwrap();

        assert_eq!(outcome, CopyOutcome::LegacyHtml);
        assert!(clipboard.html.is_some());
    }

    #[test]
    fn given_only_plain_available_when_copying_rich_then_reports_plain_fallback() {
        let exporter = TagExporter::new();
        let payload = exporter.render(&set(), ExportFormat::Rich, ExportScope::All).unwrap();
        let mut clipboard = RecordingClipboard {
            fail_rich: true,
            fail_legacy: true,
            ..Default::default()
        };

        let outcome = exporter.copy(&mut clipboard, &payload).unwrap();

        assert_eq!(outcome, CopyOutcome::PlainText);
        assert_eq!(clipboard.plain.as_deref(), Some("A\nB\nC"));
        assert_eq!(clipboard.html, None);
    }

    #[test]
    fn given_dead_clipboard_when_copying_then_clipboard_error() {
        let exporter = TagExporter::new();
        let payload = exporter.render(&set(), ExportFormat::Plain, ExportScope::All).unwrap();
        let mut clipboard = RecordingClipboard {
            fail_plain: true,
            ..Default::default()
        };

        let result = exporter.copy(&mut clipboard, &payload);

        assert!(matches!(result, Err(DomainError::Clipboard(_))));
    }
}
