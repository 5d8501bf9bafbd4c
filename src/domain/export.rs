// src/domain/export.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Rich,
    Plain,
    /// Tag and link on separate lines, entries separated by a blank line.
    #[serde(alias = "whatsapp")]
    Messaging,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Rich => "rich",
            ExportFormat::Plain => "plain",
            ExportFormat::Messaging => "messaging",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rich" | "html" => Ok(ExportFormat::Rich),
            "plain" | "text" => Ok(ExportFormat::Plain),
            "messaging" | "whatsapp" => Ok(ExportFormat::Messaging),
            other => Err(format!(
                "unknown format '{other}', expected rich, plain or messaging"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    Selected,
}

/// Which clipboard path accepted the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Dual plain/HTML payload.
    Rich,
    /// HTML handed to the platform clipboard tool.
    LegacyHtml,
    PlainText,
}

impl CopyOutcome {
    pub fn message(self) -> &'static str {
        match self {
            CopyOutcome::Rich => "Copied!",
            CopyOutcome::LegacyHtml => "Copied (via system clipboard tool)",
            CopyOutcome::PlainText => "Copied as plain text",
        }
    }
}
