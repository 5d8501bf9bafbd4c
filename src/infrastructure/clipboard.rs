// src/infrastructure/clipboard.rs
use crate::application::ClipboardSink;
use anyhow::{anyhow, Context, Result};
use tracing::{debug, instrument};

/// Ways of getting data onto the system clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
enum Backend {
    /// `wl-copy` or `xclip`; both fork and keep serving the selection after we exit.
    PlatformTool,
    Arboard,
}

/// On X11 and Wayland the selection dies with its owner, so the forking
/// tools go first and arboard has to block until someone else takes over.
#[cfg(target_os = "linux")]
const WRITE_ORDER: &[Backend] = &[Backend::PlatformTool, Backend::Arboard];

#[cfg(not(target_os = "linux"))]
const WRITE_ORDER: &[Backend] = &[Backend::Arboard];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavour {
    Html,
    Text,
}

#[derive(Debug, Clone, Copy)]
enum Content<'a> {
    Html { html: &'a str, plain: &'a str },
    Text(&'a str),
}

impl Content<'_> {
    fn flavour(&self) -> Flavour {
        match self {
            Content::Html { .. } => Flavour::Html,
            Content::Text(_) => Flavour::Text,
        }
    }

    fn body(&self) -> &str {
        match self {
            Content::Html { html, .. } => *html,
            Content::Text(plain) => *plain,
        }
    }
}

/// System clipboard: platform tools and `arboard`, with the tools alone as legacy HTML path.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.inner.is_some())
            .finish()
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().context("Failed to open clipboard")?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| anyhow!("Clipboard unavailable"))
    }

    fn write(&mut self, content: Content<'_>) -> Result<()> {
        let mut last_error = anyhow!("No clipboard backend available");
        for &backend in WRITE_ORDER {
            let result = match backend {
                Backend::PlatformTool => pipe_to_platform_tool(content.flavour(), content.body()),
                Backend::Arboard => self.write_with_arboard(content),
            };
            match result {
                Ok(()) => {
                    debug!(?backend, "Clipboard written");
                    return Ok(());
                }
                Err(e) => {
                    debug!(?backend, error = %e, "Clipboard backend failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    fn write_with_arboard(&mut self, content: Content<'_>) -> Result<()> {
        let set = self.handle()?.set();
        #[cfg(target_os = "linux")]
        let set = {
            use arboard::SetExtLinux;
            tracing::info!("Holding the clipboard until another application takes it over");
            set.wait()
        };
        match content {
            Content::Html { html, plain } => set
                .html(html, Some(plain))
                .context("Failed to write HTML to clipboard"),
            Content::Text(plain) => set
                .text(plain)
                .context("Failed to write text to clipboard"),
        }
    }
}

impl ClipboardSink for SystemClipboard {
    #[instrument(level = "debug", skip_all)]
    fn write_rich(&mut self, plain: &str, html: &str) -> Result<()> {
        self.write(Content::Html { html, plain })
    }

    #[instrument(level = "debug", skip_all)]
    fn write_legacy_html(&mut self, html: &str) -> Result<()> {
        pipe_to_platform_tool(Flavour::Html, html)
    }

    fn write_plain(&mut self, plain: &str) -> Result<()> {
        self.write(Content::Text(plain))
    }
}

type ToolCandidate = (&'static str, &'static [&'static str]);

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn tool_candidates(flavour: Flavour) -> [ToolCandidate; 2] {
    match flavour {
        Flavour::Html => [
            ("wl-copy", &["--type", "text/html"]),
            ("xclip", &["-selection", "clipboard", "-t", "text/html", "-i"]),
        ],
        Flavour::Text => [
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard", "-i"]),
        ],
    }
}

#[cfg(target_os = "linux")]
fn pipe_to_platform_tool(flavour: Flavour, body: &str) -> Result<()> {
    pipe_to_first_tool(&tool_candidates(flavour), body)
}

#[cfg(not(target_os = "linux"))]
fn pipe_to_platform_tool(_flavour: Flavour, _body: &str) -> Result<()> {
    anyhow::bail!("Clipboard tools are not supported on this platform")
}

/// Feed `body` to the first candidate that accepts it and exits cleanly.
#[cfg(unix)]
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn pipe_to_first_tool(candidates: &[ToolCandidate], body: &str) -> Result<()> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut last_error = anyhow!("No clipboard tool available");
    for &(program, args) in candidates {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                debug!(program, error = %e, "Clipboard tool not usable");
                last_error = anyhow!("Failed to start {program}: {e}");
                continue;
            }
        };
        let piped = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(body.as_bytes()),
            None => Ok(()),
        };
        let status = child.wait();
        if let Err(e) = piped {
            debug!(program, error = %e, "Clipboard tool stopped reading");
            last_error = anyhow!("Failed to pipe to {program}: {e}");
            continue;
        }
        match status {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => last_error = anyhow!("{program} exited with {status}"),
            Err(e) => last_error = anyhow!("Failed to wait for {program}: {e}"),
        }
    }
    Err(last_error)
}
