// src/application/mod.rs
pub mod admin;
pub mod exporter;
pub mod session;
pub mod tag_editor;
pub mod tag_generation;

pub use admin::{AdminConsole, AdminGateway};
pub use exporter::{ClipboardSink, ExportPayload, TagExporter};
pub use session::{AuthContext, AuthGateway, TokenStore};
pub use tag_editor::{TagEditor, WorkspaceRepository};
pub use tag_generation::{TagGenerationService, TagGenerator};
