// src/infrastructure/mod.rs
pub mod auth_client;
pub mod clipboard;
pub mod config;
pub mod http;
pub mod nlp_client;
pub mod token_store;
pub mod workspace_store;

pub use auth_client::AuthClient;
pub use clipboard::SystemClipboard;
pub use config::Config;
pub use nlp_client::NlpClient;
pub use token_store::FileTokenStore;
pub use workspace_store::JsonWorkspaceRepository;
