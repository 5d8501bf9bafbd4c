// src/ports/mod.rs
pub mod console;
pub mod html;
pub mod text;

pub use html::HtmlPresenter;
