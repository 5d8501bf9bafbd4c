// src/domain/tag.rs
use serde::Serialize;

/// Category of a tag, derived from its structural prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Topic,
    Person,
    Company,
    Product,
    Location,
    Thought,
    DocumentType,
    Length,
    Other,
}

/// Prefix table in match order. `//Location/` must precede the bare `//`.
const PREFIXES: &[(&str, TagCategory)] = &[
    ("::Topic/", TagCategory::Topic),
    ("::Person/", TagCategory::Person),
    ("@Person/", TagCategory::Person),
    ("/Company/", TagCategory::Company),
    (":Product/", TagCategory::Product),
    ("//Location/", TagCategory::Location),
    ("//", TagCategory::Thought),
    ("<Type/", TagCategory::DocumentType),
    ("^Length/", TagCategory::Length),
];

impl TagCategory {
    pub fn classify(tag: &str) -> Self {
        PREFIXES
            .iter()
            .find(|(prefix, _)| tag.starts_with(prefix))
            .map_or(TagCategory::Other, |(_, category)| *category)
    }

    pub fn icon(self) -> &'static str {
        match self {
            TagCategory::Topic => "🎯",
            TagCategory::Person => "👤",
            TagCategory::Company => "🏢",
            TagCategory::Product => "📦",
            TagCategory::Location => "📍",
            TagCategory::Thought => "💭",
            TagCategory::DocumentType => "📄",
            TagCategory::Length => "📏",
            TagCategory::Other => "🏷️",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TagCategory::Topic => "topic",
            TagCategory::Person => "person",
            TagCategory::Company => "company",
            TagCategory::Product => "product",
            TagCategory::Location => "location",
            TagCategory::Thought => "thought",
            TagCategory::DocumentType => "type",
            TagCategory::Length => "length",
            TagCategory::Other => "other",
        }
    }
}
