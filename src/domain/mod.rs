// src/domain/mod.rs
pub mod error;
pub mod export;
pub mod link;
pub mod plan;
pub mod quota;
pub mod session;
pub mod tag;
pub mod tag_set;
pub mod user;

pub use error::{ApiError, DomainError};
pub use export::{CopyOutcome, ExportFormat, ExportScope};
pub use plan::{Plan, PlanDraft};
pub use quota::{QuotaDecision, Remaining};
pub use session::{AuthGrant, Registration, SessionTokens};
pub use tag::TagCategory;
pub use tag_set::TagSet;
pub use user::{ApiUsage, PlanTier, User};
