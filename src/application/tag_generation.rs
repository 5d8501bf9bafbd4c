// src/application/tag_generation.rs
use crate::application::session::{AuthContext, AuthGateway, TokenStore};
use crate::domain::{ApiError, DomainError, QuotaDecision, TagSet};
use tracing::{debug, info, warn};

/// Remote tag-generation service.
pub trait TagGenerator {
    fn generate(&self, text: &str) -> Result<Vec<String>, ApiError>;
}

pub struct TagGenerationService<G: TagGenerator> {
    generator: G,
}

impl<G: TagGenerator> TagGenerationService<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Generate tags for `text` and install them in `workspace`.
    ///
    /// The workspace is only touched after the remote call succeeded. Usage
    /// accounting and the user refresh that follow are best-effort.
    pub fn generate<A, S>(
        &self,
        auth: &mut AuthContext<A, S>,
        workspace: &mut TagSet,
        text: &str,
    ) -> Result<usize, DomainError>
    where
        A: AuthGateway,
        S: TokenStore,
    {
        if !auth.is_authenticated() {
            return Err(DomainError::LoginRequired);
        }
        if text.trim().is_empty() {
            return Err(DomainError::EmptyInput);
        }
        match auth.quota() {
            QuotaDecision::LoginRequired => return Err(DomainError::LoginRequired),
            QuotaDecision::Blocked { used, limit } => {
                return Err(DomainError::QuotaExceeded { used, limit });
            }
            QuotaDecision::Allowed { remaining } => {
                debug!(%remaining, "Quota check passed");
            }
        }

        info!(chars = text.chars().count(), "Generating tags");
        let generated = self.generator.generate(text)?;
        let count = generated.len();
        workspace.replace_generated(generated);
        info!(count, "Tags generated");

        if let Err(e) = auth.authorized(|gateway, token| gateway.increment_usage(token)) {
            warn!(error = %e, "Failed to increment usage");
        } else {
            auth.refresh_user();
        }

        Ok(count)
    }
}
