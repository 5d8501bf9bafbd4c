// src/application/session.rs
use crate::domain::{
    ApiError, AuthGrant, DomainError, QuotaDecision, Registration, SessionTokens, User,
};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Remote auth service. Protected calls receive the access token explicitly.
pub trait AuthGateway {
    fn register(&self, registration: &Registration) -> Result<AuthGrant, ApiError>;
    fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError>;
    fn me(&self, access_token: &str) -> Result<User, ApiError>;
    fn logout(&self, access_token: &str) -> Result<(), ApiError>;
    fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, ApiError>;
    fn verify_email(&self, token: &str) -> Result<String, ApiError>;
    fn forgot_password(&self, email: &str) -> Result<String, ApiError>;
    fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError>;
    fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, ApiError>;
    fn resend_verification(&self, email: &str) -> Result<String, ApiError>;

    /// Count one generation request against the caller's monthly quota.
    fn increment_usage(&self, access_token: &str) -> Result<(), ApiError>;
}

/// Persistence for session tokens between runs.
pub trait TokenStore {
    fn load(&self) -> Result<Option<SessionTokens>>;
    fn save(&self, tokens: &SessionTokens) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Explicit authentication context handed to every use case that needs a user.
///
/// Lifecycle: `new` at startup, `hydrate` from persisted tokens, `logout`
/// on teardown.
pub struct AuthContext<A: AuthGateway, S: TokenStore> {
    gateway: A,
    store: S,
    tokens: Option<SessionTokens>,
    user: Option<User>,
}

impl<A: AuthGateway, S: TokenStore> AuthContext<A, S> {
    pub fn new(gateway: A, store: S) -> Self {
        Self {
            gateway,
            store,
            tokens: None,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn gateway(&self) -> &A {
        &self.gateway
    }

    pub fn quota(&self) -> QuotaDecision {
        QuotaDecision::evaluate(self.user.as_ref())
    }

    /// Restore the session from persisted tokens.
    ///
    /// Returns `Ok(None)` when no tokens are stored. A rejected session clears
    /// the stored tokens and yields `SessionExpired`; an unreachable service
    /// keeps them for the next attempt.
    pub fn hydrate(&mut self) -> Result<Option<&User>, DomainError> {
        if !self.restore_tokens() {
            debug!("No stored session");
            return Ok(None);
        }

        let user = self.authorized(|gateway, token| gateway.me(token))?;
        debug!(email = %user.email, "Session restored");
        self.user = Some(user);
        Ok(self.user.as_ref())
    }

    /// Load persisted tokens without contacting the service.
    pub fn restore_tokens(&mut self) -> bool {
        self.tokens = self.store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read stored session, treating as logged out");
            None
        });
        self.tokens.is_some()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, DomainError> {
        if email.trim().is_empty() {
            return Err(DomainError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(DomainError::MissingField("password"));
        }
        let grant = self.gateway.login(email.trim(), password)?;
        info!("Logged in");
        Ok(self.accept_grant(grant))
    }

    pub fn register(
        &mut self,
        registration: Registration,
        confirm_password: &str,
    ) -> Result<&User, DomainError> {
        if registration.name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        if registration.email.trim().is_empty() {
            return Err(DomainError::MissingField("email"));
        }
        if registration.password.is_empty() {
            return Err(DomainError::MissingField("password"));
        }
        if registration.password != confirm_password {
            return Err(DomainError::PasswordMismatch);
        }
        let grant = self.gateway.register(&registration)?;
        info!("Registered");
        Ok(self.accept_grant(grant))
    }

    fn accept_grant(&mut self, grant: AuthGrant) -> &User {
        if let Some(tokens) = grant.tokens {
            if let Err(e) = self.store.save(&tokens) {
                warn!(error = %e, "Failed to persist session tokens");
            }
            self.tokens = Some(tokens);
        }
        self.user.insert(grant.user)
    }

    /// Best-effort remote logout; local tokens are dropped regardless.
    pub fn logout(&mut self) {
        if let Some(tokens) = &self.tokens {
            if let Err(e) = self.gateway.logout(&tokens.access_token) {
                warn!(error = %e, "Remote logout failed");
            }
        }
        self.drop_session();
        info!("Logged out");
    }

    fn drop_session(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
        self.tokens = None;
        self.user = None;
    }

    /// Re-fetch the user record. Failures are logged and leave the cached user in place.
    pub fn refresh_user(&mut self) -> bool {
        match self.authorized(|gateway, token| gateway.me(token)) {
            Ok(user) => {
                self.user = Some(user);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh user data");
                false
            }
        }
    }

    /// Run a protected call with the current access token.
    ///
    /// A 401 triggers exactly one token refresh and one retry. If the refresh
    /// fails or the retry is rejected again, the session is dropped.
    pub fn authorized<T, F>(&mut self, call: F) -> Result<T, DomainError>
    where
        F: Fn(&A, &str) -> Result<T, ApiError>,
    {
        let Some(tokens) = self.tokens.clone() else {
            return Err(DomainError::LoginRequired);
        };

        match call(&self.gateway, &tokens.access_token) {
            Err(e) if e.is_unauthorized() => {
                debug!("Access token rejected, attempting refresh");
            }
            other => return other.map_err(DomainError::from),
        }

        let Some(refreshed) = self.refresh_tokens(&tokens) else {
            self.drop_session();
            return Err(DomainError::SessionExpired);
        };

        match call(&self.gateway, &refreshed.access_token) {
            Err(e) if e.is_unauthorized() => {
                warn!("Request rejected after token refresh");
                self.drop_session();
                Err(DomainError::SessionExpired)
            }
            other => other.map_err(DomainError::from),
        }
    }

    fn refresh_tokens(&mut self, current: &SessionTokens) -> Option<SessionTokens> {
        let refresh_token = current.refresh_token.as_deref()?;
        match self.gateway.refresh(refresh_token) {
            Ok(mut fresh) => {
                if fresh.refresh_token.is_none() {
                    fresh.refresh_token = current.refresh_token.clone();
                }
                if let Err(e) = self.store.save(&fresh) {
                    warn!(error = %e, "Failed to persist refreshed tokens");
                }
                self.tokens = Some(fresh.clone());
                Some(fresh)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                None
            }
        }
    }

    pub fn verify_email(&self, token: &str) -> Result<String, DomainError> {
        if token.trim().is_empty() {
            return Err(DomainError::MissingField("token"));
        }
        Ok(self.gateway.verify_email(token.trim())?)
    }

    pub fn forgot_password(&self, email: &str) -> Result<String, DomainError> {
        if email.trim().is_empty() {
            return Err(DomainError::MissingField("email"));
        }
        Ok(self.gateway.forgot_password(email.trim())?)
    }

    pub fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<String, DomainError> {
        if token.trim().is_empty() {
            return Err(DomainError::MissingField("token"));
        }
        if password.is_empty() {
            return Err(DomainError::MissingField("password"));
        }
        if password != confirm_password {
            return Err(DomainError::PasswordMismatch);
        }
        Ok(self.gateway.reset_password(token.trim(), password)?)
    }

    pub fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<String, DomainError> {
        if new_password.is_empty() {
            return Err(DomainError::MissingField("new password"));
        }
        if new_password != confirm_password {
            return Err(DomainError::PasswordMismatch);
        }
        self.authorized(|gateway, token| {
            gateway.change_password(token, current_password, new_password)
        })
    }

    pub fn resend_verification(&self, email: &str) -> Result<String, DomainError> {
        if email.trim().is_empty() {
            return Err(DomainError::MissingField("email"));
        }
        Ok(self.gateway.resend_verification(email.trim())?)
    }
}
