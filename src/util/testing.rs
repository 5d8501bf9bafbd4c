// src/util/testing.rs

use anyhow::{bail, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::env;
use std::rc::Rc;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{
    AdminGateway, AuthGateway, ClipboardSink, TagGenerator, TokenStore, WorkspaceRepository,
};
use crate::domain::{
    ApiError, ApiUsage, AuthGrant, Plan, PlanDraft, PlanTier, Registration, SessionTokens,
    TagSet, User,
};

/// A verified user on `tier` with untouched usage.
pub fn sample_user(tier: PlanTier) -> User {
    User {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role: "user".to_string(),
        subscription: crate::domain::user::Subscription {
            plan: tier,
            status: "active".to_string(),
            ..Default::default()
        },
        profile: None,
        is_email_verified: true,
        api_usage: ApiUsage::new(0, tier.default_monthly_limit()),
        last_login: None,
    }
}

#[derive(Default)]
struct AuthState {
    users_by_token: HashMap<String, User>,
    refreshes: HashMap<String, String>,
    logins: HashMap<(String, String), String>,
    listed_users: Vec<User>,
    plans: Vec<Plan>,
    plan_updates: Vec<(String, PlanTier)>,
    unreachable: bool,
    failing_logout: bool,
    failing_usage: bool,
    refresh_calls: usize,
    register_calls: usize,
    usage_increments: usize,
}

/// Shared mock of the auth service for use-case tests.
///
/// # Examples
///
/// ```
/// use tagsmith::util::testing::{sample_user, MockAuthGateway};
/// use tagsmith::domain::PlanTier;
///
/// let gateway = MockAuthGateway::builder()
///     .with_access_token("access-1", sample_user(PlanTier::Free))
///     .with_refresh("refresh-1", "access-1")
///     .build();
/// assert_eq!(gateway.refresh_calls(), 0);
/// ```
pub struct MockAuthGateway {
    state: RefCell<AuthState>,
}

impl MockAuthGateway {
    pub fn builder() -> MockAuthGatewayBuilder {
        MockAuthGatewayBuilder::new()
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.borrow().refresh_calls
    }

    pub fn register_calls(&self) -> usize {
        self.state.borrow().register_calls
    }

    pub fn usage_increments(&self) -> usize {
        self.state.borrow().usage_increments
    }

    pub fn plan_updates(&self) -> Vec<(String, PlanTier)> {
        self.state.borrow().plan_updates.clone()
    }

    fn reachable(&self) -> Result<(), ApiError> {
        if self.state.borrow().unreachable {
            return Err(ApiError::Unreachable {
                service: "auth service".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn authorize(&self, token: &str) -> Result<User, ApiError> {
        self.reachable()?;
        self.state
            .borrow()
            .users_by_token
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))
    }

    fn grant(&self, access: &str, user: User) -> AuthGrant {
        self.state
            .borrow_mut()
            .users_by_token
            .insert(access.to_string(), user.clone());
        AuthGrant {
            user,
            tokens: Some(SessionTokens::new(access, Some(format!("refresh-{access}")))),
        }
    }
}

impl AuthGateway for MockAuthGateway {
    fn register(&self, registration: &Registration) -> Result<AuthGrant, ApiError> {
        self.reachable()?;
        self.state.borrow_mut().register_calls += 1;
        let mut user = sample_user(PlanTier::Free);
        user.name = registration.name.clone();
        user.email = registration.email.clone();
        user.is_email_verified = false;
        Ok(self.grant("access-new", user))
    }

    fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        self.reachable()?;
        let access = self
            .state
            .borrow()
            .logins
            .get(&(email.to_string(), password.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;
        let user = self.authorize(&access)?;
        Ok(self.grant(&access, user))
    }

    fn me(&self, access_token: &str) -> Result<User, ApiError> {
        self.authorize(access_token)
    }

    fn logout(&self, _access_token: &str) -> Result<(), ApiError> {
        self.reachable()?;
        if self.state.borrow().failing_logout {
            return Err(ApiError::Rejected {
                status: 500,
                message: "logout failed".to_string(),
            });
        }
        Ok(())
    }

    fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, ApiError> {
        self.reachable()?;
        let mut state = self.state.borrow_mut();
        state.refresh_calls += 1;
        state
            .refreshes
            .get(refresh_token)
            .map(|access| SessionTokens::new(access.clone(), None))
            .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))
    }

    fn verify_email(&self, _token: &str) -> Result<String, ApiError> {
        self.reachable()?;
        Ok("Email verified".to_string())
    }

    fn forgot_password(&self, _email: &str) -> Result<String, ApiError> {
        self.reachable()?;
        Ok("Reset email sent".to_string())
    }

    fn reset_password(&self, _token: &str, _password: &str) -> Result<String, ApiError> {
        self.reachable()?;
        Ok("Password reset".to_string())
    }

    fn change_password(
        &self,
        access_token: &str,
        _current_password: &str,
        _new_password: &str,
    ) -> Result<String, ApiError> {
        self.authorize(access_token)?;
        Ok("Password changed".to_string())
    }

    fn resend_verification(&self, _email: &str) -> Result<String, ApiError> {
        self.reachable()?;
        Ok("Verification email sent".to_string())
    }

    fn increment_usage(&self, access_token: &str) -> Result<(), ApiError> {
        self.authorize(access_token)?;
        let mut state = self.state.borrow_mut();
        if state.failing_usage {
            return Err(ApiError::Rejected {
                status: 500,
                message: "usage store down".to_string(),
            });
        }
        state.usage_increments += 1;
        if let Some(user) = state.users_by_token.get_mut(access_token) {
            user.api_usage.requests_this_month += 1;
        }
        Ok(())
    }
}

impl AdminGateway for MockAuthGateway {
    fn list_users(&self, access_token: &str) -> Result<Vec<User>, ApiError> {
        self.authorize(access_token)?;
        Ok(self.state.borrow().listed_users.clone())
    }

    fn update_user_plan(
        &self,
        access_token: &str,
        user_id: &str,
        plan: PlanTier,
    ) -> Result<(), ApiError> {
        self.authorize(access_token)?;
        self.state
            .borrow_mut()
            .plan_updates
            .push((user_id.to_string(), plan));
        Ok(())
    }

    fn delete_user(&self, access_token: &str, user_id: &str) -> Result<(), ApiError> {
        self.authorize(access_token)?;
        self.state
            .borrow_mut()
            .listed_users
            .retain(|u| u.id != user_id);
        Ok(())
    }

    fn list_plans(&self, access_token: &str) -> Result<Vec<Plan>, ApiError> {
        self.authorize(access_token)?;
        Ok(self.state.borrow().plans.clone())
    }

    fn create_plan(&self, access_token: &str, draft: &PlanDraft) -> Result<Plan, ApiError> {
        self.authorize(access_token)?;
        let mut state = self.state.borrow_mut();
        let plan = Plan {
            id: format!("p{}", state.plans.len() + 1),
            name: draft.name.clone().unwrap_or_default(),
            price: draft.price.unwrap_or_default(),
            monthly_limit: draft.monthly_limit.unwrap_or_default(),
            features: draft.features.clone().unwrap_or_default(),
        };
        state.plans.push(plan.clone());
        Ok(plan)
    }

    fn update_plan(
        &self,
        access_token: &str,
        plan_id: &str,
        draft: &PlanDraft,
    ) -> Result<Plan, ApiError> {
        self.authorize(access_token)?;
        let mut state = self.state.borrow_mut();
        let plan = state
            .plans
            .iter_mut()
            .find(|p| p.id == plan_id)
            .ok_or_else(|| ApiError::Rejected {
                status: 404,
                message: "Plan not found".to_string(),
            })?;
        if let Some(name) = &draft.name {
            plan.name = name.clone();
        }
        if let Some(price) = draft.price {
            plan.price = price;
        }
        if let Some(limit) = draft.monthly_limit {
            plan.monthly_limit = limit;
        }
        if let Some(features) = &draft.features {
            plan.features = features.clone();
        }
        Ok(plan.clone())
    }

    fn delete_plan(&self, access_token: &str, plan_id: &str) -> Result<(), ApiError> {
        self.authorize(access_token)?;
        self.state.borrow_mut().plans.retain(|p| p.id != plan_id);
        Ok(())
    }
}

/// Builder for MockAuthGateway
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockAuthGatewayBuilder {
    state: AuthState,
}

impl MockAuthGatewayBuilder {
    pub fn new() -> Self {
        Self {
            state: AuthState::default(),
        }
    }

    /// Accept `token` as a valid access token for `user`
    pub fn with_access_token(mut self, token: &str, user: User) -> Self {
        self.state.users_by_token.insert(token.to_string(), user);
        self
    }

    /// Exchange `refresh_token` for the (already registered) `access_token`
    pub fn with_refresh(mut self, refresh_token: &str, access_token: &str) -> Self {
        self.state
            .refreshes
            .insert(refresh_token.to_string(), access_token.to_string());
        self
    }

    /// Accept the credentials and issue `access_token` for `user`
    pub fn with_login(mut self, email: &str, password: &str, access_token: &str, user: User) -> Self {
        self.state
            .logins
            .insert((email.to_string(), password.to_string()), access_token.to_string());
        self.state
            .users_by_token
            .insert(access_token.to_string(), user);
        self
    }

    /// Add a user to the admin listing
    pub fn with_listed_user(mut self, user: User) -> Self {
        self.state.listed_users.push(user);
        self
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.state.plans.push(plan);
        self
    }

    /// Every call fails as if the service were down
    pub fn unreachable(mut self) -> Self {
        self.state.unreachable = true;
        self
    }

    pub fn failing_logout(mut self) -> Self {
        self.state.failing_logout = true;
        self
    }

    pub fn failing_usage(mut self) -> Self {
        self.state.failing_usage = true;
        self
    }

    pub fn build(self) -> MockAuthGateway {
        MockAuthGateway {
            state: RefCell::new(self.state),
        }
    }
}

impl Default for MockAuthGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag generator returning a canned response. Clones share the call counter.
#[derive(Clone)]
pub struct MockTagGenerator {
    response: Result<Vec<String>, ApiError>,
    calls: Rc<Cell<usize>>,
}

impl MockTagGenerator {
    pub fn returning(tags: &[&str]) -> Self {
        Self {
            response: Ok(tags.iter().map(|t| t.to_string()).collect()),
            calls: Rc::default(),
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            response: Err(error),
            calls: Rc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl TagGenerator for MockTagGenerator {
    fn generate(&self, _text: &str) -> Result<Vec<String>, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.response.clone()
    }
}

/// In-memory token store. Clones share storage.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Rc<RefCell<Option<SessionTokens>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: Rc::new(RefCell::new(Some(tokens))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>> {
        Ok(self.tokens.borrow().clone())
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        *self.tokens.borrow_mut() = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.tokens.borrow_mut() = None;
        Ok(())
    }
}

/// In-memory workspace. Clones share storage.
#[derive(Clone, Default)]
pub struct MemoryWorkspaceRepository {
    workspace: Rc<RefCell<TagSet>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryWorkspaceRepository {
    pub fn with(workspace: TagSet) -> Self {
        Self {
            workspace: Rc::new(RefCell::new(workspace)),
            saves: Rc::default(),
        }
    }

    pub fn current(&self) -> TagSet {
        self.workspace.borrow().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl WorkspaceRepository for MemoryWorkspaceRepository {
    fn load(&self) -> Result<TagSet> {
        Ok(self.workspace.borrow().clone())
    }

    fn save(&self, workspace: &TagSet) -> Result<()> {
        *self.workspace.borrow_mut() = workspace.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Clipboard that records what it was given; each path can be made to fail.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub plain: Option<String>,
    pub html: Option<String>,
    pub fail_rich: bool,
    pub fail_legacy: bool,
    pub fail_plain: bool,
}

impl ClipboardSink for RecordingClipboard {
    fn write_rich(&mut self, plain: &str, html: &str) -> Result<()> {
        if self.fail_rich {
            bail!("rich clipboard unsupported");
        }
        self.plain = Some(plain.to_string());
        self.html = Some(html.to_string());
        Ok(())
    }

    fn write_legacy_html(&mut self, html: &str) -> Result<()> {
        if self.fail_legacy {
            bail!("no clipboard tool available");
        }
        self.html = Some(html.to_string());
        Ok(())
    }

    fn write_plain(&mut self, plain: &str) -> Result<()> {
        if self.fail_plain {
            bail!("clipboard unavailable");
        }
        self.plain = Some(plain.to_string());
        Ok(())
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["reqwest", "hyper", "rustls", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_registered_token_when_calling_me_then_returns_user() {
        let mock = MockAuthGateway::builder()
            .with_access_token("t", sample_user(PlanTier::Plus))
            .build();

        let user = mock.me("t").expect("token should be accepted");

        assert_eq!(user.subscription.plan, PlanTier::Plus);
    }

    #[test]
    fn given_unknown_token_when_calling_me_then_unauthorized() {
        let mock = MockAuthGateway::builder().build();

        assert!(mock.me("nope").unwrap_err().is_unauthorized());
    }

    #[test]
    fn given_plan_when_updating_then_only_given_fields_change() {
        let mock = MockAuthGateway::builder()
            .with_access_token("t", sample_user(PlanTier::Pro))
            .build();
        let created = mock
            .create_plan(
                "t",
                &PlanDraft {
                    name: Some("Plus".into()),
                    price: Some(9.99),
                    monthly_limit: Some(150),
                    features: None,
                },
            )
            .unwrap();

        let updated = mock
            .update_plan(
                "t",
                &created.id,
                &PlanDraft {
                    monthly_limit: Some(200),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Plus");
        assert_eq!(updated.monthly_limit, 200);
    }
}
