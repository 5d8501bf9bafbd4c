// src/application/admin.rs
use crate::application::session::{AuthContext, AuthGateway, TokenStore};
use crate::domain::{ApiError, DomainError, Plan, PlanDraft, PlanTier, User};
use tracing::info;

/// Administrative endpoints of the auth service.
pub trait AdminGateway {
    fn list_users(&self, access_token: &str) -> Result<Vec<User>, ApiError>;
    fn update_user_plan(&self, access_token: &str, user_id: &str, plan: PlanTier)
        -> Result<(), ApiError>;
    fn delete_user(&self, access_token: &str, user_id: &str) -> Result<(), ApiError>;
    fn list_plans(&self, access_token: &str) -> Result<Vec<Plan>, ApiError>;
    fn create_plan(&self, access_token: &str, draft: &PlanDraft) -> Result<Plan, ApiError>;
    fn update_plan(&self, access_token: &str, plan_id: &str, draft: &PlanDraft)
        -> Result<Plan, ApiError>;
    fn delete_plan(&self, access_token: &str, plan_id: &str) -> Result<(), ApiError>;
}

/// Admin use cases behind a client-side role check.
///
/// The check only hides the commands from ordinary users; authorization is
/// the server's job.
pub struct AdminConsole<'a, A: AuthGateway + AdminGateway, S: TokenStore> {
    auth: &'a mut AuthContext<A, S>,
}

impl<'a, A: AuthGateway + AdminGateway, S: TokenStore> AdminConsole<'a, A, S> {
    pub fn open(auth: &'a mut AuthContext<A, S>, admin_emails: &[String]) -> Result<Self, DomainError> {
        let user = auth.user().ok_or(DomainError::LoginRequired)?;
        if !user.is_admin(admin_emails) {
            return Err(DomainError::AdminOnly);
        }
        Ok(Self { auth })
    }

    /// All users, sorted by email.
    pub fn list_users(&mut self) -> Result<Vec<User>, DomainError> {
        let mut users = self.auth.authorized(|gw, token| gw.list_users(token))?;
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    pub fn set_user_plan(&mut self, user_id: &str, plan: PlanTier) -> Result<(), DomainError> {
        self.auth
            .authorized(|gw, token| gw.update_user_plan(token, user_id, plan))?;
        info!(user_id, plan = %plan, "Updated user plan");
        Ok(())
    }

    pub fn delete_user(&mut self, user_id: &str) -> Result<(), DomainError> {
        self.auth.authorized(|gw, token| gw.delete_user(token, user_id))?;
        info!(user_id, "Deleted user");
        Ok(())
    }

    pub fn list_plans(&mut self) -> Result<Vec<Plan>, DomainError> {
        self.auth.authorized(|gw, token| gw.list_plans(token))
    }

    pub fn create_plan(&mut self, draft: &PlanDraft) -> Result<Plan, DomainError> {
        if draft.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Err(DomainError::MissingField("name"));
        }
        let plan = self.auth.authorized(|gw, token| gw.create_plan(token, draft))?;
        info!(plan_id = %plan.id, "Created plan");
        Ok(plan)
    }

    pub fn update_plan(&mut self, plan_id: &str, draft: &PlanDraft) -> Result<Plan, DomainError> {
        if draft.is_empty() {
            return Err(DomainError::MissingField("at least one plan field"));
        }
        self.auth
            .authorized(|gw, token| gw.update_plan(token, plan_id, draft))
    }

    pub fn delete_plan(&mut self, plan_id: &str) -> Result<(), DomainError> {
        self.auth.authorized(|gw, token| gw.delete_plan(token, plan_id))?;
        info!(plan_id, "Deleted plan");
        Ok(())
    }
}
