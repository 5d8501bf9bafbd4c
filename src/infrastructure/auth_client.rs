// src/infrastructure/auth_client.rs
use crate::application::{AdminGateway, AuthGateway};
use crate::domain::{
    ApiError, AuthGrant, Plan, PlanDraft, PlanTier, Registration, SessionTokens, User,
};
use crate::infrastructure::http::ServiceEndpoint;
use crate::infrastructure::nlp_client::health_status;
use anyhow::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, CONTROLS};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::instrument;

/// Characters escaped in a single path segment, `/` and `?` included.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(id: &str) -> PercentEncode<'_> {
    utf8_percent_encode(id, PATH_SEGMENT)
}

/// Client for the auth/billing service: auth, usage and admin endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    endpoint: ServiceEndpoint,
}

impl AuthClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            endpoint: ServiceEndpoint::new("auth service", base_url, timeout_secs)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    pub fn health(&self) -> Result<String, ApiError> {
        let body = self.endpoint.execute(self.endpoint.get("/health"))?;
        Ok(health_status(&body))
    }

    fn post_public(&self, path: &str, payload: Value) -> Result<Value, ApiError> {
        self.endpoint
            .execute(self.endpoint.post(path).json(&payload))
    }
}

/// Look `key` up in the shapes the service has used: `data.key`,
/// `data.data.key` and top-level `key`.
pub fn find_in_envelope<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get("data")
        .and_then(|d| d.get(key))
        .or_else(|| body.get("data").and_then(|d| d.get("data")).and_then(|d| d.get(key)))
        .or_else(|| body.get(key))
        .filter(|v| !v.is_null())
}

fn decode<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value.clone())
        .map_err(|e| ApiError::InvalidResponse(format!("{what}: {e}")))
}

pub fn extract_user(body: &Value) -> Result<User, ApiError> {
    let user = find_in_envelope(body, "user")
        .ok_or_else(|| ApiError::InvalidResponse("response carries no user".to_string()))?;
    decode(user, "user")
}

pub fn extract_tokens(body: &Value) -> Option<SessionTokens> {
    let tokens = find_in_envelope(body, "tokens")?;
    tokens_from(tokens)
}

/// Access/refresh pair from an object holding `accessToken` and optionally `refreshToken`.
fn tokens_from(value: &Value) -> Option<SessionTokens> {
    let access = value.get("accessToken")?.as_str()?;
    let refresh = value
        .get("refreshToken")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(SessionTokens::new(access, refresh))
}

pub fn extract_refreshed_tokens(body: &Value) -> Result<SessionTokens, ApiError> {
    [body.get("data").and_then(|d| d.get("data")), body.get("data"), Some(body)]
        .into_iter()
        .flatten()
        .find_map(tokens_from)
        .ok_or_else(|| ApiError::InvalidResponse("refresh response carries no accessToken".to_string()))
}

/// Array payload at `data`, `data.<key>` or top level. Missing means empty.
pub fn extract_list<T: DeserializeOwned>(body: &Value, key: &str) -> Result<Vec<T>, ApiError> {
    let list = match body {
        Value::Array(_) => Some(body),
        _ => body
            .get("data")
            .filter(|d| d.is_array())
            .or_else(|| find_in_envelope(body, key)),
    };
    match list {
        Some(list) => decode(list, key),
        None => Ok(Vec::new()),
    }
}

fn extract_plan(body: &Value) -> Result<Plan, ApiError> {
    let plan = find_in_envelope(body, "plan")
        .or_else(|| body.get("data").filter(|d| d.is_object()))
        .unwrap_or(body);
    decode(plan, "plan")
}

pub fn message_or(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

impl AuthGateway for AuthClient {
    #[instrument(level = "debug", skip_all)]
    fn register(&self, registration: &Registration) -> Result<AuthGrant, ApiError> {
        let body = self.post_public(
            "/api/auth/register",
            json!({
                "name": registration.name,
                "email": registration.email,
                "password": registration.password,
            }),
        )?;
        Ok(AuthGrant {
            user: extract_user(&body)?,
            tokens: extract_tokens(&body),
        })
    }

    #[instrument(level = "debug", skip(self, password))]
    fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let body = self.post_public(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        )?;
        Ok(AuthGrant {
            user: extract_user(&body)?,
            tokens: extract_tokens(&body),
        })
    }

    #[instrument(level = "debug", skip_all)]
    fn me(&self, access_token: &str) -> Result<User, ApiError> {
        let body = self
            .endpoint
            .execute(self.endpoint.get("/api/auth/me").bearer_auth(access_token))?;
        extract_user(&body)
    }

    fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        self.endpoint
            .execute(self.endpoint.post("/api/auth/logout").bearer_auth(access_token))?;
        Ok(())
    }

    #[instrument(level = "debug", skip_all)]
    fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, ApiError> {
        let body = self.post_public(
            "/api/auth/refresh",
            json!({ "refreshToken": refresh_token }),
        )?;
        extract_refreshed_tokens(&body)
    }

    fn verify_email(&self, token: &str) -> Result<String, ApiError> {
        let body = self.post_public("/api/auth/verify-email", json!({ "token": token }))?;
        Ok(message_or(&body, "Email verified"))
    }

    fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        let body = self.post_public("/api/auth/forgot-password", json!({ "email": email }))?;
        Ok(message_or(
            &body,
            "If an account exists for that email, a reset link has been sent",
        ))
    }

    fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        let body = self.post_public(
            "/api/auth/reset-password",
            json!({ "token": token, "password": password }),
        )?;
        Ok(message_or(
            &body,
            "Password reset successful! Please log in with your new password.",
        ))
    }

    fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        let request = self
            .endpoint
            .post("/api/auth/change-password")
            .bearer_auth(access_token)
            .json(&json!({
                "currentPassword": current_password,
                "newPassword": new_password,
            }));
        let body = self.endpoint.execute(request)?;
        Ok(message_or(&body, "Password changed"))
    }

    fn resend_verification(&self, email: &str) -> Result<String, ApiError> {
        let body = self.post_public("/api/auth/resend-verification", json!({ "email": email }))?;
        Ok(message_or(&body, "Verification email sent"))
    }

    fn increment_usage(&self, access_token: &str) -> Result<(), ApiError> {
        self.endpoint
            .execute(self.endpoint.post("/api/usage/increment").bearer_auth(access_token))?;
        Ok(())
    }
}

impl AdminGateway for AuthClient {
    fn list_users(&self, access_token: &str) -> Result<Vec<User>, ApiError> {
        let body = self
            .endpoint
            .execute(self.endpoint.get("/api/admin/users").bearer_auth(access_token))?;
        extract_list(&body, "users")
    }

    fn update_user_plan(
        &self,
        access_token: &str,
        user_id: &str,
        plan: PlanTier,
    ) -> Result<(), ApiError> {
        let request = self
            .endpoint
            .patch(&format!("/api/admin/users/{}/plan", segment(user_id)))
            .bearer_auth(access_token)
            .json(&json!({ "plan": plan.as_str() }));
        self.endpoint.execute(request)?;
        Ok(())
    }

    fn delete_user(&self, access_token: &str, user_id: &str) -> Result<(), ApiError> {
        let request = self
            .endpoint
            .delete(&format!("/api/admin/users/{}", segment(user_id)))
            .bearer_auth(access_token);
        self.endpoint.execute(request)?;
        Ok(())
    }

    fn list_plans(&self, access_token: &str) -> Result<Vec<Plan>, ApiError> {
        let body = self
            .endpoint
            .execute(self.endpoint.get("/api/admin/plans").bearer_auth(access_token))?;
        extract_list(&body, "plans")
    }

    fn create_plan(&self, access_token: &str, draft: &PlanDraft) -> Result<Plan, ApiError> {
        let request = self
            .endpoint
            .post("/api/admin/plans")
            .bearer_auth(access_token)
            .json(draft);
        extract_plan(&self.endpoint.execute(request)?)
    }

    fn update_plan(
        &self,
        access_token: &str,
        plan_id: &str,
        draft: &PlanDraft,
    ) -> Result<Plan, ApiError> {
        let request = self
            .endpoint
            .patch(&format!("/api/admin/plans/{}", segment(plan_id)))
            .bearer_auth(access_token)
            .json(draft);
        extract_plan(&self.endpoint.execute(request)?)
    }

    fn delete_plan(&self, access_token: &str, plan_id: &str) -> Result<(), ApiError> {
        let request = self
            .endpoint
            .delete(&format!("/api/admin/plans/{}", segment(plan_id)))
            .bearer_auth(access_token);
        self.endpoint.execute(request)?;
        Ok(())
    }
}
