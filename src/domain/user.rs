// src/domain/user.rs
use crate::constants::UNLIMITED;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlanTier {
    #[default]
    Free,
    Plus,
    Pro,
}

impl PlanTier {
    pub const ALL: [PlanTier; 3] = [PlanTier::Free, PlanTier::Plus, PlanTier::Pro];

    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Plus => "plus",
            PlanTier::Pro => "pro",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Plus => "Plus",
            PlanTier::Pro => "Pro",
        }
    }

    /// Monthly generation allowance a fresh account on this tier receives.
    pub fn default_monthly_limit(self) -> i64 {
        match self {
            PlanTier::Free => 20,
            PlanTier::Plus => 150,
            PlanTier::Pro => UNLIMITED,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "plus" => Ok(PlanTier::Plus),
            "pro" => Ok(PlanTier::Pro),
            other => Err(format!("unknown plan '{other}', expected free, plus or pro")),
        }
    }
}

impl From<String> for PlanTier {
    /// Lenient: tiers the client does not know are shown as free.
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl From<PlanTier> for String {
    fn from(value: PlanTier) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub plan: PlanTier,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_at_period_end: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub avatar: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUsage {
    #[serde(default)]
    pub requests_this_month: i64,
    #[serde(default = "default_monthly_limit")]
    pub monthly_limit: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reset_date: Option<String>,
}

fn default_monthly_limit() -> i64 {
    PlanTier::Free.default_monthly_limit()
}

impl Default for ApiUsage {
    fn default() -> Self {
        Self {
            requests_this_month: 0,
            monthly_limit: default_monthly_limit(),
            last_reset_date: None,
        }
    }
}

impl ApiUsage {
    pub fn new(requests_this_month: i64, monthly_limit: i64) -> Self {
        Self {
            requests_this_month,
            monthly_limit,
            last_reset_date: None,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.monthly_limit == UNLIMITED
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub subscription: Subscription,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub api_usage: ApiUsage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

impl User {
    /// Client-side admin check: role `admin` or an allow-listed email.
    /// This only decides what the CLI offers; the server enforces access.
    pub fn is_admin(&self, admin_emails: &[String]) -> bool {
        if self.role.eq_ignore_ascii_case("admin") {
            return true;
        }
        let email = normalize_email(&self.email);
        admin_emails.iter().any(|e| normalize_email(e) == email)
    }
}

/// Lowercase and drop dots so `Jane.Doe@x` and `janedoe@x` compare equal.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase().replace('.', "")
}
