// src/domain/quota.rs
use crate::domain::user::{ApiUsage, User};
use std::fmt;

/// Generations left this month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Unlimited,
    Count(u64),
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Unlimited => f.write_str("∞"),
            Remaining::Count(n) => write!(f, "{n}"),
        }
    }
}

/// Outcome of gating a generation request on the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    LoginRequired,
    Allowed { remaining: Remaining },
    Blocked { used: i64, limit: i64 },
}

impl QuotaDecision {
    pub fn evaluate(user: Option<&User>) -> Self {
        match user {
            None => QuotaDecision::LoginRequired,
            Some(user) => Self::for_usage(&user.api_usage),
        }
    }

    pub fn for_usage(usage: &ApiUsage) -> Self {
        if is_blocked(usage) {
            QuotaDecision::Blocked {
                used: usage.requests_this_month,
                limit: usage.monthly_limit,
            }
        } else {
            QuotaDecision::Allowed {
                remaining: remaining(usage),
            }
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, QuotaDecision::Blocked { .. })
    }
}

pub fn is_blocked(usage: &ApiUsage) -> bool {
    !usage.is_unlimited() && usage.requests_this_month >= usage.monthly_limit
}

pub fn remaining(usage: &ApiUsage) -> Remaining {
    if usage.is_unlimited() {
        return Remaining::Unlimited;
    }
    let left = usage.monthly_limit.saturating_sub(usage.requests_this_month).max(0);
    Remaining::Count(u64::try_from(left).unwrap_or(0))
}

/// Share of the monthly allowance used, clamped to 0..=100. `None` when unlimited.
pub fn usage_percent(usage: &ApiUsage) -> Option<f64> {
    if usage.is_unlimited() {
        return None;
    }
    if usage.monthly_limit <= 0 {
        return Some(100.0);
    }
    let pct = usage.requests_this_month as f64 / usage.monthly_limit as f64 * 100.0;
    Some(pct.clamp(0.0, 100.0))
}
