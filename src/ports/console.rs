// src/ports/console.rs
use crate::domain::quota::{remaining, usage_percent};
use crate::domain::{Plan, QuotaDecision, TagCategory, TagSet, User};

const BAR_WIDTH: usize = 20;

/// Numbered tag listing with category icon, selection mark and link.
pub fn render_tag_list(set: &TagSet) -> String {
    if set.is_empty() {
        return "No tags. Run `tagsmith generate` or `tagsmith tag add`.".to_string();
    }

    let mut out = String::new();
    for (idx, tag) in set.tags().iter().enumerate() {
        let mark = if set.is_selected(tag) { "[x]" } else { "[ ]" };
        let icon = TagCategory::classify(tag).icon();
        out.push_str(&format!("{:>3}. {mark} {icon} {tag}", idx + 1));
        if let Some(url) = set.link(tag) {
            out.push_str(&format!("\n          -> {url}"));
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{} tags, {} selected",
        set.len(),
        set.selected_count()
    ));
    if let Some(base) = set.base_url() {
        out.push_str(&format!(", base URL {base}"));
    }
    out
}

/// Plan, usage counter, progress bar and remaining allowance.
pub fn render_usage(user: &User) -> String {
    let usage = &user.api_usage;
    let plan = user.subscription.plan.display_name();
    let limit = if usage.is_unlimited() {
        "∞".to_string()
    } else {
        usage.monthly_limit.to_string()
    };

    let mut out = format!(
        "{plan} Plan: {} / {limit} tags used",
        usage.requests_this_month
    );
    if let Some(pct) = usage_percent(usage) {
        let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "\n[{}{}] {pct:.1}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled)
        ));
    }
    match QuotaDecision::for_usage(usage) {
        QuotaDecision::Blocked { .. } => {
            out.push_str("\nLimit reached");
            if user.subscription.plan == crate::domain::PlanTier::Free {
                out.push_str(
                    "\nYou've used all your free tags this month! Upgrade to unlock more.",
                );
            }
        }
        _ => out.push_str(&format!("\n{} tags remaining", remaining(usage))),
    }
    out
}

pub fn render_user(user: &User) -> String {
    let verified = if user.is_email_verified {
        "verified"
    } else {
        "unverified"
    };
    format!(
        "{} <{}> ({verified})\nRole: {}\nSubscription: {} ({})\n{}",
        user.name,
        user.email,
        user.role,
        user.subscription.plan.display_name(),
        if user.subscription.status.is_empty() {
            "unknown"
        } else {
            user.subscription.status.as_str()
        },
        render_usage(user)
    )
}

pub fn render_user_table(users: &[User]) -> String {
    let mut out = format!("{:<26} {:<32} {:<6} {:<6} {}\n", "ID", "EMAIL", "ROLE", "PLAN", "USAGE");
    for user in users {
        let usage = &user.api_usage;
        let limit = if usage.is_unlimited() {
            "∞".to_string()
        } else {
            usage.monthly_limit.to_string()
        };
        out.push_str(&format!(
            "{:<26} {:<32} {:<6} {:<6} {}/{}\n",
            user.id,
            user.email,
            user.role,
            user.subscription.plan.as_str(),
            usage.requests_this_month,
            limit
        ));
    }
    out.push_str(&format!("{} users", users.len()));
    out
}

pub fn render_plan_table(plans: &[Plan]) -> String {
    let mut out = format!("{:<26} {:<12} {:>8} {:>10} {}\n", "ID", "NAME", "PRICE", "TAGS/MO", "FEATURES");
    for plan in plans {
        out.push_str(&format!(
            "{:<26} {:<12} {:>8.2} {:>10} {}\n",
            plan.id,
            plan.name,
            plan.price,
            plan.limit_label(),
            plan.features.join(", ")
        ));
    }
    out.push_str(&format!("{} plans", plans.len()));
    out
}
