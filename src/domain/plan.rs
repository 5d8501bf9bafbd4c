// src/domain/plan.rs
use crate::constants::UNLIMITED;
use serde::{Deserialize, Serialize};

/// A billing plan as managed through the admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub monthly_limit: i64,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Plan {
    pub fn limit_label(&self) -> String {
        if self.monthly_limit == UNLIMITED {
            "Unlimited".to_string()
        } else {
            self.monthly_limit.to_string()
        }
    }
}

/// Fields for creating a plan or patching an existing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl PlanDraft {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.monthly_limit.is_none()
            && self.features.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_draft_when_serializing_then_omits_unset_fields() {
        let draft = PlanDraft {
            monthly_limit: Some(UNLIMITED),
            ..Default::default()
        };

        let json = serde_json::to_string(&draft).unwrap();

        assert_eq!(json, r#"{"monthlyLimit":-1}"#);
    }

    #[test]
    fn given_unlimited_plan_when_labelling_then_says_unlimited() {
        let plan: Plan = serde_json::from_str(
            r#"{"_id":"p3","name":"Pro","price":29.99,"monthlyLimit":-1,"features":["api-access"]}"#,
        )
        .unwrap();

        assert_eq!(plan.limit_label(), "Unlimited");
        assert_eq!(plan.features, vec!["api-access"]);
    }
}
