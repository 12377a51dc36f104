use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named steps of the questionnaire, in navigation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    General,
    DataCollection,
    DataUsage,
    Sharing,
    Legal,
    Cookies,
    Retention,
    UpdatePolicy,
    Review,
}

impl StepId {
    pub const ORDER: [StepId; 9] = [
        StepId::General,
        StepId::DataCollection,
        StepId::DataUsage,
        StepId::Sharing,
        StepId::Legal,
        StepId::Cookies,
        StepId::Retention,
        StepId::UpdatePolicy,
        StepId::Review,
    ];

    pub fn first() -> Self {
        StepId::General
    }

    pub fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|step| *step == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|idx| Self::ORDER.get(idx).copied())
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StepId::Review)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::General => "general",
            StepId::DataCollection => "data-collection",
            StepId::DataUsage => "data-usage",
            StepId::Sharing => "sharing",
            StepId::Legal => "legal",
            StepId::Cookies => "cookies",
            StepId::Retention => "retention",
            StepId::UpdatePolicy => "update-policy",
            StepId::Review => "review",
        }
    }

    /// Title shown in prompts and progress output.
    pub fn title(self) -> &'static str {
        match self {
            StepId::General => "General Information",
            StepId::DataCollection => "Data Collection",
            StepId::DataUsage => "Data Usage",
            StepId::Sharing => "Third-Party Sharing",
            StepId::Legal => "User Rights & Legal Compliance",
            StepId::Cookies => "Cookies and Tracking",
            StepId::Retention => "Data Storage & Retention",
            StepId::UpdatePolicy => "Policy Updates",
            StepId::Review => "Review",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StepId::ORDER
            .iter()
            .copied()
            .find(|step| step.as_str() == value)
            .ok_or_else(|| {
                let known = StepId::ORDER
                    .iter()
                    .map(|step| step.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("unknown step '{}' (expected one of: {})", value, known)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_linear() {
        assert_eq!(StepId::General.previous(), None);
        assert_eq!(StepId::General.next(), Some(StepId::DataCollection));
        assert_eq!(StepId::UpdatePolicy.next(), Some(StepId::Review));
        assert_eq!(StepId::Review.next(), None);
        assert_eq!(StepId::Review.previous(), Some(StepId::UpdatePolicy));
    }

    #[test]
    fn parses_kebab_names() {
        assert_eq!("update-policy".parse::<StepId>(), Ok(StepId::UpdatePolicy));
        assert!("sharing-step".parse::<StepId>().is_err());
    }
}
