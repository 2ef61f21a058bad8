//! Operator-wide settings fixed at startup.

use crate::tournament::UserId;
use std::collections::HashSet;

/// Operator's cut of every tournament fund, in percent
pub const COMMISSION_PERCENT: i64 = 30;

/// Payment/payout instructions used when a tournament or winner gives none
pub const DEFAULT_INSTRUCTIONS: &str = "Bank transfer: details are pinned in the community chat";

/// Default support and rules text
pub const DEFAULT_SUPPORT_TEXT: &str = "Support: message an operator.\nRules: one registration per player, pay before the start.";

/// Words that select the default instructions in a wizard step
pub const DEFAULT_KEYWORDS: [&str; 2] = ["default", "-"];

/// Settings shared by the engine and the router
#[derive(Debug, Clone)]
pub struct Settings {
    /// Allow-listed operator identities
    pub operators: HashSet<UserId>,
    /// Commission applied to every fund
    pub commission_percent: i64,
    /// Default payment and payout instructions
    pub default_instructions: String,
    /// Text of the support/about entry
    pub support_text: String,
}

impl Settings {
    pub fn new(operators: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            operators: operators.into_iter().collect(),
            commission_percent: COMMISSION_PERCENT,
            default_instructions: DEFAULT_INSTRUCTIONS.to_string(),
            support_text: DEFAULT_SUPPORT_TEXT.to_string(),
        }
    }

    pub fn is_operator(&self, user_id: UserId) -> bool {
        self.operators.contains(&user_id)
    }

    /// `None` when the input is one of [`DEFAULT_KEYWORDS`]
    pub fn custom_instructions(input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty()
            || DEFAULT_KEYWORDS
                .iter()
                .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
        {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Resolve optional instructions against the default
    pub fn resolve_instructions(&self, instructions: Option<&str>) -> String {
        instructions
            .map(str::to_string)
            .unwrap_or_else(|| self.default_instructions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_membership() {
        let settings = Settings::new([1, 2]);
        assert!(settings.is_operator(1));
        assert!(!settings.is_operator(3));
        assert_eq!(settings.commission_percent, 30);
    }

    #[test]
    fn test_default_keywords() {
        assert_eq!(Settings::custom_instructions("default"), None);
        assert_eq!(Settings::custom_instructions(" - "), None);
        assert_eq!(Settings::custom_instructions("DEFAULT"), None);
        assert_eq!(
            Settings::custom_instructions(" card 1234 "),
            Some("card 1234".to_string())
        );
    }

    #[test]
    fn test_resolve_instructions() {
        let settings = Settings::new([]);
        assert_eq!(settings.resolve_instructions(Some("mine")), "mine");
        assert_eq!(settings.resolve_instructions(None), DEFAULT_INSTRUCTIONS);
    }
}
