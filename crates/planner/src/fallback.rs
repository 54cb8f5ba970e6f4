use yojana_core::{Plan, PlanAction};

/// Deterministic plan used whenever the oracle cannot produce one: search
/// with every whitespace token longer than three characters as a keyword,
/// order preserved, duplicates retained.
pub fn fallback_plan(text: &str) -> Plan {
    let keywords = text
        .split_whitespace()
        .filter(|word| word.chars().count() > 3)
        .map(str::to_string)
        .collect();

    Plan {
        action: PlanAction::SearchSchemes,
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_tokens_longer_than_three_chars() {
        let plan = fallback_plan("मला शासकीय योजना हवी आहे");
        assert_eq!(plan.action, PlanAction::SearchSchemes);
        // "मला" (3 chars), "हवी" (3) and "आहे" (3) drop out
        assert_eq!(plan.keywords, vec!["शासकीय", "योजना"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // "मला" is 9 bytes but only 3 chars, so it is excluded
        assert!(fallback_plan("मला").keywords.is_empty());
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let plan = fallback_plan("schemes farmer schemes");
        assert_eq!(plan.keywords, vec!["schemes", "farmer", "schemes"]);
    }

    #[test]
    fn empty_text_yields_empty_keywords() {
        assert!(fallback_plan("").keywords.is_empty());
    }
}
