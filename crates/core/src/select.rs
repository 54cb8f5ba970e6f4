use crate::models::ScoredCandidate;

/// Pick the conversation's current focus from the scored candidates: the
/// first eligible one in retrieval order, otherwise the first overall as a
/// closest-match suggestion. There is no numeric ranking.
pub fn select_candidate(candidates: &[ScoredCandidate]) -> Option<&ScoredCandidate> {
    candidates
        .iter()
        .find(|candidate| candidate.verdict.eligible)
        .or_else(|| candidates.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EligibilityVerdict, Scheme};

    fn candidate(id: &str, eligible: bool) -> ScoredCandidate {
        ScoredCandidate {
            scheme: Scheme {
                id: id.to_string(),
                name: id.to_string(),
                description: String::new(),
                eligibility: Default::default(),
            },
            verdict: EligibilityVerdict {
                eligible,
                missing: Vec::new(),
            },
        }
    }

    #[test]
    fn empty_candidates_yield_no_selection() {
        assert!(select_candidate(&[]).is_none());
    }

    #[test]
    fn first_eligible_wins_over_earlier_ineligible() {
        let candidates = vec![
            candidate("a", false),
            candidate("b", true),
            candidate("c", true),
        ];
        let selected = select_candidate(&candidates).unwrap();
        assert_eq!(selected.scheme.id, "b");
    }

    #[test]
    fn falls_back_to_first_when_none_eligible() {
        let candidates = vec![candidate("a", false), candidate("b", false)];
        let selected = select_candidate(&candidates).unwrap();
        assert_eq!(selected.scheme.id, "a");
    }
}
