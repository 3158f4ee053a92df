//! Additive risk scoring.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0 => Self::Low,
            1..=2 => Self::Medium,
            3..=4 => Self::High,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn is_elevated(&self) -> bool {
        *self >= Self::High
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score, level and the reasons that produced them. Only [`score_risk`]
/// builds one, so the level always agrees with the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    #[serde(rename = "risk_score")]
    score: u32,
    #[serde(rename = "risk_level")]
    level: RiskLevel,
    #[serde(rename = "risk_reasons")]
    reasons: Vec<String>,
}

impl RiskAssessment {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> RiskLevel {
        self.level
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

/// Words in a change description that usually break callers, in priority order.
const BREAKING_WORDS: &[&str] = &[
    "rename",
    "delete",
    "remove",
    "signature",
    "parameter",
    "return type",
];

pub fn score_risk(
    dependent_count: usize,
    public_export_count: usize,
    total_usage_count: usize,
    proposed_changes: Option<&str>,
) -> RiskAssessment {
    let mut score = 0;
    let mut reasons = Vec::new();

    match dependent_count {
        0 => reasons.push("No files depend on this - changes are isolated".to_string()),
        1 => {
            score += 1;
            reasons.push("1 file depends on this".to_string());
        }
        2 => {
            score += 1;
            reasons.push("2 files depend on this".to_string());
        }
        3..=5 => {
            score += 2;
            reasons.push(format!("{dependent_count} files depend on this - moderate reach"));
        }
        _ => {
            score += 3;
            reasons.push(format!("{dependent_count} files depend on this - wide impact"));
        }
    }

    if public_export_count > 10 {
        score += 1;
        reasons.push(format!("File exports {public_export_count} public symbols"));
    }

    if total_usage_count > 20 {
        score += 2;
        reasons.push(format!(
            "Symbols are used {total_usage_count} times across dependents"
        ));
    } else if total_usage_count > 5 {
        score += 1;
        reasons.push(format!("Symbols are used {total_usage_count} times"));
    }

    if let Some(changes) = proposed_changes {
        let lowered = changes.to_lowercase();
        if let Some(word) = BREAKING_WORDS.iter().find(|w| lowered.contains(*w)) {
            score += 1;
            reasons.push(format!("Proposed change involves '{word}' - may break callers"));
        }
    }

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_file_is_low() {
        let risk = score_risk(0, 3, 0, None);
        assert_eq!(risk.score(), 0);
        assert_eq!(risk.level(), RiskLevel::Low);
        assert_eq!(
            risk.reasons(),
            ["No files depend on this - changes are isolated"]
        );
    }

    #[test]
    fn test_single_dependent_single_usage() {
        let risk = score_risk(1, 2, 1, None);
        assert_eq!(risk.score(), 1);
        assert_eq!(risk.level(), RiskLevel::Medium);
        assert_eq!(risk.reasons(), ["1 file depends on this"]);
    }

    #[test]
    fn test_wide_reach_with_rename_is_critical() {
        let risk = score_risk(6, 2, 25, Some("rename the login function"));
        assert_eq!(risk.score(), 6);
        assert_eq!(risk.level(), RiskLevel::Critical);
        assert_eq!(
            risk.reasons(),
            [
                "6 files depend on this - wide impact",
                "Symbols are used 25 times across dependents",
                "Proposed change involves 'rename' - may break callers",
            ]
        );
    }

    #[test]
    fn test_dependent_bands() {
        assert_eq!(score_risk(2, 0, 0, None).reasons()[0], "2 files depend on this");
        assert_eq!(score_risk(2, 0, 0, None).score(), 1);
        assert_eq!(score_risk(3, 0, 0, None).score(), 2);
        assert_eq!(
            score_risk(5, 0, 0, None).reasons()[0],
            "5 files depend on this - moderate reach"
        );
        assert_eq!(score_risk(6, 0, 0, None).score(), 3);
    }

    #[test]
    fn test_export_and_usage_thresholds() {
        assert_eq!(score_risk(0, 10, 0, None).score(), 0);
        assert_eq!(score_risk(0, 11, 0, None).score(), 1);
        assert_eq!(score_risk(0, 0, 5, None).score(), 0);
        assert_eq!(score_risk(0, 0, 6, None).score(), 1);
        assert_eq!(score_risk(0, 0, 20, None).score(), 1);
        assert_eq!(score_risk(0, 0, 21, None).score(), 2);
    }

    #[test]
    fn test_only_first_keyword_counts() {
        let risk = score_risk(0, 0, 0, Some("Remove the PARAMETER and change the Return Type"));
        assert_eq!(risk.score(), 1);
        assert_eq!(
            risk.reasons().last().map(String::as_str),
            Some("Proposed change involves 'remove' - may break callers")
        );

        let risk = score_risk(0, 0, 0, Some("tweak the docstring"));
        assert_eq!(risk.score(), 0);
        assert_eq!(risk.reasons().len(), 1);
    }

    #[test]
    fn test_level_boundaries() {
        let levels: Vec<_> = (0..7).map(RiskLevel::from_score).collect();
        assert_eq!(
            levels,
            vec![
                RiskLevel::Low,
                RiskLevel::Medium,
                RiskLevel::Medium,
                RiskLevel::High,
                RiskLevel::High,
                RiskLevel::Critical,
                RiskLevel::Critical,
            ]
        );
    }

    #[test]
    fn test_more_dependents_never_lowers_level() {
        for usages in [0, 6, 25] {
            let mut previous = RiskLevel::Low;
            for dependents in 0..12 {
                let level = score_risk(dependents, 4, usages, Some("rename")).level();
                assert!(level >= previous);
                previous = level;
            }
        }
    }
}
