use std::fmt;

use serde::{Deserialize, Serialize};

/// Depth/audience label of an assessment report.
///
/// The set is closed: every classification ends in one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    Basic,
    Full,
    Sales,
    Career,
    Student,
    Advanced,
    Managerial,
    Communication,
    #[serde(rename = "Team Build")]
    TeamBuild,
    #[serde(rename = "Career entry level")]
    CareerEntryLevel,
}

impl ReportType {
    /// Keyword match order. Phrases that contain another label as a substring
    /// ("Career entry level" contains "Career") come before that label.
    pub const MATCH_ORDER: [ReportType; 10] = [
        ReportType::CareerEntryLevel,
        ReportType::TeamBuild,
        ReportType::Communication,
        ReportType::Managerial,
        ReportType::Advanced,
        ReportType::Student,
        ReportType::Career,
        ReportType::Sales,
        ReportType::Basic,
        ReportType::Full,
    ];

    /// Label sent to the provider and shown in the email.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Basic => "Basic",
            ReportType::Full => "Full",
            ReportType::Sales => "Sales",
            ReportType::Career => "Career",
            ReportType::Student => "Student",
            ReportType::Advanced => "Advanced",
            ReportType::Managerial => "Managerial",
            ReportType::Communication => "Communication",
            ReportType::TeamBuild => "Team Build",
            ReportType::CareerEntryLevel => "Career entry level",
        }
    }

    /// Exact (case-insensitive) label lookup.
    pub fn from_label(s: &str) -> Option<Self> {
        let needle = s.trim();
        Self::MATCH_ORDER
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
    }
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Basic
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Third-party service a buyer gets registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentProvider {
    /// Primary provider, used whenever nothing points elsewhere.
    #[default]
    Disc,
    Harrason,
}

impl AssessmentProvider {
    /// Keyword that routes a purchase to the alternate provider.
    pub const ALTERNATE_KEYWORD: &'static str = "harrason";

    pub fn display_name(&self) -> &'static str {
        match self {
            AssessmentProvider::Disc => "DISC Asia+",
            AssessmentProvider::Harrason => "Harrason",
        }
    }

    /// Resolve a free-form assessment type such as `"DISC"` or `"Harrason Leadership"`.
    pub fn from_label(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        if lower.contains(Self::ALTERNATE_KEYWORD) {
            Some(AssessmentProvider::Harrason)
        } else if lower.contains("disc") {
            Some(AssessmentProvider::Disc)
        } else {
            None
        }
    }
}

impl fmt::Display for AssessmentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&ReportType::CareerEntryLevel).unwrap(),
            "\"Career entry level\""
        );
        assert_eq!(
            serde_json::to_string(&ReportType::TeamBuild).unwrap(),
            "\"Team Build\""
        );
        assert_eq!(serde_json::to_string(&ReportType::Basic).unwrap(), "\"Basic\"");
    }

    #[test]
    fn test_match_order_puts_longer_phrases_first() {
        let order = ReportType::MATCH_ORDER;
        for (i, earlier) in order.iter().enumerate() {
            for later in &order[i + 1..] {
                let earlier_lc = earlier.as_str().to_lowercase();
                let later_lc = later.as_str().to_lowercase();
                assert!(
                    !later_lc.contains(&earlier_lc),
                    "{} must be matched before {}",
                    later,
                    earlier
                );
            }
        }
    }

    #[test]
    fn test_from_label() {
        assert_eq!(ReportType::from_label("advanced"), Some(ReportType::Advanced));
        assert_eq!(ReportType::from_label(" Team Build "), Some(ReportType::TeamBuild));
        assert_eq!(ReportType::from_label("Advanced Report"), None);
    }

    #[test]
    fn test_provider_from_label() {
        assert_eq!(AssessmentProvider::from_label("DISC"), Some(AssessmentProvider::Disc));
        assert_eq!(
            AssessmentProvider::from_label("Harrason Assessments"),
            Some(AssessmentProvider::Harrason)
        );
        assert_eq!(AssessmentProvider::from_label("MBTI"), None);
        assert_eq!(AssessmentProvider::default(), AssessmentProvider::Disc);
    }
}
