use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moderation status of a media submission
///
/// `Pending` is the initial state. `Approved` and `Rejected` are reached only
/// through an admin review and have no further transitions, although a later
/// review may overwrite one with the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// Whether a review has decided this submission
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Invalid review status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_not_terminal() {
        assert!(!ReviewStatus::Pending.is_terminal());
    }

    #[test]
    fn test_decisions_are_terminal() {
        assert!(ReviewStatus::Approved.is_terminal());
        assert!(ReviewStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("APPROVED".parse::<ReviewStatus>().unwrap(), ReviewStatus::Approved);
        assert_eq!("rejected".parse::<ReviewStatus>().unwrap(), ReviewStatus::Rejected);
        assert!("complete".parse::<ReviewStatus>().is_err());
    }

    #[test]
    fn test_deserializes_from_lowercase_json() {
        let status: ReviewStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, ReviewStatus::Pending);
    }
}
