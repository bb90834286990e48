use serde::{Deserialize, Serialize};

use super::Id;

/// Lowest and highest accepted star rating.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct Feedback {
    pub id: Option<Id>,
    pub message: Option<String>,
    pub rating: Option<u8>,
    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
}

/// Body for creating or editing feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewFeedback {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl NewFeedback {
    pub fn rating_in_range(&self) -> bool {
        self.rating
            .map(|r| (MIN_RATING..=MAX_RATING).contains(&r))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        let mut fb = NewFeedback { message: "Great canteen".into(), rating: None };
        assert!(fb.rating_in_range());
        fb.rating = Some(5);
        assert!(fb.rating_in_range());
        fb.rating = Some(0);
        assert!(!fb.rating_in_range());
        fb.rating = Some(6);
        assert!(!fb.rating_in_range());
    }

    #[test]
    fn test_rating_omitted_from_wire_when_absent() {
        let fb = NewFeedback { message: "ok".into(), rating: None };
        assert_eq!(serde_json::to_string(&fb).unwrap(), r#"{"message":"ok"}"#);
    }
}
