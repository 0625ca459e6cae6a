//! Directional class labels shared by the labeler, the classifier and the decision engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Three-way direction class. The integer values are the ones classifiers
/// are trained on and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Label {
    Down = -1,
    NoTrade = 0,
    Up = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown class label {0} (expected -1, 0 or 1)")]
pub struct UnknownLabel(pub i8);

impl Label {
    /// All labels in ascending value order.
    pub const ALL: [Label; 3] = [Label::Down, Label::NoTrade, Label::Up];

    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Down => "DOWN",
            Label::NoTrade => "NO_TRADE",
            Label::Up => "UP",
        }
    }
}

impl From<Label> for i8 {
    fn from(label: Label) -> Self {
        label.value()
    }
}

impl TryFrom<i8> for Label {
    type Error = UnknownLabel;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Label::Down),
            0 => Ok(Label::NoTrade),
            1 => Ok(Label::Up),
            other => Err(UnknownLabel(other)),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_values_are_stable() {
        assert_eq!(Label::Down.value(), -1);
        assert_eq!(Label::NoTrade.value(), 0);
        assert_eq!(Label::Up.value(), 1);
    }

    #[test]
    fn label_try_from_rejects_unknown() {
        assert_eq!(Label::try_from(1), Ok(Label::Up));
        assert_eq!(Label::try_from(2), Err(UnknownLabel(2)));
    }

    #[test]
    fn label_serializes_as_integer() {
        let json = serde_json::to_string(&vec![Label::Down, Label::Up]).unwrap();
        assert_eq!(json, "[-1,1]");
        let back: Vec<Label> = serde_json::from_str("[0,-1]").unwrap();
        assert_eq!(back, vec![Label::NoTrade, Label::Down]);
        assert!(serde_json::from_str::<Label>("5").is_err());
    }
}
