//! State metadata schema

use earshot_core::EarconId;
use serde::{Deserialize, Serialize};

/// Message and cue announcing one value of a state flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMessage {
    pub msg_id: String,
    #[serde(default)]
    pub earcon: Option<EarconId>,
}

impl StateMessage {
    /// Create a state message without an earcon
    pub fn new(msg_id: impl Into<String>) -> Self {
        Self {
            msg_id: msg_id.into(),
            earcon: None,
        }
    }
}

/// Announcements for a tri-state flag: set, cleared, or undefined
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateInfo {
    #[serde(default)]
    pub on: Option<StateMessage>,
    #[serde(default)]
    pub off: Option<StateMessage>,
    #[serde(default)]
    pub omitted: Option<StateMessage>,
}

impl StateInfo {
    /// Pick the message for a flag value (`None` = undefined)
    pub fn message(&self, value: Option<bool>) -> Option<&StateMessage> {
        match value {
            Some(true) => self.on.as_ref(),
            Some(false) => self.off.as_ref(),
            None => self.omitted.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tri_state() {
        let ron_str = r#"
        #![enable(implicit_some)]
        (
            on: (msg_id: "checked", earcon: "CHECK_ON"),
            off: (msg_id: "unchecked"),
        )
        "#;

        let info: StateInfo = ron::from_str(ron_str).unwrap();
        let on = info.message(Some(true)).unwrap();
        assert_eq!(on.msg_id, "checked");
        assert_eq!(on.earcon, Some(EarconId::new("CHECK_ON")));
        assert_eq!(info.message(Some(false)).unwrap().msg_id, "unchecked");
        assert!(info.message(None).is_none());
    }
}
