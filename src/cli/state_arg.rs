use crate::panel::ControlState;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateArgError {
    #[error("Expected 'GROUP:CONTROL=STATE', got: {0}")]
    InvalidSetArg(String),
    #[error("Expected 'GROUP=STATE', got: {0}")]
    InvalidAllArg(String),
    #[error("Unknown state '{0}'. Valid states are: exclude (0), neutral (1), include (2)")]
    UnknownState(String),
}

/// Parse a state name or its raw digit encoding.
pub fn parse_state(s: &str) -> Result<ControlState, StateArgError> {
    match s.to_lowercase().as_str() {
        "exclude" | "off" | "0" => Ok(ControlState::Exclude),
        "neutral" | "1" => Ok(ControlState::Neutral),
        "include" | "on" | "2" => Ok(ControlState::Include),
        _ => Err(StateArgError::UnknownState(s.to_string())),
    }
}

/// A `--set GROUP:CONTROL=STATE` override for a single control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetArg {
    pub group: String,
    pub control: String,
    pub state: ControlState,
}

impl FromStr for SetArg {
    type Err = StateArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, state) = s
            .rsplit_once('=')
            .ok_or_else(|| StateArgError::InvalidSetArg(s.to_string()))?;
        let (group, control) = target
            .split_once(':')
            .ok_or_else(|| StateArgError::InvalidSetArg(s.to_string()))?;
        if group.is_empty() || control.is_empty() {
            return Err(StateArgError::InvalidSetArg(s.to_string()));
        }
        Ok(SetArg {
            group: group.to_string(),
            control: control.to_string(),
            state: parse_state(state)?,
        })
    }
}

/// An `--all GROUP=STATE` override cascading through the group toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllArg {
    pub group: String,
    pub state: ControlState,
}

impl FromStr for AllArg {
    type Err = StateArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, state) = s
            .rsplit_once('=')
            .ok_or_else(|| StateArgError::InvalidAllArg(s.to_string()))?;
        if group.is_empty() || group.contains(':') {
            return Err(StateArgError::InvalidAllArg(s.to_string()));
        }
        Ok(AllArg {
            group: group.to_string(),
            state: parse_state(state)?,
        })
    }
}
