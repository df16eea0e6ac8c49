//! Tri-state control model
//!
//! A panel is an ordered set of labeled groups; each group predicates one
//! field of the target application (a tag field, or the `%_folderpath%`
//! pseudo-field) and owns an ordered list of tri-state controls. The first
//! control in every group is the group toggle: setting it cascades its state
//! to every sibling, and it never contributes a predicate of its own.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name the original UI gave the group-toggle control.
pub const GROUP_TOGGLE_NAME: &str = "*";

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Invalid control state {value} for '{group}:{control}' (valid states are 0, 1, 2)")]
    InvalidState {
        group: String,
        control: String,
        value: i64,
    },
    #[error("Duplicate group label '{0}'")]
    DuplicateLabel(String),
    #[error("Unknown group '{0}'")]
    UnknownGroup(String),
    #[error("Unknown control '{control}' in group '{group}'")]
    UnknownControl { group: String, control: String },
}

/// The three positions of a control, encoded 0/1/2 like the original slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlState {
    Exclude,
    #[default]
    Neutral,
    Include,
}

impl ControlState {
    /// Decode a raw encoded value; anything outside 0..=2 is rejected.
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(ControlState::Exclude),
            1 => Some(ControlState::Neutral),
            2 => Some(ControlState::Include),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> i64 {
        match self {
            ControlState::Exclude => 0,
            ControlState::Neutral => 1,
            ControlState::Include => 2,
        }
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlState::Exclude => "exclude",
            ControlState::Neutral => "neutral",
            ControlState::Include => "include",
        };
        write!(f, "{}", name)
    }
}

/// A single tri-state control: one parameter value within a group.
#[derive(Debug, Clone)]
pub struct Control {
    /// The parameter name this control predicates (e.g. "rock").
    pub name: String,
    pub state: ControlState,
    /// Group toggles cascade rather than predicate.
    pub is_toggle: bool,
}

impl Control {
    pub fn new(name: impl Into<String>, state: ControlState) -> Self {
        Control {
            name: name.into(),
            state,
            is_toggle: false,
        }
    }

    fn toggle() -> Self {
        Control {
            name: GROUP_TOGGLE_NAME.to_string(),
            state: ControlState::Neutral,
            is_toggle: true,
        }
    }
}

/// A labeled cluster of controls all predicating the same field.
#[derive(Debug, Clone)]
pub struct Group {
    /// The field name predicates are built against.
    pub label: String,
    /// When set, the group always contributes a blank-exclusion predicate.
    pub no_blanks: bool,
    controls: Vec<Control>,
}

impl Group {
    /// Create a group whose only control is the implicit toggle.
    pub fn new(label: impl Into<String>) -> Self {
        Group {
            label: label.into(),
            no_blanks: false,
            controls: vec![Control::toggle()],
        }
    }

    pub fn no_blanks(mut self, no_blanks: bool) -> Self {
        self.no_blanks = no_blanks;
        self
    }

    /// Append a non-toggle control.
    pub fn with_control(mut self, name: impl Into<String>, state: ControlState) -> Self {
        self.controls.push(Control::new(name, state));
        self
    }

    /// All controls, toggle first.
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// The controls that can contribute predicates (everything but the toggle).
    pub fn members(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(|c| !c.is_toggle)
    }

    /// True when the group has no controls beyond the toggle.
    pub fn is_empty(&self) -> bool {
        self.members().next().is_none()
    }

    /// Set the state of a single non-toggle control.
    ///
    /// Addressing the toggle by its `*` name routes through the cascade
    /// instead, matching how the original panel reacted to it.
    pub fn set_state(&mut self, name: &str, state: ControlState) -> Result<(), PanelError> {
        if name == GROUP_TOGGLE_NAME {
            self.apply_group_toggle(state);
            return Ok(());
        }
        let control = self
            .controls
            .iter_mut()
            .find(|c| !c.is_toggle && c.name == name)
            .ok_or_else(|| PanelError::UnknownControl {
                group: self.label.clone(),
                control: name.to_string(),
            })?;
        control.state = state;
        Ok(())
    }

    /// Cascade `state` to every control in the group.
    ///
    /// The toggle's own value is updated as well but is never read by the
    /// compiler; only the siblings matter.
    pub fn apply_group_toggle(&mut self, state: ControlState) {
        for control in &mut self.controls {
            control.state = state;
        }
    }
}

/// An ordered collection of groups with unique labels.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    groups: Vec<Group>,
}

impl Panel {
    pub fn new() -> Self {
        Panel::default()
    }

    /// Add a group, rejecting duplicate labels.
    pub fn push_group(&mut self, group: Group) -> Result<(), PanelError> {
        if self.groups.iter().any(|g| g.label == group.label) {
            return Err(PanelError::DuplicateLabel(group.label));
        }
        self.groups.push(group);
        Ok(())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, label: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.label == label)
    }

    pub fn group_mut(&mut self, label: &str) -> Result<&mut Group, PanelError> {
        self.groups
            .iter_mut()
            .find(|g| g.label == label)
            .ok_or_else(|| PanelError::UnknownGroup(label.to_string()))
    }

    /// Set one control's state, addressed by group label and control name.
    pub fn set_state(
        &mut self,
        group: &str,
        control: &str,
        state: ControlState,
    ) -> Result<(), PanelError> {
        self.group_mut(group)?.set_state(control, state)
    }

    /// Cascade a state to every control in the named group.
    pub fn apply_group_toggle(&mut self, group: &str, state: ControlState) -> Result<(), PanelError> {
        self.group_mut(group)?.apply_group_toggle(state);
        Ok(())
    }
}
