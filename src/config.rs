use crate::panel::{ControlState, Group, Panel, PanelError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Panel definition as written in a TOML file.
///
/// Control states are stored in their raw 0/1/2 encoding so a saved panel
/// matches what the original sliders displayed; they are validated when the
/// panel is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Free-form label for the loaded panel.
    pub panel_name: String,
    pub sink: SinkRules,
    pub groups: Vec<GroupConfig>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            panel_name: "base".to_string(),
            sink: SinkRules::default(),
            groups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SinkRules {
    /// External command that types the escaped filter into the target
    /// application; the escaped string is appended as the last argument.
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GroupConfig {
    pub label: String,
    pub no_blanks: bool,
    pub controls: Vec<ControlConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub name: String,
    /// Raw tri-state encoding: 0 exclude, 1 neutral, 2 include.
    pub state: i64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            state: ControlState::Neutral.as_raw(),
        }
    }
}

impl PanelConfig {
    /// Build a live panel from this definition, validating raw states and
    /// label uniqueness.
    pub fn build_panel(&self) -> Result<Panel, PanelError> {
        let mut panel = Panel::new();
        for group_cfg in &self.groups {
            let mut group = Group::new(group_cfg.label.clone()).no_blanks(group_cfg.no_blanks);
            for control_cfg in &group_cfg.controls {
                let state = ControlState::from_raw(control_cfg.state).ok_or_else(|| {
                    PanelError::InvalidState {
                        group: group_cfg.label.clone(),
                        control: control_cfg.name.clone(),
                        value: control_cfg.state,
                    }
                })?;
                group = group.with_control(control_cfg.name.clone(), state);
            }
            panel.push_group(group)?;
        }
        Ok(panel)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<PanelConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<PanelConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<PanelConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static PanelConfig {
    static DEFAULT_CONFIG: LazyLock<PanelConfig> = LazyLock::new(PanelConfig::default);
    &DEFAULT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_panel_converts_raw_states() {
        let cfg: PanelConfig = toml::from_str(
            r#"
            panel_name = "test"

            [[groups]]
            label = "Genre"
            controls = [
                { name = "rock", state = 2 },
                { name = "jazz", state = 0 },
                { name = "folk" },
            ]
            "#,
        )
        .unwrap();

        let panel = cfg.build_panel().unwrap();
        let group = panel.group("Genre").unwrap();
        let states: Vec<_> = group.members().map(|c| c.state).collect();
        assert_eq!(
            states,
            vec![
                ControlState::Include,
                ControlState::Exclude,
                ControlState::Neutral
            ]
        );
    }

    #[test]
    fn test_build_panel_rejects_invalid_raw_state() {
        let cfg: PanelConfig = toml::from_str(
            r#"
            [[groups]]
            label = "Genre"
            controls = [{ name = "rock", state = 3 }]
            "#,
        )
        .unwrap();

        let err = cfg.build_panel().unwrap_err();
        match err {
            PanelError::InvalidState {
                group,
                control,
                value,
            } => {
                assert_eq!(group, "Genre");
                assert_eq!(control, "rock");
                assert_eq!(value, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_config_has_no_groups() {
        let cfg = default_config();
        assert_eq!(cfg.panel_name, "base");
        assert!(cfg.groups.is_empty());
        assert!(cfg.sink.command.is_empty());
    }
}
