//! Filter expression compilation
//!
//! Converts the current state of a panel into a single boolean filter string
//! understood by the target application's filter box.
//!
//! # Grammar
//!
//! ```text
//! AND OR NOT MATCHES ABSENT   keywords
//! ( )                         grouping
//! |                           alternation inside a MATCHES target list
//! ```
//!
//! # Rules
//!
//! Per group, INCLUDE controls become `(<label> MATCHES <name> OR <label>
//! ABSENT)` joined with `OR`; EXCLUDE controls become `(NOT <label> MATCHES
//! <name>)`; NEUTRAL controls contribute nothing; the two halves and the
//! optional `BLANKS ABSENT` clause join with `AND`. Non-empty group
//! contributions then join with `AND` in panel order.
//!
//! The `%_folderpath%` pseudo-field is special-cased: its contribution is a
//! single `NOT %_folderpath% MATCHES a|b|...` exclusion list, and an INCLUDE
//! control only ever folds its name into that list once an exclusion
//! already exists. Inclusion predicates are never emitted for this field.
//! This asymmetry is long-standing behavior in the original panel and is
//! kept as-is.

use crate::panel::{ControlState, Group, Panel};

/// Label of the pseudo-field that predicates on folder location.
pub const FOLDER_PATH_LABEL: &str = "%_folderpath%";

/// Compile every group and join the non-empty contributions with `AND`.
///
/// Pure function of the panel's current state; group order is preserved in
/// the output.
pub fn compile(panel: &Panel) -> String {
    let parts: Vec<String> = panel
        .groups()
        .iter()
        .map(compile_group)
        .filter(|s| !s.is_empty())
        .collect();

    normalize(&parts.join(" AND "))
}

/// Compile a single group's contribution, or an empty string if nothing in
/// the group applies.
pub fn compile_group(group: &Group) -> String {
    if group.label.is_empty() {
        return String::new();
    }

    let is_path = group.label == FOLDER_PATH_LABEL;
    let mut on_filters: Vec<String> = Vec::new();
    let mut off_filters: Vec<String> = Vec::new();

    for control in group.members() {
        match control.state {
            ControlState::Include => {
                if is_path {
                    // Folding rule: an include only matters as an exception
                    // once an exclusion list exists at this point in order.
                    if !off_filters.is_empty() {
                        off_filters.push(control.name.to_lowercase());
                    }
                } else {
                    on_filters.push(format!(
                        "({label} MATCHES {name} OR {label} ABSENT)",
                        label = group.label,
                        name = control.name
                    ));
                }
            }
            ControlState::Exclude => {
                if is_path {
                    let name = control.name.to_lowercase();
                    if !off_filters.contains(&name) {
                        off_filters.push(name);
                    }
                } else {
                    off_filters.push(format!(
                        "(NOT {} MATCHES {})",
                        group.label, control.name
                    ));
                }
            }
            ControlState::Neutral => {}
        }
    }

    let mut parts: Vec<String> = Vec::new();
    if is_path {
        if !off_filters.is_empty() {
            parts.push(format!(
                "NOT {} MATCHES {}",
                FOLDER_PATH_LABEL,
                off_filters.join("|")
            ));
        }
    } else {
        if !on_filters.is_empty() {
            parts.push(on_filters.join(" OR "));
        }
        parts.extend(off_filters);
    }

    let mut result = parts.join(" AND ");

    if group.no_blanks {
        if result.is_empty() {
            result = "BLANKS ABSENT".to_string();
        } else {
            result.push_str(" AND BLANKS ABSENT");
        }
    }

    result
}

/// Trim a raw filter string and strip one stray leading/trailing `AND` or
/// `OR` token left behind by concatenation.
///
/// Applied once, not recursively; a normalized string passes through
/// unchanged.
pub fn normalize(raw: &str) -> String {
    let mut s = raw.trim();

    for token in ["AND", "OR"] {
        if let Some(rest) = strip_leading_token(s, token) {
            s = rest;
            break;
        }
    }
    for token in ["AND", "OR"] {
        if let Some(rest) = strip_trailing_token(s, token) {
            s = rest;
            break;
        }
    }

    s.trim().to_string()
}

fn strip_leading_token<'a>(s: &'a str, token: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(token)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn strip_trailing_token<'a>(s: &'a str, token: &str) -> Option<&'a str> {
    let rest = s.strip_suffix(token)?;
    if rest.is_empty() || rest.ends_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

/// Collect diagnostics for groups that silently contribute nothing.
///
/// These are warnings, never errors: compilation continues for the other
/// groups.
pub fn panel_warnings(panel: &Panel) -> Vec<String> {
    let mut warnings = Vec::new();

    for (index, group) in panel.groups().iter().enumerate() {
        if group.label.is_empty() {
            warnings.push(format!(
                "Group at position {} has no label; its controls are ignored",
                index
            ));
            continue;
        }
        if group.is_empty() && !group.no_blanks {
            warnings.push(format!(
                "Group '{}' has no controls and contributes nothing",
                group.label
            ));
        }
        if group.label == FOLDER_PATH_LABEL {
            let has_exclude = group.members().any(|c| c.state == ControlState::Exclude);
            let has_include = group.members().any(|c| c.state == ControlState::Include);
            if has_include && !has_exclude {
                warnings.push(format!(
                    "Include on '{}' without any exclusion is ignored",
                    FOLDER_PATH_LABEL
                ));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_neutral_group_is_empty() {
        let group = Group::new("Genre")
            .with_control("rock", ControlState::Neutral)
            .with_control("jazz", ControlState::Neutral);
        assert_eq!(compile_group(&group), "");
    }

    #[test]
    fn test_single_include() {
        let group = Group::new("Genre").with_control("rock", ControlState::Include);
        assert_eq!(
            compile_group(&group),
            "(Genre MATCHES rock OR Genre ABSENT)"
        );
    }

    #[test]
    fn test_single_exclude() {
        let group = Group::new("Genre").with_control("rock", ControlState::Exclude);
        assert_eq!(compile_group(&group), "(NOT Genre MATCHES rock)");
    }

    #[test]
    fn test_includes_join_with_or_then_excludes_with_and() {
        let group = Group::new("Genre")
            .with_control("rock", ControlState::Include)
            .with_control("jazz", ControlState::Include)
            .with_control("polka", ControlState::Exclude);
        assert_eq!(
            compile_group(&group),
            "(Genre MATCHES rock OR Genre ABSENT) OR (Genre MATCHES jazz OR Genre ABSENT) \
             AND (NOT Genre MATCHES polka)"
        );
    }

    #[test]
    fn test_no_blanks_alone() {
        let group = Group::new("Genre").no_blanks(true);
        assert_eq!(compile_group(&group), "BLANKS ABSENT");
    }

    #[test]
    fn test_no_blanks_appends() {
        let group = Group::new("Genre")
            .no_blanks(true)
            .with_control("rock", ControlState::Include);
        assert_eq!(
            compile_group(&group),
            "(Genre MATCHES rock OR Genre ABSENT) AND BLANKS ABSENT"
        );
    }

    #[test]
    fn test_missing_label_contributes_nothing() {
        let group = Group::new("").with_control("rock", ControlState::Include);
        assert_eq!(compile_group(&group), "");
    }

    #[test]
    fn test_folderpath_exclusions_form_alternation() {
        let group = Group::new(FOLDER_PATH_LABEL)
            .with_control("Archive", ControlState::Exclude)
            .with_control("Incoming", ControlState::Exclude);
        assert_eq!(
            compile_group(&group),
            "NOT %_folderpath% MATCHES archive|incoming"
        );
    }

    #[test]
    fn test_folderpath_include_folds_after_exclude() {
        let group = Group::new(FOLDER_PATH_LABEL)
            .with_control("a", ControlState::Exclude)
            .with_control("b", ControlState::Include);
        assert_eq!(compile_group(&group), "NOT %_folderpath% MATCHES a|b");
    }

    #[test]
    fn test_folderpath_include_before_exclude_is_dropped() {
        // Order matters: the include sees an empty exclusion list.
        let group = Group::new(FOLDER_PATH_LABEL)
            .with_control("b", ControlState::Include)
            .with_control("a", ControlState::Exclude);
        assert_eq!(compile_group(&group), "NOT %_folderpath% MATCHES a");
    }

    #[test]
    fn test_folderpath_include_only_is_empty() {
        let group = Group::new(FOLDER_PATH_LABEL).with_control("b", ControlState::Include);
        assert_eq!(compile_group(&group), "");
    }

    #[test]
    fn test_folderpath_excludes_deduplicate() {
        let group = Group::new(FOLDER_PATH_LABEL)
            .with_control("Archive", ControlState::Exclude)
            .with_control("archive", ControlState::Exclude);
        assert_eq!(compile_group(&group), "NOT %_folderpath% MATCHES archive");
    }

    #[test]
    fn test_compile_joins_groups_with_and() {
        let mut panel = Panel::new();
        panel
            .push_group(Group::new("Genre").with_control("rock", ControlState::Include))
            .unwrap();
        panel
            .push_group(Group::new("Decade").no_blanks(true))
            .unwrap();
        assert_eq!(
            compile(&panel),
            "(Genre MATCHES rock OR Genre ABSENT) AND BLANKS ABSENT"
        );
    }

    #[test]
    fn test_compile_drops_empty_groups() {
        let mut panel = Panel::new();
        panel
            .push_group(Group::new("Genre").with_control("rock", ControlState::Neutral))
            .unwrap();
        panel
            .push_group(Group::new("Mood").with_control("calm", ControlState::Exclude))
            .unwrap();
        assert_eq!(compile(&panel), "(NOT Mood MATCHES calm)");
    }

    #[test]
    fn test_compile_empty_panel() {
        assert_eq!(compile(&Panel::new()), "");
    }

    #[test]
    fn test_normalize_strips_stray_tokens() {
        assert_eq!(normalize("  AND x AND y  "), "x AND y");
        assert_eq!(normalize("x OR y OR "), "x OR y");
        assert_eq!(normalize("AND"), "");
    }

    #[test]
    fn test_normalize_keeps_words_starting_with_tokens() {
        assert_eq!(normalize("ANDROID MATCHES x"), "ANDROID MATCHES x");
        assert_eq!(normalize("x MATCHES MINOR"), "x MATCHES MINOR");
    }

    #[test]
    fn test_normalize_is_idempotent_on_normalized_input() {
        let normalized = normalize(" AND (Genre MATCHES rock) ");
        assert_eq!(normalize(&normalized), normalized);
        let plain = "(Genre MATCHES rock OR Genre ABSENT)";
        assert_eq!(normalize(plain), plain);
    }

    #[test]
    fn test_warnings_for_empty_and_unlabeled_groups() {
        let mut panel = Panel::new();
        panel.push_group(Group::new("Genre")).unwrap();
        panel
            .push_group(Group::new("").with_control("x", ControlState::Include))
            .unwrap();
        let warnings = panel_warnings(&panel);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Genre"));
        assert!(warnings[1].contains("no label"));
    }
}
