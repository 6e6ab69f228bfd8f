//! User-overridable keyboard shortcut registry.
//!
//! The editor only ever sees resolved [`Action`]s; rebinding changes which
//! keys trigger an action, never what the action does.

use crate::input::KeyCombo;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

/// Errors from shortcut parsing, rebinding and loading.
#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("{combo} is already bound to {other}")]
    Conflict { combo: KeyCombo, other: Action },
    #[error("invalid key combination: {0:?}")]
    Parse(String),
    #[error("invalid shortcut overrides: {0}")]
    Json(#[from] serde_json::Error),
}

/// Logical editor action a shortcut resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Undo,
    Redo,
    Save,
    Copy,
    Paste,
    Duplicate,
    DeleteSelected,
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
    ToggleSnap,
    SelectAll,
    Cancel,
}

impl Action {
    pub const ALL: [Action; 14] = [
        Action::Undo,
        Action::Redo,
        Action::Save,
        Action::Copy,
        Action::Paste,
        Action::Duplicate,
        Action::DeleteSelected,
        Action::BringForward,
        Action::SendBackward,
        Action::BringToFront,
        Action::SendToBack,
        Action::ToggleSnap,
        Action::SelectAll,
        Action::Cancel,
    ];

    /// Stable action name, as persisted.
    pub fn name(self) -> &'static str {
        match self {
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::Save => "save",
            Action::Copy => "copy",
            Action::Paste => "paste",
            Action::Duplicate => "duplicate",
            Action::DeleteSelected => "deleteSelected",
            Action::BringForward => "bringForward",
            Action::SendBackward => "sendBackward",
            Action::BringToFront => "bringToFront",
            Action::SendToBack => "sendToBack",
            Action::ToggleSnap => "toggleSnap",
            Action::SelectAll => "selectAll",
            Action::Cancel => "cancel",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::Undo => "Undo",
            Action::Redo => "Redo",
            Action::Save => "Save",
            Action::Copy => "Copy selected element",
            Action::Paste => "Paste element",
            Action::Duplicate => "Duplicate selected element",
            Action::DeleteSelected => "Delete selected elements",
            Action::BringForward => "Bring forward",
            Action::SendBackward => "Send backward",
            Action::BringToFront => "Bring to front",
            Action::SendToBack => "Send to back",
            Action::ToggleSnap => "Toggle snap to grid",
            Action::SelectAll => "Select all elements",
            Action::Cancel => "Cancel current action",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from action to the key combos that trigger it.
///
/// Loading goes through [`ShortcutRegistry::from_json`] so that every combo
/// has a single owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShortcutRegistry {
    bindings: BTreeMap<Action, Vec<KeyCombo>>,
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }
}

fn default_bindings() -> BTreeMap<Action, Vec<KeyCombo>> {
    let k = KeyCombo::new;
    BTreeMap::from([
        (Action::Undo, vec![k("Z").ctrl()]),
        (Action::Redo, vec![k("Z").ctrl().shift(), k("Y").ctrl()]),
        (Action::Save, vec![k("S").ctrl()]),
        (Action::Copy, vec![k("C").ctrl()]),
        (Action::Paste, vec![k("V").ctrl()]),
        (Action::Duplicate, vec![k("D").ctrl()]),
        (Action::DeleteSelected, vec![k("Delete"), k("Backspace")]),
        (Action::BringForward, vec![k("]")]),
        (Action::SendBackward, vec![k("[")]),
        (Action::BringToFront, vec![k("]").shift()]),
        (Action::SendToBack, vec![k("[").shift()]),
        (Action::ToggleSnap, vec![k("G")]),
        (Action::SelectAll, vec![k("A").ctrl()]),
        (Action::Cancel, vec![k("Escape")]),
    ])
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a key combo to its action.
    pub fn resolve(&self, combo: &KeyCombo) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, combos)| combos.contains(combo))
            .map(|(action, _)| *action)
    }

    /// Combos currently bound to `action`.
    pub fn bindings(&self, action: Action) -> &[KeyCombo] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rebind `action` to a single combo.
    ///
    /// Fails with [`ShortcutError::Conflict`] when a different action already
    /// uses the combo; the registry is left unchanged in that case.
    pub fn update_shortcut(&mut self, action: Action, combo: KeyCombo) -> Result<(), ShortcutError> {
        if let Some(other) = self.resolve(&combo).filter(|&other| other != action) {
            return Err(ShortcutError::Conflict { combo, other });
        }
        log::debug!("rebinding {action} to {combo}");
        self.bindings.insert(action, vec![combo]);
        Ok(())
    }

    /// Parse `combo` and rebind `action` to it.
    pub fn update_shortcut_str(&mut self, action: Action, combo: &str) -> Result<(), ShortcutError> {
        self.update_shortcut(action, combo.parse()?)
    }

    /// Restore the built-in bindings.
    pub fn reset_defaults(&mut self) {
        self.bindings = default_bindings();
    }

    /// All bindings with their formatted combos, for help screens.
    pub fn describe(&self) -> Vec<(Action, String)> {
        Action::ALL
            .iter()
            .map(|&action| {
                let keys = self
                    .bindings(action)
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" / ");
                (action, keys)
            })
            .collect()
    }

    /// Load overrides from JSON; unspecified actions keep their defaults.
    ///
    /// Fails with [`ShortcutError::Conflict`] if, after merging, a combo
    /// would trigger two actions. Swapping two bindings in one file is fine.
    pub fn from_json(json: &str) -> Result<Self, ShortcutError> {
        let overrides: BTreeMap<Action, Vec<KeyCombo>> = serde_json::from_str(json)?;
        let mut registry = Self::default();
        registry.bindings.extend(overrides);
        registry.check_unique()?;
        Ok(registry)
    }

    fn check_unique(&self) -> Result<(), ShortcutError> {
        let mut owners: HashMap<&KeyCombo, Action> = HashMap::new();
        for (&action, combos) in &self.bindings {
            for combo in combos {
                match owners.get(combo) {
                    Some(&other) if other != action => {
                        log::warn!("shortcut {combo} bound to both {other} and {action}");
                        return Err(ShortcutError::Conflict {
                            combo: combo.clone(),
                            other,
                        });
                    }
                    _ => {
                        owners.insert(combo, action);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn test_defaults_resolve() {
        let reg = ShortcutRegistry::new();
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        let ctrl_shift = Modifiers { shift: true, ..ctrl };
        assert_eq!(reg.resolve(&KeyCombo::from_event("z", ctrl)), Some(Action::Undo));
        assert_eq!(reg.resolve(&KeyCombo::from_event("z", ctrl_shift)), Some(Action::Redo));
        assert_eq!(reg.resolve(&KeyCombo::from_event("y", ctrl)), Some(Action::Redo));
        assert_eq!(
            reg.resolve(&KeyCombo::from_event("Backspace", Modifiers::NONE)),
            Some(Action::DeleteSelected)
        );
        assert_eq!(
            reg.resolve(&KeyCombo::from_event("}", Modifiers::NONE)),
            Some(Action::BringToFront)
        );
        assert_eq!(reg.resolve(&KeyCombo::new("Q")), None);
    }

    #[test]
    fn test_no_default_conflicts() {
        let reg = ShortcutRegistry::new();
        let mut seen = std::collections::HashSet::new();
        for action in Action::ALL {
            for combo in reg.bindings(action) {
                assert!(seen.insert(combo.clone()), "duplicate binding {combo}");
            }
        }
    }

    #[test]
    fn test_update_conflict_reports_other_action() {
        let mut reg = ShortcutRegistry::new();
        let err = reg
            .update_shortcut(Action::Duplicate, KeyCombo::new("C").ctrl())
            .unwrap_err();
        assert!(matches!(
            err,
            ShortcutError::Conflict { combo, other: Action::Copy } if combo == KeyCombo::new("C").ctrl()
        ));
        assert_eq!(reg.bindings(Action::Duplicate), &[KeyCombo::new("D").ctrl()]);
    }

    #[test]
    fn test_update_and_reset() {
        let mut reg = ShortcutRegistry::new();
        reg.update_shortcut_str(Action::ToggleSnap, "Alt+G").unwrap();
        assert_eq!(reg.resolve(&KeyCombo::new("G").alt()), Some(Action::ToggleSnap));
        assert_eq!(reg.resolve(&KeyCombo::new("G")), None);

        // Rebinding to a combo the action already owns is fine.
        reg.update_shortcut_str(Action::ToggleSnap, "Alt+G").unwrap();

        reg.reset_defaults();
        assert_eq!(reg.resolve(&KeyCombo::new("G")), Some(Action::ToggleSnap));
    }

    #[test]
    fn test_update_parse_error() {
        let mut reg = ShortcutRegistry::new();
        assert!(matches!(
            reg.update_shortcut_str(Action::Save, "Super+"),
            Err(ShortcutError::Parse(_))
        ));
    }

    #[test]
    fn test_json_overrides() {
        let reg = ShortcutRegistry::from_json(r#"{"save":["Ctrl+Shift+S"]}"#).unwrap();
        assert_eq!(reg.bindings(Action::Save), &[KeyCombo::new("S").ctrl().shift()]);
        assert_eq!(reg.bindings(Action::Undo), &[KeyCombo::new("Z").ctrl()]);

        let back = ShortcutRegistry::from_json(&reg.to_json().unwrap()).unwrap();
        assert_eq!(back, reg);
    }

    #[test]
    fn test_json_override_conflict_is_rejected() {
        let err = ShortcutRegistry::from_json(r#"{"save":["Ctrl+Z"]}"#).unwrap_err();
        assert!(matches!(
            err,
            ShortcutError::Conflict { combo, other: Action::Undo } if combo == KeyCombo::new("Z").ctrl()
        ));
    }

    #[test]
    fn test_json_override_swap_is_allowed() {
        let reg = ShortcutRegistry::from_json(r#"{"copy":["Ctrl+V"],"paste":["Ctrl+C"]}"#).unwrap();
        assert_eq!(reg.resolve(&KeyCombo::new("V").ctrl()), Some(Action::Copy));
        assert_eq!(reg.resolve(&KeyCombo::new("C").ctrl()), Some(Action::Paste));
    }

    #[test]
    fn test_json_syntax_error() {
        assert!(matches!(
            ShortcutRegistry::from_json("{ nope"),
            Err(ShortcutError::Json(_))
        ));
    }

    #[test]
    fn test_describe_lists_every_action() {
        let described = ShortcutRegistry::new().describe();
        assert_eq!(described.len(), Action::ALL.len());
        let redo = described.iter().find(|(a, _)| *a == Action::Redo).unwrap();
        assert_eq!(redo.1, "Ctrl+Shift+Z / Ctrl+Y");
    }
}
