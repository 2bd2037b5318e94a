use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NewWidget,
    NextKind,
    PrevKind,
    RemoveWidget,
    ToggleDrag,
    ToggleResize,
    ToggleGrid,
    ToggleHelp,
    CloseHelp,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::NewWidget => "Add widget of the selected kind",
            Action::NextKind => "Select next widget kind",
            Action::PrevKind => "Select previous widget kind",
            Action::RemoveWidget => "Remove last touched widget",
            Action::ToggleDrag => "Toggle dragging",
            Action::ToggleResize => "Toggle resizing",
            Action::ToggleGrid => "Toggle grid lines",
            Action::ToggleHelp => "Toggle help",
            Action::CloseHelp => "Close help",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        // Terminals disagree on whether uppercase letters carry SHIFT.
        let mods = if matches!(key.code, KeyCode::Char(c) if c.is_ascii_uppercase()) {
            key.modifiers - KeyModifiers::SHIFT
        } else {
            key.modifiers
        };
        mods == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(Action, Vec<KeyCombo>)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use KeyCombo as K;
        Self {
            bindings: vec![
                (
                    Action::Quit,
                    vec![
                        K::plain('q'),
                        K::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                    ],
                ),
                (Action::NewWidget, vec![K::plain('n')]),
                (Action::NextKind, vec![K::plain('k')]),
                (Action::PrevKind, vec![K::plain('K')]),
                (
                    Action::RemoveWidget,
                    vec![K::plain('x'), K::new(KeyCode::Delete, KeyModifiers::NONE)],
                ),
                (Action::ToggleDrag, vec![K::plain('d')]),
                (Action::ToggleResize, vec![K::plain('r')]),
                (Action::ToggleGrid, vec![K::plain('g')]),
                (Action::ToggleHelp, vec![K::plain('?')]),
                (
                    Action::CloseHelp,
                    vec![K::new(KeyCode::Esc, KeyModifiers::NONE)],
                ),
            ],
        }
    }
}

impl KeyBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, combos)| combos.iter().any(|c| c.matches(key)))
            .map(|(action, _)| *action)
    }

    /// `(keys, description)` rows for the help overlay.
    pub fn help_rows(&self) -> Vec<(String, String)> {
        self.bindings
            .iter()
            .map(|(action, combos)| {
                let keys = combos
                    .iter()
                    .map(KeyCombo::display)
                    .collect::<Vec<_>>()
                    .join(", ");
                (keys, action.to_string())
            })
            .collect()
    }
}
