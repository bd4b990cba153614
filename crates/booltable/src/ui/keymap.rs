//! Configurable key bindings for the interactive UI.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::infra::config::Keybindings;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyBindingParseError {
    #[error("empty key binding")]
    Empty,
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("invalid binding for {action}: {source}")]
    Invalid {
        action: &'static str,
        #[source]
        source: Box<KeyBindingParseError>,
    },
}

/// A key plus modifiers, written as `ctrl+y`, `alt+left`, or `esc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Shift is ignored for character keys since it is already reflected in the character.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        match (self.code, event.code) {
            (KeyCode::Char(expected), KeyCode::Char(actual)) => {
                expected.eq_ignore_ascii_case(&actual)
                    && event.modifiers.difference(KeyModifiers::SHIFT) == self.modifiers
            }
            (expected, actual) => expected == actual && event.modifiers == self.modifiers,
        }
    }
}

impl FromStr for KeyBinding {
    type Err = KeyBindingParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let mut parts: Vec<&str> = normalized.split('+').map(str::trim).collect();
        let key = parts
            .pop()
            .filter(|key| !key.is_empty())
            .ok_or(KeyBindingParseError::Empty)?;

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= match part {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" | "option" | "meta" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => return Err(KeyBindingParseError::UnknownModifier(other.to_owned())),
            };
        }

        Ok(Self {
            code: parse_key(key)?,
            modifiers,
        })
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "shift+")?;
        }
        match self.code {
            KeyCode::Char(ch) => write!(f, "{ch}"),
            KeyCode::Esc => write!(f, "esc"),
            KeyCode::Left => write!(f, "←"),
            KeyCode::Right => write!(f, "→"),
            KeyCode::Up => write!(f, "↑"),
            KeyCode::Down => write!(f, "↓"),
            KeyCode::F(n) => write!(f, "f{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

fn parse_key(key: &str) -> Result<KeyCode, KeyBindingParseError> {
    let code = match key {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                (Some('f'), Some(_)) => other[1..]
                    .parse()
                    .map(KeyCode::F)
                    .map_err(|_| KeyBindingParseError::UnknownKey(other.to_owned()))?,
                _ => return Err(KeyBindingParseError::UnknownKey(other.to_owned())),
            }
        }
    };
    Ok(code)
}

/// Commands reachable through configurable bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CopyResult,
    CopyUrl,
    Back,
    Forward,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(KeyBinding, Action)>,
}

impl Keymap {
    pub fn from_config(config: &Keybindings) -> Result<Self, KeyBindingParseError> {
        let entries = [
            ("copy_result", &config.copy_result, Action::CopyResult),
            ("copy_url", &config.copy_url, Action::CopyUrl),
            ("back", &config.back, Action::Back),
            ("forward", &config.forward, Action::Forward),
            ("quit", &config.quit, Action::Quit),
        ];

        let mut bindings = Vec::with_capacity(entries.len());
        for (name, value, action) in entries {
            let binding = value
                .parse::<KeyBinding>()
                .map_err(|source| KeyBindingParseError::Invalid {
                    action: name,
                    source: Box::new(source),
                })?;
            bindings.push((binding, action));
        }
        Ok(Self { bindings })
    }

    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(binding, _)| binding.matches(event))
            .map(|(_, action)| *action)
    }

    pub fn binding_for(&self, action: Action) -> Option<KeyBinding> {
        self.bindings
            .iter()
            .find(|(_, candidate)| *candidate == action)
            .map(|(binding, _)| *binding)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&Keybindings::default()).unwrap_or(Self {
            bindings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_modifiers_and_named_keys() {
        let binding: KeyBinding = "Ctrl+Y".parse().unwrap();
        assert!(binding.matches(&key(KeyCode::Char('y'), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&key(KeyCode::Char('y'), KeyModifiers::NONE)));

        let back: KeyBinding = "alt+left".parse().unwrap();
        assert!(back.matches(&key(KeyCode::Left, KeyModifiers::ALT)));
        assert_eq!("f5".parse::<KeyBinding>().unwrap().to_string(), "f5");
    }

    #[test]
    fn rejects_unknown_parts() {
        assert_eq!(
            "hyper+x".parse::<KeyBinding>(),
            Err(KeyBindingParseError::UnknownModifier("hyper".into()))
        );
        assert_eq!(
            "ctrl+banana".parse::<KeyBinding>(),
            Err(KeyBindingParseError::UnknownKey("banana".into()))
        );
        assert_eq!("".parse::<KeyBinding>(), Err(KeyBindingParseError::Empty));
    }

    #[test]
    fn default_keymap_resolves_actions() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.action_for(&key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(Action::CopyUrl)
        );
        assert_eq!(
            keymap.action_for(&key(KeyCode::Right, KeyModifiers::ALT)),
            Some(Action::Forward)
        );
        assert_eq!(keymap.action_for(&key(KeyCode::Char('l'), KeyModifiers::NONE)), None);
        assert_eq!(
            keymap.binding_for(Action::Quit).map(|binding| binding.to_string()),
            Some("esc".to_owned())
        );
    }

    #[test]
    fn invalid_config_names_the_action() {
        let mut config = Keybindings::default();
        config.back = "alt+nowhere".into();
        let err = Keymap::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("back"));
    }
}
