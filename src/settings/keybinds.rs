use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::constants::storage::ACTION_KEYBINDS;
use crate::storage::{Store, load_json, save_json};
use crate::untrusted::string;

/// Remappable global shortcut actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    OpenNinjabrain,
    Thin,
    Wide,
    Tall,
}

impl Action {
    /// Lookup order when several actions share a key
    pub const ALL: [Action; 4] = [Self::OpenNinjabrain, Self::Thin, Self::Wide, Self::Tall];

    pub fn label(self) -> &'static str {
        match self {
            Self::OpenNinjabrain => "Open Ninjabrain Bot",
            Self::Thin => "Thin",
            Self::Wide => "Wide",
            Self::Tall => "Tall",
        }
    }

    fn storage_field(self) -> &'static str {
        match self {
            Self::OpenNinjabrain => "openAction",
            Self::Thin => "thinAction",
            Self::Wide => "wideAction",
            Self::Tall => "tallAction",
        }
    }

    // Older blobs used the bare action names
    fn legacy_field(self) -> &'static str {
        match self {
            Self::OpenNinjabrain => "openNinjabrain",
            Self::Thin => "thin",
            Self::Wide => "wide",
            Self::Tall => "tall",
        }
    }
}

/// Physical key code per action; empty means unbound
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionKeybinds {
    open_action: String,
    thin_action: String,
    wide_action: String,
    tall_action: String,
}

impl ActionKeybinds {
    pub fn normalize(raw: &Value) -> Self {
        let mut binds = Self::default();
        for action in Action::ALL {
            let code = string(raw, action.storage_field())
                .or_else(|| string(raw, action.legacy_field()))
                .unwrap_or_default();
            binds.set(action, code);
        }
        binds
    }

    pub fn get(&self, action: Action) -> &str {
        match action {
            Action::OpenNinjabrain => &self.open_action,
            Action::Thin => &self.thin_action,
            Action::Wide => &self.wide_action,
            Action::Tall => &self.tall_action,
        }
    }

    /// Bind `code` (trimmed) to `action`; an empty code unbinds it
    pub fn set(&mut self, action: Action, code: &str) {
        let slot = match action {
            Action::OpenNinjabrain => &mut self.open_action,
            Action::Thin => &mut self.thin_action,
            Action::Wide => &mut self.wide_action,
            Action::Tall => &mut self.tall_action,
        };
        *slot = code.trim().to_string();
    }

    /// First action bound to `code`
    pub fn find_action(&self, code: &str) -> Option<Action> {
        if code.is_empty() {
            return None;
        }
        Action::ALL.into_iter().find(|action| self.get(*action) == code)
    }

    pub fn load(store: &dyn Store) -> Self {
        let binds = load_json(store, ACTION_KEYBINDS)
            .map(|raw| Self::normalize(&raw))
            .unwrap_or_default();
        debug!(
            open = binds.open_action.as_str(),
            thin = binds.thin_action.as_str(),
            wide = binds.wide_action.as_str(),
            tall = binds.tall_action.as_str(),
            "Loaded action keybinds"
        );
        binds
    }

    pub fn save(&self, store: &dyn Store) {
        save_json(store, ACTION_KEYBINDS, self);
    }
}
