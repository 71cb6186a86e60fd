//! Applying editor preferences to the presentation layer.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::models::Settings;

/// The settings that drive code rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorPresentation {
    pub font_size: u32,
    pub font_family: String,
    pub tab_size: u32,
}

impl From<&Settings> for EditorPresentation {
    fn from(settings: &Settings) -> Self {
        Self {
            font_size: settings.font_size,
            font_family: settings.font_family.clone(),
            tab_size: settings.tab_size,
        }
    }
}

impl EditorPresentation {
    /// CSS custom properties for this presentation.
    pub fn css_variables(&self) -> [(&'static str, String); 3] {
        [
            ("--editor-font-size", format!("{}px", self.font_size)),
            ("--editor-font-family", self.font_family.clone()),
            ("--editor-tab-size", self.tab_size.to_string()),
        ]
    }
}

/// Side-effecting sink for editor presentation changes.
pub trait EditorPresenter: Send + Sync {
    fn apply(&self, editor: &EditorPresentation);

    /// Undo whatever `apply` installed. Called on store teardown.
    fn clear(&self) {}
}

/// Presenter that ignores changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl EditorPresenter for NoopPresenter {
    fn apply(&self, _editor: &EditorPresentation) {}
}

/// Keeps the current CSS custom properties for whoever renders code blocks.
#[derive(Debug, Default)]
pub struct CssVariables {
    vars: RwLock<BTreeMap<String, String>>,
}

impl CssVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// `name: value;` declarations, sorted by name.
    pub fn to_style(&self) -> String {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl EditorPresenter for CssVariables {
    fn apply(&self, editor: &EditorPresentation) {
        let mut vars = self.vars.write().unwrap_or_else(PoisonError::into_inner);
        for (name, value) in editor.css_variables() {
            vars.insert(name.to_string(), value);
        }
        tracing::debug!(
            "Applied editor presentation: {}px {} tab {}",
            editor.font_size,
            editor.font_family,
            editor.tab_size
        );
    }

    fn clear(&self) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
