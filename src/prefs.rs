//! Persisted visitor preferences: theme and commission status.
//!
//! A flat string-to-string JSON object, the same shape a browser's local
//! storage would hold. A missing or unreadable file loads as empty, so a
//! corrupt store only costs the saved preferences.
//!
//! ```json
//! {
//!   "commissionStatus": "busy",
//!   "theme": "dark"
//! }
//! ```

use crate::config::{Labels, PreferencesConfig, StatusConfig, StatusEntry};
use crate::dom::{NodeId, Page, Selector};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. Writes go back to the same file.
    pub fn open(path: &Path) -> Self {
        let values = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: Some(path.to_path_buf()),
            values,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn save(&self) -> Result<(), PrefsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Only an explicit `"dark"` selects the dark theme.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn glyph(self, labels: &Labels) -> &str {
        match self {
            Theme::Dark => &labels.theme_glyph_dark,
            Theme::Light => &labels.theme_glyph_light,
        }
    }
}

/// Read the saved theme.
pub fn stored_theme(store: &PreferenceStore, config: &PreferencesConfig) -> Theme {
    Theme::from_stored(store.get(&config.theme_key))
}

/// Flip and persist the saved theme without a page.
pub fn toggle_stored_theme(
    store: &mut PreferenceStore,
    config: &PreferencesConfig,
) -> Result<Theme, PrefsError> {
    let next = stored_theme(store, config).toggled();
    store.set(&config.theme_key, next.as_str())?;
    Ok(next)
}

/// `#themeToggle`: flips the `dark` class on the document root.
#[derive(Debug, Clone)]
pub struct ThemeToggle {
    button: NodeId,
}

impl ThemeToggle {
    /// Apply the saved theme. The button glyph is only rewritten for a saved
    /// dark theme; otherwise the page's own glyph stays.
    pub fn init(
        page: &mut Page,
        store: &PreferenceStore,
        config: &PreferencesConfig,
        labels: &Labels,
    ) -> Option<Self> {
        let button = page.by_id("themeToggle")?;
        if stored_theme(store, config) == Theme::Dark {
            let root = page.root();
            page.get_mut(root).add_class("dark");
            page.get_mut(button).text = Theme::Dark.glyph(labels).to_string();
        }
        Some(Self { button })
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn current(&self, page: &Page) -> Theme {
        if page.get(page.root()).has_class("dark") {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggle(
        &self,
        page: &mut Page,
        store: &mut PreferenceStore,
        config: &PreferencesConfig,
        labels: &Labels,
    ) -> Result<Theme, PrefsError> {
        let root = page.root();
        let theme = if page.get_mut(root).toggle_class("dark") {
            Theme::Dark
        } else {
            Theme::Light
        };
        page.get_mut(self.button).text = theme.glyph(labels).to_string();
        store.set(&config.theme_key, theme.as_str())?;
        tracing::debug!(theme = theme.as_str(), "theme toggled");
        Ok(theme)
    }
}

/// Commission status lookups over the configured cycle.
#[derive(Debug, Clone, Copy)]
pub struct StatusCycle<'a> {
    entries: &'a [StatusEntry],
    key: &'a str,
}

impl<'a> StatusCycle<'a> {
    pub fn new(status: &'a StatusConfig, prefs: &'a PreferencesConfig) -> Self {
        Self {
            entries: &status.entries,
            key: &prefs.status_key,
        }
    }

    /// The stored entry; a missing or unknown value shows the first entry.
    pub fn current(&self, store: &PreferenceStore) -> Option<&'a StatusEntry> {
        store
            .get(self.key)
            .and_then(|k| self.entries.iter().find(|e| e.key == k))
            .or_else(|| self.entries.first())
    }

    /// Entry after the stored one. A missing value counts as the first
    /// entry; an unknown value restarts the cycle at the first entry.
    pub fn next(&self, store: &PreferenceStore) -> Option<&'a StatusEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match store.get(self.key) {
            None => 1,
            Some(k) => self
                .entries
                .iter()
                .position(|e| e.key == k)
                .map_or(0, |i| i + 1),
        };
        self.entries.get(idx % self.entries.len())
    }

    /// Persist and return the next entry.
    pub fn advance(&self, store: &mut PreferenceStore) -> Result<Option<&'a StatusEntry>, PrefsError> {
        let Some(next) = self.next(store) else {
            return Ok(None);
        };
        store.set(self.key, &next.key)?;
        tracing::debug!(status = %next.key, "commission status advanced");
        Ok(Some(next))
    }
}

#[derive(Debug, Clone)]
struct Pill {
    pill: NodeId,
    text: Option<NodeId>,
    sub: Option<NodeId>,
    extra_sub: Option<NodeId>,
}

/// The status pills on the front page and the works page.
#[derive(Debug, Clone)]
pub struct StatusPills {
    pills: Vec<Pill>,
}

impl StatusPills {
    pub fn init(page: &Page) -> Option<Self> {
        let text_sel = Selector::parse(".status-text").ok()?;
        let sub_sel = Selector::parse(".status-subtext").ok()?;
        let pills: Vec<Pill> = [
            ("commissionPill", page.by_id("commissionSubtext")),
            ("commissionPillWorks", None),
        ]
        .into_iter()
        .filter_map(|(id, extra_sub)| {
            let pill = page.by_id(id)?;
            Some(Pill {
                pill,
                text: page.query_within(pill, &text_sel),
                sub: page.query_within(pill, &sub_sel),
                extra_sub,
            })
        })
        .collect();
        if pills.is_empty() {
            return None;
        }
        Some(Self { pills })
    }

    pub fn apply(&self, page: &mut Page, entry: &StatusEntry) {
        for p in &self.pills {
            page.get_mut(p.pill).set_attr("data-status", &entry.key);
            if let Some(t) = p.text {
                page.get_mut(t).text = entry.text.clone();
            }
            for sub in [p.sub, p.extra_sub].into_iter().flatten() {
                page.get_mut(sub).text = entry.sub.clone();
            }
        }
    }
}
