use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::VersionedStore;
use crate::models::TradeStatus;

/// One saved journal filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub name: String,
    pub status: Option<TradeStatus>,
    pub pair: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Saved journal filter presets plus the one currently applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiltersState {
    pub presets: Vec<FilterPreset>,
    pub active: Option<String>,
}

impl FiltersState {
    /// Save or replace a preset by name.
    pub fn save_preset(&mut self, preset: FilterPreset) {
        if let Some(existing) = self.presets.iter_mut().find(|p| p.name == preset.name) {
            *existing = preset;
        } else {
            self.presets.push(preset);
        }
    }

    pub fn remove_preset(&mut self, name: &str) {
        self.presets.retain(|p| p.name != name);
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
    }

    /// Apply a preset. Unknown names clear the active filter.
    pub fn set_active(&mut self, name: Option<&str>) {
        self.active = name
            .filter(|n| self.presets.iter().any(|p| p.name == *n))
            .map(str::to_string);
    }

    pub fn active_preset(&self) -> Option<&FilterPreset> {
        let name = self.active.as_deref()?;
        self.presets.iter().find(|p| p.name == name)
    }
}

impl VersionedStore for FiltersState {
    const NAME: &'static str = "filters";
    const VERSION: i32 = 1;

    fn migrate(version: i32, _data: serde_json::Value) -> anyhow::Result<Self> {
        anyhow::bail!("unknown filters store version: {version}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(name: &str) -> FilterPreset {
        FilterPreset {
            name: name.to_string(),
            status: Some(TradeStatus::Closed),
            pair: Some("EURUSD".to_string()),
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn test_save_preset_replaces_by_name() {
        let mut state = FiltersState::default();
        state.save_preset(preset("wins"));
        state.save_preset(FilterPreset {
            pair: Some("GBPUSD".to_string()),
            ..preset("wins")
        });

        assert_eq!(state.presets.len(), 1);
        assert_eq!(state.presets[0].pair.as_deref(), Some("GBPUSD"));
    }

    #[test]
    fn test_remove_clears_active() {
        let mut state = FiltersState::default();
        state.save_preset(preset("wins"));
        state.set_active(Some("wins"));
        assert!(state.active_preset().is_some());

        state.remove_preset("wins");
        assert!(state.active.is_none());
        assert!(state.presets.is_empty());
    }

    #[test]
    fn test_set_active_ignores_unknown_name() {
        let mut state = FiltersState::default();
        state.save_preset(preset("wins"));
        state.set_active(Some("losses"));
        assert!(state.active.is_none());
    }
}
