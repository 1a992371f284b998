use serde::{Deserialize, Serialize};

use super::VersionedStore;

/// Onboarding tour progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TourState {
    pub completed_steps: Vec<String>,
    pub dismissed: bool,
    /// Step the user last had on screen, for resuming. Added in v2.
    pub last_seen_step: Option<String>,
}

impl TourState {
    pub fn complete_step(&mut self, step: &str) {
        if !self.completed_steps.iter().any(|s| s == step) {
            self.completed_steps.push(step.to_string());
        }
        self.last_seen_step = Some(step.to_string());
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_done(&self) -> bool {
        self.dismissed
    }
}

/// v1 snapshot shape: no `last_seen_step`.
#[derive(Deserialize)]
struct TourStateV1 {
    completed_steps: Vec<String>,
    dismissed: bool,
}

impl VersionedStore for TourState {
    const NAME: &'static str = "tour";
    const VERSION: i32 = 2;

    fn migrate(version: i32, data: serde_json::Value) -> anyhow::Result<Self> {
        match version {
            1 => {
                let v1: TourStateV1 = serde_json::from_value(data)?;
                Ok(TourState {
                    completed_steps: v1.completed_steps,
                    dismissed: v1.dismissed,
                    last_seen_step: None,
                })
            }
            other => anyhow::bail!("unknown tour store version: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::prefs_repo::PrefSnapshot;
    use serde_json::json;

    #[test]
    fn test_complete_step_is_idempotent() {
        let mut state = TourState::default();
        state.complete_step("balance");
        state.complete_step("balance");
        assert_eq!(state.completed_steps, vec!["balance"]);
        assert_eq!(state.last_seen_step.as_deref(), Some("balance"));
    }

    #[test]
    fn test_dismiss_marks_tour_done() {
        let mut state = TourState::default();
        assert!(!state.is_done());

        state.dismiss();
        assert!(state.is_done());
        assert!(state.dismissed);
    }

    #[test]
    fn test_load_absent_is_default() {
        let state = TourState::load(None).unwrap();
        assert_eq!(state, TourState::default());
    }

    #[test]
    fn test_migrate_v1_snapshot() {
        let snapshot = PrefSnapshot {
            version: 1,
            data: json!({ "completed_steps": ["balance", "trades"], "dismissed": true }),
        };
        let state = TourState::load(Some(snapshot)).unwrap();
        assert_eq!(state.completed_steps, vec!["balance", "trades"]);
        assert!(state.dismissed);
        assert!(state.last_seen_step.is_none());
    }

    #[test]
    fn test_unknown_version_fails() {
        let snapshot = PrefSnapshot {
            version: 99,
            data: json!({}),
        };
        assert!(TourState::load(Some(snapshot)).is_err());
    }
}
