//! Versioned client-state stores (onboarding tour, journal filters).
//!
//! Each store is an independent container with its own schema version
//! and an explicit migration path for snapshots persisted under an older
//! version. Handlers load a snapshot, apply actions, and save it back;
//! there is no ambient global.

pub mod filters;
pub mod tour;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::prefs_repo::PrefSnapshot;

/// A state container persisted as a versioned snapshot.
pub trait VersionedStore: Sized + Serialize + DeserializeOwned + Default {
    /// Key under which snapshots are persisted.
    const NAME: &'static str;
    /// Schema version written by this build.
    const VERSION: i32;

    /// Upgrade a snapshot written under an older version. Unknown
    /// versions must fail loudly rather than guess.
    fn migrate(version: i32, data: serde_json::Value) -> anyhow::Result<Self>;

    /// Load from a persisted snapshot: absent → default, current
    /// version → deserialize, older → migrate.
    fn load(snapshot: Option<PrefSnapshot>) -> anyhow::Result<Self> {
        match snapshot {
            None => Ok(Self::default()),
            Some(s) if s.version == Self::VERSION => Ok(serde_json::from_value(s.data)?),
            Some(s) => Self::migrate(s.version, s.data),
        }
    }
}
