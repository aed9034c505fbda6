//! Echoes client: picking, hint shaping and hold-to-commit over a replicated
//! population of forms.

pub mod commit;
pub mod config;
pub mod context;
pub mod hint;
pub mod instances;
pub mod palette;
pub mod scene;
pub mod store;
pub mod trace;

pub use commit::{CancelReason, HoldController, HoldPhase, HoldToken, SpawnPolicy};
pub use config::ClientConfig;
pub use context::{ClientContext, CommitOutcome};
pub use hint::{Hint, HitMarker};
pub use instances::{build_batches, InstanceBatch, InstanceData};
pub use palette::Palette;
pub use scene::{Frame, LogScene, SceneSink};
pub use store::{MemoryStore, ReplicatedStore, StoreError, UpdateState, FORMS};
pub use trace::{Trace, TraceWorld};
