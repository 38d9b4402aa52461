//! Virtual pet core: two decaying stats, offline catch-up, death and
//! revival, and the idle/reaction animation handshake with a renderer.

pub mod clock;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod signal;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use lifecycle::{LifecycleController, Phase};
pub use model::{clamp_stat, CatchUp, PetState, Rules, StatField};
pub use signal::{AnimationHandle, Signal, SignalSender};
pub use stats::StatStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use view::{PetView, ViewError};
