//! Model invocation engine.
//!
//! Executes caller-supplied model `save` and `render` operations under a
//! hard deadline, pipelines the read path (fetch → upgrade → render →
//! optional post-process) and reports slow calls with a per-stage breakdown.

pub mod config;
pub mod invocation;
pub mod model;
pub mod observability;
pub mod resilience;
pub mod storage;
pub mod timing;
pub mod upgrade;

pub use config::EngineConfig;
pub use invocation::{Engine, ErrorKind, GetMode, InvocationError, InvocationResult};
pub use model::{Locals, Model, ModelError, RenderModel};
pub use storage::{MemoryStorage, Storage};
pub use upgrade::{IdentityUpgrade, Upgrade};
