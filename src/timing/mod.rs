//! Timing subsystem.
//!
//! # Data Flow
//! ```text
//! get (render mode):
//!     timer.rs marks pipeline start and each stage boundary
//!     → render_times.rs collects sub-step records from the model
//!     → format.rs turns both into the slow-get breakdown
//! ```
//!
//! # Design Decisions
//! - Timing state is per call and passed explicitly, never stored on Locals
//! - Nothing here is persisted; a breakdown is logged once and dropped

pub mod format;
pub mod render_times;
pub mod timer;

pub use format::{format_render_times, format_timing_data, StageTimes};
pub use render_times::{RenderTimes, TimingRecord};
