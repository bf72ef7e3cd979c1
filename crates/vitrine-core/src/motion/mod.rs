//! Animation orchestration core
//!
//! Numeric cells driven by spring or timing physics, combined through
//! interpolation into render-ready style snapshots, restartable mid-flight
//! and optionally linked to scroll position.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves (cubic, quintic, exponential, bezier)
//! - `timing` - Time utilities (progress, lerp, frame clock)
//! - `color` - RGBA color endpoints
//! - `interpolate` - Breakpoint interpolation with clamp/extend extrapolation
//! - `driver` - Spring and timing drivers
//!
//! ## L3 Molecular Layer
//! - `value` - A single animated cell and its lifecycle
//! - `orchestrator` - Per-component owner of values and the derive function
//! - `gesture` - Press feedback on a "squeeze" value
//! - `scroll` - Published scroll snapshots and parallax transforms
//! - `selection` - Sliding, resizing selection indicator
//! - `stagger` - Per-index delayed entry activation
//!
//! # Usage
//!
//! ```ignore
//! use vitrine_core::motion::{Animated, OrchestratorBuilder, SpringConfig};
//!
//! let mut b = OrchestratorBuilder::new("chip");
//! let scale = b.value(1.0);
//! let mut chip = b.build(move |v| v.get(scale));
//!
//! chip.retarget(scale, 1.05, SpringConfig::default())?;
//!
//! // In the frame loop
//! if chip.frame(dt) {
//!     render(*chip.snapshot());
//! }
//! ```

// L4 Atomic Layer
pub mod color;
pub mod driver;
pub mod easing;
pub mod interpolate;
pub mod timing;

// L3 Molecular Layer
pub mod gesture;
pub mod orchestrator;
pub mod scroll;
pub mod selection;
pub mod stagger;
pub mod value;

// Re-exports for convenient access
pub use color::Color;
pub use driver::{Completion, CompletionCallback, DriverConfig, SpringConfig, TimingConfig};
pub use easing::EasingCurve;
pub use gesture::{GestureBridge, PressConfig, PressEvent, PressPhase};
pub use interpolate::{Extrapolation, Interpolate, Interpolator};
pub use orchestrator::{Animated, Orchestrator, OrchestratorBuilder, RetargetOp, Values};
pub use scroll::{
    scroll_channel, ParallaxConfig, ParallaxStyle, ScrollLinkedTransform, ScrollPublisher,
    ScrollReader, ScrollState,
};
pub use selection::{
    IndicatorConfig, IndicatorStyle, ListItemLayout, SelectionIndicatorTracker, SelectionState,
};
pub use stagger::{EntryHandle, StaggeredEntryScheduler};
pub use timing::FrameClock;
pub use value::{AnimatedValue, MotionPhase, Retarget, StepOutcome, ValueId};
