pub mod components;
pub mod config;
pub mod error;
pub mod motion;

pub use config::{AppConfig, MotionConfig};
pub use error::{Error, Result};
pub use motion::{Animated, Color, EasingCurve, Orchestrator, Retarget, SpringConfig};
