//! Component orchestrators for the storefront screens
//!
//! # Architecture
//!
//! ## L2 Organism Layer
//! - `filter_chip` - Selectable chip (scale, icon rotation, color, border)
//! - `bottom_nav` - Tab bar with a sliding indicator pill
//! - `entry_card` - Product card with entry, parallax and press feedback
//! - `card_list` - Card collection owning the stagger scheduler
//! - `pressable` - Generic press-feedback button with a toggled state
//!
//! Each component owns its orchestrators exclusively and implements
//! [`Animated`](crate::motion::Animated) so the host frame loop can step it.

pub mod bottom_nav;
pub mod card_list;
pub mod entry_card;
pub mod filter_chip;
pub mod pressable;

pub use bottom_nav::{BottomNav, NavStyle, TabStyle};
pub use card_list::CardList;
pub use entry_card::{CardStyle, EntryCard, EntryStyle};
pub use filter_chip::{ChipPalette, ChipStyle, FilterChip};
pub use pressable::{Pressable, PressableStyle};
