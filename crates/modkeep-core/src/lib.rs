//! Startup coordination and theming for the modkeep desktop mod manager.
//!
//! Everything here is platform independent. OS services (named locks,
//! process and window lookup, message boxes, termination) are traits that
//! the desktop shell implements.

pub mod color;
pub mod error;
pub mod instance;
pub mod notice;
pub mod panic_guard;
pub mod theme;

pub use color::{Color, parse_color};
pub use error::{ConfigError, PlatformError, ThemeError, UnknownTheme};
