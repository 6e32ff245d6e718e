//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod display;
pub mod relay;
pub mod storage;
pub mod watchdog;

pub use display::{DisplayError, TextDisplay, TextDisplayExt};
pub use relay::{RelayError, RelayMask, RelayOutput};
pub use storage::{Eeprom, StorageError};
pub use watchdog::Watchdog;
