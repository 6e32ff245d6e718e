//! Operator input
//!
//! Encoder decoding, button debouncing and the dispatcher that merges
//! both into discrete [`Action`]s.

pub mod action;
pub mod debounce;
pub mod dispatcher;
pub mod quadrature;

pub use action::Action;
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
pub use dispatcher::{Actions, InputDispatcher, InputSample};
pub use quadrature::QuadratureDecoder;
