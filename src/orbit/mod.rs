//! Orbital position arithmetic.
//!
//! - [`frame`]: reference degrees measured from a spring equinox
//! - [`memo`]: per-pass longitude cache
//! - [`locator`]: search for the instant Earth reaches a target degree
//! - [`birth`]: the target degree of a birth instant

pub mod birth;
pub mod frame;
pub mod locator;
pub mod memo;

pub use birth::birth_degree;
pub use frame::{ReferenceDegree, angular_distance, normalize, normalize_precise};
pub use locator::{TargetMatch, locate_target};
pub use memo::LongitudeMemo;
