//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod avatar_source;
pub mod contributor_source;

pub use avatar_source::{AvatarBytes, AvatarSource};
pub use contributor_source::ContributorSource;
