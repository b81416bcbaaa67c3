//! es-core: shared foundation for the energy-system scenario workspace.
//!
//! Contains:
//! - ids (node positions inside an energy system)
//! - error (shared error type)
//! - timeindex (hourly time index for one scenario year)

pub mod error;
pub mod ids;
pub mod timeindex;

pub use error::{CoreError, CoreResult};
pub use ids::NodeId;
pub use timeindex::{DEBUG_TIME_STEPS, HOURS_PER_LEAP_YEAR, HOURS_PER_YEAR, TimeIndex};
