//! Shared types for the kitchen provisioner: the private network topology and
//! the template zone description.

pub mod topology;
pub mod zone;

pub use topology::{NetworkTopology, TopologyError};
pub use zone::ZoneTemplate;
