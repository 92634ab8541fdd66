//! Port traits: the seams between domain logic and the outside world.

pub mod clock_port;
pub mod config_port;
pub mod export_port;
