// lib.rs - Coordinator for a group-driven Game of Life run

pub mod config;
pub mod console;
pub mod coordinator;
pub mod group;

pub use config::Config;
pub use coordinator::{run_member, CoordinatorError, Outcome};
pub use group::{GroupSession, GroupTransport, LauncherTransport, LocalGroup, Membership, Role};
