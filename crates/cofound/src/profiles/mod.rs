//! Read-only view of co-founder profiles and the storage seam they come through.

pub mod domain;
pub mod repository;

pub use domain::{CommitmentLevel, Location, Profile, StartupStage, UserId};
pub use repository::{ProfileRepository, RepositoryError};
