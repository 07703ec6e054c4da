use super::domain::{Profile, UserId};

/// Storage abstraction so matching and notifications never touch a query client.
pub trait ProfileRepository: Send + Sync {
    fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError>;
    fn list_profiles(&self) -> Result<Vec<Profile>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("profile not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
