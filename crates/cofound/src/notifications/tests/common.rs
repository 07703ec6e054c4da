use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::ApplicationConfig;
use crate::notifications::dispatcher::NotificationDispatcher;
use crate::notifications::gateway::{ChatGateway, DeliveryError, OutboundMessage};
use crate::profiles::{Profile, ProfileRepository, RepositoryError, UserId};

pub(super) const BASE_URL: &str = "https://cofound.uz";

pub(super) fn linked_profile(id: &str, chat_id: i64) -> Profile {
    let mut profile = Profile::new(id);
    profile.display_name = Some("Kamola".to_string());
    profile.telegram_chat_id = Some(chat_id);
    profile
}

pub(super) fn unlinked_profile(id: &str) -> Profile {
    Profile::new(id)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
    pub(super) lookups: Arc<Mutex<usize>>,
}

impl MemoryRepository {
    pub(super) fn with_profiles(profiles: Vec<Profile>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.profiles.lock().expect("repository mutex poisoned");
            for profile in profiles {
                guard.insert(profile.id.clone(), profile);
            }
        }
        repository
    }

    pub(super) fn lookups(&self) -> usize {
        *self.lookups.lock().expect("lookup mutex poisoned")
    }
}

impl ProfileRepository for MemoryRepository {
    fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        *self.lookups.lock().expect("lookup mutex poisoned") += 1;
        let guard = self.profiles.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        let guard = self.profiles.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl ProfileRepository for UnavailableRepository {
    fn fetch_profile(&self, _id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingGateway {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl RecordingGateway {
    pub(super) fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn send_message(&self, message: OutboundMessage) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .expect("gateway mutex poisoned")
            .push(message);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct FailingGateway {
    attempts: Arc<Mutex<usize>>,
}

impl FailingGateway {
    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("gateway mutex poisoned")
    }
}

#[async_trait]
impl ChatGateway for FailingGateway {
    async fn send_message(&self, _message: OutboundMessage) -> Result<(), DeliveryError> {
        *self.attempts.lock().expect("gateway mutex poisoned") += 1;
        Err(DeliveryError::Rejected {
            status: 403,
            description: "Forbidden: bot was blocked by the user".to_string(),
        })
    }
}

pub(super) fn build_dispatcher(
    profiles: Vec<Profile>,
) -> (
    NotificationDispatcher<MemoryRepository, RecordingGateway>,
    Arc<MemoryRepository>,
    Arc<RecordingGateway>,
) {
    let repository = Arc::new(MemoryRepository::with_profiles(profiles));
    let gateway = Arc::new(RecordingGateway::default());
    let dispatcher = NotificationDispatcher::new(
        repository.clone(),
        gateway.clone(),
        ApplicationConfig::new(BASE_URL),
    );
    (dispatcher, repository, gateway)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
