use async_trait::async_trait;
use cofound::error::AppError;
use cofound::notifications::{ChatGateway, DeliveryError, OutboundMessage};
use cofound::profiles::{
    CommitmentLevel, Location, Profile, ProfileRepository, RepositoryError, StartupStage, UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Profile store held in memory; ordering of `list_profiles` follows insertion.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<Vec<Profile>>>,
}

impl InMemoryProfileRepository {
    pub(crate) fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Arc::new(Mutex::new(profiles)),
        }
    }

    /// Reads a JSON array of profiles.
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let profiles: Vec<Profile> = serde_json::from_str(&raw)?;
        Ok(Self::with_profiles(profiles))
    }

    pub(crate) fn len(&self) -> usize {
        self.profiles
            .lock()
            .map(|guard| guard.len())
            .unwrap_or_default()
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| RepositoryError::Unavailable("profile store poisoned".to_string()))?;
        Ok(guard.iter().find(|profile| &profile.id == id).cloned())
    }

    fn list_profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| RepositoryError::Unavailable("profile store poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

/// Gateway that logs messages instead of calling Telegram.
#[derive(Default, Clone)]
pub(crate) struct LoggingGateway {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

#[async_trait]
impl ChatGateway for LoggingGateway {
    async fn send_message(&self, message: OutboundMessage) -> Result<(), DeliveryError> {
        info!(chat_id = message.chat_id, "telegram message (not delivered)");
        let mut guard = self
            .sent
            .lock()
            .map_err(|_| DeliveryError::Transport("outbox poisoned".to_string()))?;
        guard.push(message);
        Ok(())
    }
}

impl LoggingGateway {
    pub(crate) fn sent(&self) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Founders used by the demo command.
pub(crate) fn sample_profiles() -> Vec<Profile> {
    let mut aziz = Profile::new("aziz");
    aziz.display_name = Some("Aziz Rakhimov".to_string());
    aziz.roles = set(&["engineering", "product"]);
    aziz.industries = set(&["logistics", "fintech"]);
    aziz.commitment = Some(CommitmentLevel::FullTime);
    aziz.stage = Some(StartupStage::Prototype);
    aziz.location = Some(Location::new("Uzbekistan", Some("Tashkent")));
    aziz.languages = set(&["uzbek", "russian", "english"]);
    aziz.telegram_chat_id = Some(555);

    let mut kamola = Profile::new("kamola");
    kamola.display_name = Some("Kamola Yusupova".to_string());
    kamola.roles = set(&["engineering", "design"]);
    kamola.industries = set(&["logistics", "e-commerce"]);
    kamola.commitment = Some(CommitmentLevel::FullTime);
    kamola.stage = Some(StartupStage::Mvp);
    kamola.location = Some(Location::new("Uzbekistan", Some("Tashkent")));
    kamola.languages = set(&["uzbek", "english"]);
    kamola.telegram_chat_id = Some(777);

    let mut nurlan = Profile::new("nurlan");
    nurlan.display_name = Some("Nurlan Abenov".to_string());
    nurlan.roles = set(&["sales", "operations"]);
    nurlan.industries = set(&["agritech"]);
    nurlan.commitment = Some(CommitmentLevel::PartTime);
    nurlan.stage = Some(StartupStage::Idea);
    nurlan.location = Some(Location::new("Kazakhstan", Some("Almaty")));
    nurlan.languages = set(&["kazakh", "russian"]);

    vec![aziz, kamola, nurlan]
}
