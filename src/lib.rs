use std::{
    sync::{Arc, atomic::AtomicBool},
    time::Duration,
};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize, ser::Serializer};
use tokio::{runtime::Handle, sync::mpsc::unbounded_channel};
use tracing::info;
use url::Url;

use crate::{
    cards::{
        view::{CardsUpdate, CardsView},
        workers::{Refresher, cards_worker, load_initial},
    },
    client::http_source::DEFAULT_ENDPOINT,
};

pub mod cards;
pub mod client;
pub mod models;

pub type Result<T> = std::result::Result<T, Error>;

/// random-user-cards Error enum
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("cards must be mounted from within a tokio runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

/// Environment variable overriding [`CardsConfig::endpoint`].
pub const ENDPOINT_ENV_VAR: &str = "RANDOM_USER_ENDPOINT";

/// The configuration of a cards component. Every field has a default, so adapters
/// can deserialize a partial JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardsConfig {
    /// Base URL of the random user service. `results=<n>` is appended per request.
    pub endpoint: Url,
    /// Records fetched by the initial load and by full refreshes.
    pub batch_size: usize,
    /// Upper bound of the single-record fetches issued by one partial cycle.
    pub max_replacements: usize,
    pub policy: RefreshPolicy,
    pub partial_interval_ms: u64,
    pub full_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// Makes the random draws reproducible.
    pub rng_seed: Option<u64>,
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            batch_size: 10,
            max_replacements: 10,
            policy: RefreshPolicy::default(),
            partial_interval_ms: RefreshPolicy::PARTIAL_DEFAULT_INTERVAL.as_millis() as u64,
            full_interval_ms: RefreshPolicy::FULL_DEFAULT_INTERVAL.as_millis() as u64,
            request_timeout_ms: 30_000,
            rng_seed: None,
        }
    }
}

// The constant is covered by `defaults_match_the_random_user_service`.
fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("BUG: the default endpoint is a valid URL")
}

impl CardsConfig {
    /// The default configuration, with the endpoint taken from `RANDOM_USER_ENDPOINT` when set.
    pub fn from_env() -> Result<Self> {
        Self::default().with_endpoint_override(std::env::var(ENDPOINT_ENV_VAR).ok())
    }

    fn with_endpoint_override(mut self, endpoint: Option<String>) -> Result<Self> {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = Url::parse(endpoint.trim())?;
        }
        Ok(self)
    }

    /// The period between two refresh cycles of the configured policy.
    pub fn refresh_period(&self) -> Duration {
        match self.policy {
            RefreshPolicy::Partial => Duration::from_millis(self.partial_interval_ms),
            RefreshPolicy::Full => Duration::from_millis(self.full_interval_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batchSize must be at least 1".to_owned()));
        }
        if self.max_replacements == 0 {
            return Err(Error::Config("maxReplacements must be at least 1".to_owned()));
        }
        if self.refresh_period().is_zero() {
            return Err(Error::Config(format!(
                "the {:?} refresh interval must be greater than zero",
                self.policy
            )));
        }
        if self.request_timeout().is_zero() {
            return Err(Error::Config(
                "requestTimeoutMs must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }

    fn rngs(&self) -> (StdRng, StdRng) {
        match self.rng_seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
        }
    }
}

/// Mounts the cards: publishes the loading view, starts the initial load and the refresh timer.
///
/// Must be called from within a tokio runtime. The cards stay mounted until the
/// returned handle is dropped.
pub fn mount(
    config: CardsConfig,
    updaters: Box<dyn StateUpdater>,
    source: Arc<dyn ProfileSource>,
) -> Result<CardsHandle> {
    config.validate()?;
    let runtime = Handle::try_current()?;

    let mounted = Arc::new(AtomicBool::new(true));
    let (sender, receiver) = unbounded_channel::<CardsUpdate>();
    let (view_rng, refresh_rng) = config.rngs();
    let view = CardsView::new(Arc::new(updaters), view_rng);

    let worker = runtime.spawn(cards_worker(view, receiver, mounted.clone()));
    let loader = runtime.spawn(load_initial(
        source.clone(),
        config.batch_size,
        sender.clone(),
        mounted.clone(),
    ));
    let refresher = Refresher {
        source,
        sender,
        mounted: mounted.clone(),
        policy: config.policy,
        period: config.refresh_period(),
        batch_size: config.batch_size,
        max_replacements: config.max_replacements,
        rng: refresh_rng,
    };
    let timer = runtime.spawn(refresher.run());

    info!(
        "Cards mounted with {:?} refresh every {:?}",
        config.policy,
        config.refresh_period()
    );
    Ok(CardsHandle::new(mounted, vec![timer, loader, worker]))
}

/// Mounts the cards against the HTTP random user service at `config.endpoint`.
pub fn mount_random_user(
    config: CardsConfig,
    updaters: Box<dyn StateUpdater>,
) -> Result<CardsHandle> {
    let source = RandomUserSource::new(config.endpoint.clone(), config.request_timeout())?;
    mount(config, updaters, Arc::new(source))
}

// Re-exports

pub use cards::handle::CardsHandle;
pub use cards::refresh::RefreshPolicy;
pub use cards::render::{Card, CardsScreen};
pub use cards::view::ViewState;
pub use client::{FetchError, ProfileSource, RandomUserSource};
pub use models::state_updater::{StateUpdater, StateUpdaterFunctions};
pub use models::user::{UserList, UserRecord};
