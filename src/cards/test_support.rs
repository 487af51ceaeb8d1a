//! In-memory fakes shared by the cards tests.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    cards::view::{CardsView, ViewState},
    client::{FetchError, ProfileSource},
    models::{
        state_updater::{StateUpdater, StateUpdaterFunctions},
        user::{UserList, UserRecord},
    },
};

pub(crate) fn user(tag: &str) -> UserRecord {
    UserRecord::new(
        "first",
        tag,
        format!("{tag}@test"),
        "city",
        "country",
        format!("https://img.test/{tag}.jpg"),
    )
}

/// Ten records `u0@test`..`u9@test`, named `first{i} last{i}`.
pub(crate) fn fixed_users() -> UserList {
    (0..10)
        .map(|i| {
            UserRecord::new(
                &format!("first{i}"),
                &format!("last{i}"),
                format!("u{i}@test"),
                &format!("city{i}"),
                &format!("country{i}"),
                format!("https://img.test/u{i}.jpg"),
            )
        })
        .collect()
}

/// Records every state it is handed.
#[derive(Debug, Default)]
pub(crate) struct RecordingUpdater {
    states: Mutex<Vec<ViewState>>,
    fail: bool,
}

impl RecordingUpdater {
    pub(crate) fn failing() -> Self {
        Self {
            states: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn states(&self) -> Vec<ViewState> {
        self.states.lock().unwrap().clone()
    }
}

impl StateUpdaterFunctions for Arc<RecordingUpdater> {
    fn update_cards(&self, cards: &CardsView) -> anyhow::Result<()> {
        self.states.lock().unwrap().push(cards.state().clone());
        if self.fail {
            anyhow::bail!("store is gone");
        }
        Ok(())
    }
}

impl StateUpdater for Arc<RecordingUpdater> {}

/// Forwards every state to a channel the test awaits on.
#[derive(Debug)]
pub(crate) struct ChannelUpdater(pub(crate) mpsc::UnboundedSender<ViewState>);

impl StateUpdaterFunctions for ChannelUpdater {
    fn update_cards(&self, cards: &CardsView) -> anyhow::Result<()> {
        self.0.send(cards.state().clone())?;
        Ok(())
    }
}

impl StateUpdater for ChannelUpdater {}

/// A scripted profile source.
///
/// Batch requests (`count > 1`) pop `batches`, falling back to [`fixed_users`].
/// Single requests pop `singles`, falling back to a fresh `fresh{n}@test` record.
#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    batches: Mutex<VecDeque<Result<UserList, FetchError>>>,
    singles: Mutex<VecDeque<Result<UserList, FetchError>>>,
    batch_delay: Duration,
    single_delay: Duration,
    batch_calls: AtomicUsize,
    single_calls: AtomicUsize,
}

impl FakeSource {
    pub(crate) fn with_batches(batches: Vec<Result<UserList, FetchError>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            ..Self::default()
        }
    }

    pub(crate) fn with_singles(mut self, singles: Vec<Result<UserList, FetchError>>) -> Self {
        self.singles = Mutex::new(singles.into());
        self
    }

    pub(crate) fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub(crate) fn with_single_delay(mut self, delay: Duration) -> Self {
        self.single_delay = delay;
        self
    }

    pub(crate) fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for FakeSource {
    async fn fetch_users(&self, count: usize) -> Result<Vec<UserRecord>, FetchError> {
        if count == 1 {
            let call = self.single_calls.fetch_add(1, Ordering::SeqCst);
            if !self.single_delay.is_zero() {
                tokio::time::sleep(self.single_delay).await;
            }
            let scripted = self.singles.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| Ok(vec![user(&format!("fresh{call}"))]))
        } else {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            if !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
            let scripted = self.batches.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| Ok(fixed_users()))
        }
    }
}
