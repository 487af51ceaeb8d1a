use std::sync::Arc;

use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    cards::{
        refresh::{pick_index, replace_at},
        render::{CardsScreen, render},
    },
    models::{
        state_updater::StateUpdater,
        user::{UserList, UserRecord},
    },
};

/// What the cards component currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    rename_all = "camelCase",
    rename_all_fields = "camelCase",
    tag = "state",
    content = "data"
)]
pub enum ViewState {
    /// Waiting for the initial batch.
    Loading,
    Error {
        message: String,
    },
    Ready {
        users: UserList,
    },
}

/// The updates applied to the view, in the order the view worker receives them.
///
/// These are sent by the loader and refresh tasks, and only ever applied by
/// the single view worker that owns the [`CardsView`].
#[derive(Debug)]
pub(crate) enum CardsUpdate {
    /// Outcome of the one batch fetch issued at mount.
    InitialLoad(Result<UserList, String>),
    /// A freshly fetched record to write over a random position of the current list.
    Replace(UserRecord),
    /// Outcome of a whole-batch refresh cycle.
    FullRefresh(Result<UserList, String>),
}

/// The struct owning the cards state.
/// Fields are not exposed to the adapter directly, the adapter can only serialize this struct.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsView {
    view: ViewState,
    /// Draws replacement positions. Backend only.
    #[serde(skip)]
    rng: StdRng,
    /// The state updater passed by the adapter for this struct
    #[serde(skip)]
    state_updaters: Arc<Box<dyn StateUpdater>>,
}

impl CardsView {
    pub(crate) fn new(updaters: Arc<Box<dyn StateUpdater>>, rng: StdRng) -> Self {
        Self {
            view: ViewState::Loading,
            rng,
            state_updaters: updaters,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.view
    }

    /// The displayed records, if any are displayed.
    pub fn users(&self) -> Option<&[UserRecord]> {
        match &self.view {
            ViewState::Ready { users } => Some(users),
            _ => None,
        }
    }

    pub fn render(&self) -> CardsScreen {
        render(&self.view)
    }

    pub(crate) fn update_frontend_state(&self) {
        if let Err(e) = self.state_updaters.update_cards(self) {
            warn!("Cannot update cards store. Error: {e}");
        }
    }

    /// Apply one update, and notify the adapter if the view changed.
    /// Returns whether the view changed.
    pub(crate) fn apply(&mut self, update: CardsUpdate) -> bool {
        let changed = match update {
            CardsUpdate::InitialLoad(result) => self.apply_initial_load(result),
            CardsUpdate::Replace(record) => self.apply_replacement(record),
            CardsUpdate::FullRefresh(result) => self.apply_full_refresh(result),
        };
        if changed {
            self.update_frontend_state();
        }
        changed
    }

    fn apply_initial_load(&mut self, result: Result<UserList, String>) -> bool {
        if self.view != ViewState::Loading {
            warn!("BUG: received a second initial load, ignoring it");
            return false;
        }
        self.view = match result {
            Ok(users) => {
                info!("Loaded {} user(s)", users.len());
                ViewState::Ready { users }
            }
            Err(message) => ViewState::Error { message },
        };
        true
    }

    fn apply_replacement(&mut self, record: UserRecord) -> bool {
        let ViewState::Ready { users } = &self.view else {
            debug!(
                "Dropping replacement {} received while no cards are displayed",
                record.email
            );
            return false;
        };
        // The index is drawn against the list as it is now, not when the fetch was issued.
        let Some(index) = pick_index(&mut self.rng, users.len()) else {
            debug!("Dropping replacement {}: the list is empty", record.email);
            return false;
        };
        debug!("Replacing card {} with {}", index + 1, record.email);
        self.view = ViewState::Ready {
            users: replace_at(users, index, record),
        };
        true
    }

    fn apply_full_refresh(&mut self, result: Result<UserList, String>) -> bool {
        if self.view == ViewState::Loading {
            debug!("Dropping full refresh received before the initial load completed");
            return false;
        }
        self.view = match result {
            Ok(users) => ViewState::Ready { users },
            Err(message) => ViewState::Error { message },
        };
        true
    }
}
