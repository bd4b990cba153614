//! Option text state and the tables derived from it.

use std::sync::mpsc::Receiver;

use crate::app::options;
use crate::app::sync::{LocationSynchronizer, MatchMode};
use crate::app::table;
use crate::domain::errors::SyncError;
use crate::domain::model::{BooleanTable, HistoryUpdate, MappedRow, OptionList};
use crate::infra::location::{NavigationEvent, Navigator};

/// Everything computed from one option text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derived {
    pub options: OptionList,
    pub table: BooleanTable,
    pub rows: Vec<MappedRow>,
}

impl Derived {
    pub fn from_text(text: &str) -> Self {
        let options = options::parse(text);
        let count = i64::try_from(options.len()).unwrap_or(i64::MAX);
        let table = table::generate(count);
        let rows = table::map_rows(&options, &table);
        Self {
            options,
            table,
            rows,
        }
    }

    /// Number of rows in the table.
    pub fn combinations(&self) -> usize {
        self.table.len()
    }
}

/// Raw option text kept in step with a navigation history.
///
/// Every text change recomputes [`Derived`] and runs the synchronizer. Back/forward events are
/// queued by the navigator and applied by [`TruthTableState::poll_navigation`].
#[derive(Debug)]
pub struct TruthTableState<N: Navigator> {
    text: String,
    derived: Derived,
    sync: LocationSynchronizer<N>,
    navigation: Receiver<NavigationEvent>,
    option_limit: Option<usize>,
}

impl<N: Navigator> TruthTableState<N> {
    /// Seed the text from the navigator's current location.
    pub fn new(navigator: N, mode: MatchMode) -> Result<Self, SyncError> {
        let mut sync = LocationSynchronizer::new(navigator, mode);
        let navigation = sync.subscribe();
        let text = sync.initial_text();
        let mut state = Self {
            text: String::new(),
            derived: Derived::default(),
            sync,
            navigation,
            option_limit: None,
        };
        state.set_text(text)?;
        Ok(state)
    }

    /// Warn whenever the option count exceeds `limit`.
    pub fn with_option_limit(mut self, limit: usize) -> Self {
        self.option_limit = Some(limit);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    pub fn navigator(&self) -> &N {
        self.sync.navigator()
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        self.sync.navigator_mut()
    }

    /// Replace the option text, recompute the table, and update the location.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<HistoryUpdate, SyncError> {
        self.text = text.into();
        self.derived = Derived::from_text(&self.text);

        let count = self.derived.options.len();
        if let Some(limit) = self.option_limit
            && count > limit
        {
            tracing::warn!(count, limit, "option count exceeds limit; table grows as 2^n");
        }

        self.sync.sync(&self.text)
    }

    /// Apply queued back/forward events. Returns whether the text changed.
    ///
    /// Every queued event is consumed even when syncing one of them fails; the first error is
    /// returned after the text and table reflect the final location.
    pub fn poll_navigation(&mut self) -> Result<bool, SyncError> {
        let mut changed = false;
        let mut first_error = None;
        while let Ok(event) = self.navigation.try_recv() {
            tracing::debug!(?event, "navigation event");
            let text = self.sync.on_navigation();
            changed |= text != self.text;
            if let Err(err) = self.set_text(text) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(changed),
        }
    }
}
