//! Navigation environment: query-string locations and a browser-style history.

use std::sync::mpsc::{self, Receiver, Sender};

use url::Url;
use url::form_urlencoded;

use crate::domain::errors::SyncError;

/// Query parameter holding the raw option text.
pub const OPTIONS_PARAM: &str = "options";

/// A back/forward movement observed in the navigation environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Back,
    Forward,
}

/// Capabilities the synchronizer needs from its environment.
///
/// Locations are query strings including the leading `?`.
pub trait Navigator {
    /// The current entry's query string, or `None` when no location is available.
    fn location(&self) -> Option<String>;

    /// Overwrite the current entry without creating a new one.
    fn replace(&mut self, query: &str) -> Result<(), SyncError>;

    /// Add a new entry after the current one.
    fn push(&mut self, query: &str) -> Result<(), SyncError>;

    /// Register for back/forward notifications.
    fn subscribe(&mut self) -> Receiver<NavigationEvent>;
}

/// In-process history with browser semantics.
///
/// Pushing discards any forward entries. Moving back or forward notifies every live subscriber.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
    listeners: Vec<Sender<NavigationEvent>>,
}

impl MemoryHistory {
    /// Start with a single entry holding `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
            listeners: Vec::new(),
        }
    }

    /// Step back one entry. Returns `false` when already at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.notify(NavigationEvent::Back);
        true
    }

    /// Step forward one entry. Returns `false` when already at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        self.notify(NavigationEvent::Forward);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Zero-based position of the current entry.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn notify(&mut self, event: NavigationEvent) {
        self.listeners
            .retain(|listener| listener.send(event).is_ok());
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Navigator for MemoryHistory {
    fn location(&self) -> Option<String> {
        self.entries.get(self.cursor).cloned()
    }

    fn replace(&mut self, query: &str) -> Result<(), SyncError> {
        let entry = self
            .entries
            .get_mut(self.cursor)
            .ok_or(SyncError::Unavailable)?;
        *entry = query.to_owned();
        Ok(())
    }

    fn push(&mut self, query: &str) -> Result<(), SyncError> {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(query.to_owned());
        self.cursor = self.entries.len() - 1;
        Ok(())
    }

    fn subscribe(&mut self) -> Receiver<NavigationEvent> {
        let (sender, receiver) = mpsc::channel();
        self.listeners.push(sender);
        receiver
    }
}

/// Extract the raw option text from a query string. A missing parameter reads as empty text.
pub fn read_options(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == OPTIONS_PARAM)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Encode raw option text as a query string, e.g. `?options=a%2Cb`.
pub fn options_query(text: &str) -> String {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair(OPTIONS_PARAM, text)
        .finish();
    format!("?{encoded}")
}

/// Combine a base URL with a query string into a shareable link.
pub fn shareable_url(base: &str, query: &str) -> Result<String, SyncError> {
    let mut url = Url::parse(base).map_err(|source| SyncError::InvalidBaseUrl {
        url: base.to_owned(),
        source,
    })?;
    let query = query.strip_prefix('?').unwrap_or(query);
    url.set_query((!query.is_empty()).then_some(query));
    Ok(url.to_string())
}

/// Pull the query string out of a full URL, accepting bare query strings as well.
pub fn query_from_url(input: &str) -> String {
    match Url::parse(input) {
        Ok(url) => url.query().map(|query| format!("?{query}")).unwrap_or_default(),
        Err(_) => match input.find('?') {
            Some(start) => input[start..].to_owned(),
            None => String::new(),
        },
    }
}
