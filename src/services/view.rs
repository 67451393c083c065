use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::models::PoolRecord;
use crate::sources::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

/// Observable dashboard state. One instance per running process.
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub status: Status,
    pub records: Vec<PoolRecord>,
    pub error_message: String,
    pub last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub enum ViewEvent {
    /// Startup or a user-requested refresh.
    Refresh,
    /// The outstanding fetch finished at the given time.
    Loaded(Result<Vec<PoolRecord>, FetchError>, DateTime<Utc>),
}

/// What the owner of the state must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    StartFetch,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            status: Status::Idle,
            records: Vec::new(),
            error_message: String::new(),
            last_updated_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Pure transition function.
    ///
    /// `Refresh` is ignored while a fetch is in flight, so at most one `StartFetch` is ever
    /// outstanding. `Loaded` is only meaningful in `Loading`; anywhere else it is dropped.
    pub fn update(mut self, event: ViewEvent) -> (Self, Effect) {
        match (self.status, event) {
            (Status::Loading, ViewEvent::Refresh) => (self, Effect::None),
            (_, ViewEvent::Refresh) => {
                self.status = Status::Loading;
                self.error_message.clear();
                (self, Effect::StartFetch)
            }
            (Status::Loading, ViewEvent::Loaded(Ok(records), at)) => {
                self.status = Status::Success;
                self.records = records;
                self.error_message.clear();
                self.last_updated_at = Some(at);
                (self, Effect::None)
            }
            (Status::Loading, ViewEvent::Loaded(Err(e), _)) => {
                self.status = Status::Error;
                self.records.clear();
                self.error_message = e.to_string();
                (self, Effect::None)
            }
            (_, ViewEvent::Loaded(..)) => (self, Effect::None),
        }
    }
}
