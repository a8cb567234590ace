//! Presentation state
//!
//! [`ViewState`] is the single snapshot the presentation layer renders from.
//! It owns no I/O; the application layer feeds workflow outcomes into the
//! reducer methods below.

use std::sync::Arc;

use serde::Serialize;

use pekked_provider::ChainId;

use super::{Candidate, EditMode, MintRecord, RegistrationStep, Session};

/// Message bar above the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Banner {
    Error(String),
    Notice(String),
}

/// Which screen the session allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// No account connected
    Connect,
    /// Connected on another network than the required one
    SwitchNetwork,
    /// Mint or edit form
    Form,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub required_network: ChainId,
    pub session: Session,
    pub candidate: Candidate,
    pub edit_mode: EditMode,
    /// Registration in flight
    pub minting: bool,
    /// Record edit in flight
    pub loading: bool,
    pub step: RegistrationStep,
    pub banner: Option<Banner>,
    pub mints: Arc<Vec<MintRecord>>,
}

impl ViewState {
    pub fn new(required_network: ChainId) -> Self {
        Self {
            required_network,
            session: Session::default(),
            candidate: Candidate::default(),
            edit_mode: EditMode::Inactive,
            minting: false,
            loading: false,
            step: RegistrationStep::Idle,
            banner: None,
            mints: Arc::new(Vec::new()),
        }
    }

    pub fn is_on_required_network(&self) -> bool {
        self.session.network == Some(self.required_network)
    }

    pub fn screen(&self) -> Screen {
        if !self.session.is_connected() {
            Screen::Connect
        } else if !self.is_on_required_network() {
            Screen::SwitchNetwork
        } else {
            Screen::Form
        }
    }

    /// Mints are listed only for a connected session.
    pub fn visible_mints(&self) -> &[MintRecord] {
        if self.session.is_connected() {
            self.mints.as_slice()
        } else {
            &[]
        }
    }

    pub fn is_busy(&self) -> bool {
        self.minting || self.loading
    }

    /// A new session invalidates everything derived from the old one.
    pub fn reset_session(&mut self, session: Session) {
        if session != self.session {
            self.edit_mode = EditMode::Inactive;
            self.mints = Arc::new(Vec::new());
        }
        self.session = session;
    }

    pub fn begin_mint(&mut self) {
        self.minting = true;
        self.banner = None;
    }

    /// Registration finished; the candidate is cleared only on success.
    pub fn finish_mint(&mut self, result: Result<Option<String>, String>) {
        self.minting = false;
        match result {
            Ok(notice) => {
                self.candidate.clear();
                self.banner = notice.map(Banner::Notice);
            }
            Err(message) => self.banner = Some(Banner::Error(message)),
        }
    }

    /// Load the selected record into the form.
    pub fn enter_edit(&mut self, mint: &MintRecord) {
        self.edit_mode = EditMode::Editing(mint.name.clone());
        self.candidate = Candidate::new(mint.name.clone(), mint.record.clone());
        self.banner = None;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_mode = EditMode::Inactive;
        self.candidate.clear();
    }

    pub fn begin_update(&mut self) {
        self.loading = true;
        self.banner = None;
    }

    /// The loading flag is cleared on every outcome; failures keep the form
    /// in edit mode with an error banner.
    pub fn finish_update(&mut self, result: Result<(), String>) {
        self.loading = false;
        match result {
            Ok(()) => {
                self.cancel_edit();
            }
            Err(message) => self.banner = Some(Banner::Error(message)),
        }
    }

    pub fn set_mints(&mut self, mints: Arc<Vec<MintRecord>>) {
        self.mints = mints;
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::Error(message.into()));
    }
}
