//! Type definitions

mod registry;
mod session;
mod view_state;
mod workflow;

pub use registry::{Candidate, EditMode, MintRecord};
pub use session::Session;
pub use view_state::{Banner, Screen, ViewState};
pub use workflow::{RegistrationStep, TxKind, WorkflowStatus};

// Re-export boundary types used throughout the core
pub use pekked_provider::{Address, ChainDescriptor, ChainId, TxHash, TxReceipt, Wei};
