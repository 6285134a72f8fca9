//! # gpu-portal-core
//!
//! Domain model and client-side workflows of the GPU Portal, shared by the
//! mock backend and the browser UI. Nothing here performs I/O or needs an
//! async runtime, so the crate builds for `wasm32-unknown-unknown`.
//!
//! ## Modules
//!
//! - [`session`]: signed-in user, loading flag, storage mirror
//! - [`notifications`]: notification list with read state
//! - [`catalog`]: GPU catalog and its filters
//! - [`request`]: request form validation and the submission state machine
//! - [`history`]: request history filters, detail expansion, cancellation
//! - [`dashboard`]: summary counts, allocation cards, usage chart
//! - [`routes`]: route table and the authentication gate
//! - [`profile`]: profile edit draft
//! - [`theme`]: light/dark colour scheme
//! - [`mock`]: canned data served in place of real collaborators
//!
//! ## Example
//!
//! ```rust
//! use gpu_portal_core::{mock, Manufacturer, ResourceFilter};
//!
//! let catalog = mock::catalog();
//! let filter = ResourceFilter {
//!     manufacturer: Manufacturer::Nvidia,
//!     min_memory: 24,
//!     ..Default::default()
//! };
//! assert_eq!(filter.apply(&catalog).len(), 3);
//! ```

#![warn(clippy::all)]

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod mock;
pub mod notifications;
pub mod profile;
pub mod request;
pub mod routes;
pub mod session;
pub mod theme;

pub use catalog::{AvailabilityLevel, GpuResource, Manufacturer, ResourceFilter};
pub use dashboard::{
    ActiveAllocation, AllocationStatus, ClusterAvailability, DashboardSnapshot, DashboardSummary,
    ModelAvailability, RecentRequest, UsageChart, WarningLevel,
};
pub use error::{Error, Result};
pub use history::{
    DetailSelection, HistoryFilter, RequestAction, RequestHistory, RequestStatus,
    ResourceRequest, TimeFrame,
};
pub use notifications::{Notification, NotificationKind, NotificationStore, ReadFilter};
pub use profile::{ProfileDraft, ProfileEditor};
pub use request::{
    RequestForm, RequestWorkflow, SubmissionState, ValidatedRequest, ValidationError,
};
pub use routes::{gate, Gate, Route};
pub use session::{MemoryStorage, Session, SessionState, SessionStorage, SignIn, User};
pub use theme::Theme;
