//! Reusable UI components

pub mod avatar;
pub mod badges;
pub mod header;
pub mod loading;
pub mod shell;
pub mod sidebar;
pub mod toast;

pub use avatar::Avatar;
pub use badges::{AvailabilityBar, StatusBadge};
pub use header::Header;
pub use loading::{LoadingOverlay, LoadingSpinner, PageLoading, TableSkeleton};
pub use shell::Guarded;
pub use sidebar::Sidebar;
pub use toast::Toasts;
