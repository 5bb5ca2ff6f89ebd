// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent GUID confusion at compile time.

mod app_name;
mod id;
mod naming;

pub use app_name::{AppName, AppNameError};
pub use id::{AppGuid, Id, JobGuid};
pub use naming::{DEFAULT_SUFFIX, Naming, NamingError};
