//! Client side of FitFusion: a typed API client, session persistence and
//! the page state machines the CLI drives.

pub mod api;
pub mod dashboard;
pub mod forms;
pub mod page;
pub mod session;

pub use api::{ApiClient, ApiError, ResourceApi};
pub use forms::FormModel;
pub use page::{LoadState, ResourcePage, SubmitState, Toast, ToastKind};
pub use session::{Route, RouteGuard, Session, SessionStore};
