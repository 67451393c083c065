pub mod dashboard;
pub mod view;

pub use dashboard::{Dashboard, PendingFetch};
pub use view::{Effect, Status, ViewEvent, ViewState};
