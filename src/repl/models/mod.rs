//! # Models Module
//!
//! Plain data carried between the services, view models and views.

pub mod page;
pub mod profile;
pub mod search;
pub mod status_line;

pub use page::{PaginationInfo, ProfilePage};
pub use profile::{Gender, ProfileRecord, UnknownGender, UserAccount};
pub use search::{SearchCriteria, UnknownCriteria};
pub use status_line::{Notification, NotificationLevel, StatusLine};
