pub mod entities;
pub mod responses;

pub use entities::{NewNotification, Notification, NotificationKind};
pub use responses::NotificationListResponse;
