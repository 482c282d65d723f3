pub mod assignments;
pub mod class_users;
pub mod classes;
pub mod common;
pub mod grades;
pub mod notifications;
pub mod reports;
pub mod submissions;
pub mod users;
