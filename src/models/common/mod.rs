pub mod response;

pub use response::{ApiResponse, SUCCESS_CODE};
