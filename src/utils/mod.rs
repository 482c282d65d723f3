pub mod clock;
pub mod jwt;
pub mod parameter_error_handler;
pub mod validate;

pub use clock::{Clock, SystemClock, hours_between};
pub use jwt::JwtUtils;
pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};
