pub mod assignments;

pub mod classes;

pub mod notifications;

pub mod reports;

pub mod submissions;

pub use assignments::configure_assignments_routes;
pub use classes::configure_classes_routes;
pub use notifications::configure_notifications_routes;
pub use submissions::configure_submissions_routes;

use actix_web::web;

// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_assignments_routes)
        .configure(configure_submissions_routes)
        .configure(configure_classes_routes)
        .configure(configure_notifications_routes);
}

#[cfg(test)]
mod tests;
