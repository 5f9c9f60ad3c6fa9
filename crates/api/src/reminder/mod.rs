pub mod create_reminder;
pub mod create_template;
pub mod list_reminders;

use actix_web::web;
use create_reminder::create_reminder_controller;
use create_template::create_template_controller;
use list_reminders::list_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/reminders",
        web::get().to(list_reminders_controller),
    );
    cfg.route(
        "/users/{user_id}/reminders",
        web::post().to(create_reminder_controller),
    );
    cfg.route(
        "/users/{user_id}/templates",
        web::post().to(create_template_controller),
    );
}
