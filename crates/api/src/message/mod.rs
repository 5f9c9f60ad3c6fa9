pub mod handle_message;
pub mod run_automation;

use actix_web::web;
use handle_message::receive_message_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/messages", web::post().to(receive_message_controller));
}
