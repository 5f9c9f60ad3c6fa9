pub mod dispatch_due_occurrences;
pub mod materialize_occurrences;
pub mod run_sweep;

use actix_web::web;
use run_sweep::run_sweep_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sweep", web::post().to(run_sweep_controller));
}
