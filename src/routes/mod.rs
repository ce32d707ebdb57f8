// Route exports
pub mod pharmacies;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(pharmacies::configure),
    );
}
