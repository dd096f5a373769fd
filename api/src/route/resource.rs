use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::{appointment::resource_appointments, slot::available_slots};

pub fn build_resource_routers() -> Router<AppRegistry> {
    let resources_routers = Router::new()
        .route("/:resource_id/available-slots", get(available_slots))
        .route("/:resource_id/appointments", get(resource_appointments));

    Router::new().nest("/resources", resources_routers)
}
