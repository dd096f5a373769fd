use axum::Router;
use registry::AppRegistry;

use super::{
    appointment::build_appointment_routers, health::build_health_check_routers,
    resource::build_resource_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_resource_routers())
        .merge(build_appointment_routers());
    Router::new().nest("/api/v1", router)
}
