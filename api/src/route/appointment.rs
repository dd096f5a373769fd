use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::appointment::{create_appointment, show_appointment, update_appointment};

pub fn build_appointment_routers() -> Router<AppRegistry> {
    let appointments_routers = Router::new()
        .route("/", post(create_appointment))
        .route("/:appointment_id", get(show_appointment))
        .route("/:appointment_id", put(update_appointment));

    Router::new().nest("/appointments", appointments_routers)
}
