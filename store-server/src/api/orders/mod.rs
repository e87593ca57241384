//! Order API module

mod handler;

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/unpaid", get(handler::list_unpaid))
        .route("/awaiting-delivery", get(handler::list_awaiting_delivery))
        .route("/completed", get(handler::list_completed))
        .route("/purge-unpaid", delete(handler::purge_unpaid))
        .route("/purge-completed", delete(handler::purge_completed))
        .route(
            "/by-user/{user_id}",
            get(handler::list_by_user).delete(handler::delete_by_user),
        )
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/pay", put(handler::pay))
        .route("/{id}/deliver", put(handler::deliver))
}
