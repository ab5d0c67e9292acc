pub mod concept;
pub mod ddx;
pub mod ops;
pub mod terminology;
pub mod ttx;

use axum::{
    Router,
    routing::{get, post},
};
use deadpool_postgres::Pool;

/// Build the model, concept and terminology routes
pub fn api_routes() -> Router<Pool> {
    Router::new()
        .route("/ddx", post(ddx::create))
        .route("/ttxv1", post(ttx::create))
        .route("/snomed", post(concept::map_snomed))
        .route("/getdiags/{term}", get(terminology::search))
}
