use axum::routing::get;
use axum::Router;

use crate::handlers::discovery;
use crate::state::AppState;

/// Routes mounted at `/discovery`.
///
/// ```text
/// GET    /                                      -> trending
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(discovery::trending))
}
