//! Liveness probe.

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is up", body = String))
)]
pub async fn health_check() -> &'static str {
    "ok"
}
