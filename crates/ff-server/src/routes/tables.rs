//! Raw table dumps.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use ff_db::models::Table;

use crate::context::AppContext;
use crate::error::AppError;

/// All rows of one table. Book rows report content size instead of the
/// blob; user rows never include the credential.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TableDumpResponse {
    pub table: String,
    pub count: usize,
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<serde_json::Value>,
}

/// GET /api/tables/{table}
#[utoipa::path(
    get,
    path = "/api/tables/{table}",
    params(("table" = String, Path, description = "One of authors, books, users, reviews")),
    responses(
        (status = 200, description = "Every row of the table", body = TableDumpResponse),
        (status = 400, description = "Unknown table")
    )
)]
pub async fn dump_table(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> Result<Json<TableDumpResponse>, AppError> {
    let table: Table = name.parse()?;

    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let rows = ff_db::queries::dump_table(&conn, table)?;

    Ok(Json(TableDumpResponse {
        table: table.to_string(),
        count: rows.len(),
        rows,
    }))
}
