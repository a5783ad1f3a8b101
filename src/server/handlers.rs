use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::templates::EstadisticasTemplate;
use super::AppState;
use crate::utils::error::Result;

pub const REPORT_ERROR_BODY: &str = "Error generando estadísticas.";

/// `GET /estadisticas`: rebuilds the report and renders it as an HTML table.
pub async fn estadisticas(State(state): State<AppState>) -> Response {
    match render_report(&state).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("❌ Error generating statistics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, REPORT_ERROR_BODY).into_response()
        }
    }
}

async fn render_report(state: &AppState) -> Result<String> {
    let rows = state.engine.run().await?;
    Ok(EstadisticasTemplate::new(rows).render()?)
}
