//! Askama templates for the report page.

use askama::Template;

use crate::core::ReportRow;

pub const REPORT_TITLE: &str = "Estadísticas de Descargas";

/// Download statistics table, one row per product.
#[derive(Template)]
#[template(path = "estadisticas.html")]
pub struct EstadisticasTemplate<'a> {
    pub title: &'a str,
    pub rows: Vec<ReportRow>,
}

impl EstadisticasTemplate<'static> {
    pub fn new(rows: Vec<ReportRow>) -> Self {
        Self {
            title: REPORT_TITLE,
            rows,
        }
    }
}
