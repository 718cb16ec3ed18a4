//! Charting: aggregating a [`DataTable`] and drawing it as inline SVG.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;
use thiserror::Error;

use crate::color::{DEFAULT_COLOR, PALETTE, parse_color};
use crate::model::{ChartDirective, ChartKind, DataTable};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("column '{0}' does not exist")]
    MissingColumn(String),

    #[error("row {row} has no numeric value in column '{column}'")]
    NotNumeric { row: usize, column: String },

    #[error("unrecognised colour '{0}'")]
    BadColor(String),

    #[error("table has no rows")]
    EmptyTable,
}

/// One aggregated group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl DataPoint {
    /// Drawn size of the mark. Negative values draw as empty marks.
    pub fn extent(&self) -> f64 {
        self.value.max(0.0)
    }
}

/// A chart ready to be placed on a surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartObject {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub points: Vec<DataPoint>,
}

/// Turns a table and a directive into a renderable chart.
pub trait ChartBuilder {
    fn build_chart(
        &self,
        table: &DataTable,
        directive: &ChartDirective,
    ) -> Result<ChartObject, ChartError>;
}

/// Default builder: groups rows by the `x` column and counts or sums them.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableChartBuilder;

impl ChartBuilder for TableChartBuilder {
    fn build_chart(
        &self,
        table: &DataTable,
        directive: &ChartDirective,
    ) -> Result<ChartObject, ChartError> {
        let color = match &directive.color {
            Some(c) => parse_color(c).ok_or_else(|| ChartError::BadColor(c.clone()))?,
            None => DEFAULT_COLOR.to_string(),
        };
        let points = aggregate(table, &directive.x, directive.y.as_deref())?;
        Ok(ChartObject {
            kind: directive.kind,
            title: directive.title.clone(),
            x_label: directive.x.clone(),
            y_label: directive.y.clone().unwrap_or_else(|| "count".to_string()),
            color,
            points,
        })
    }
}

/// Group rows by `x`, in order of first appearance.
///
/// With `y` the group value is the sum of that column, otherwise the row count.
pub fn aggregate(table: &DataTable, x: &str, y: Option<&str>) -> Result<Vec<DataPoint>, ChartError> {
    let xi = table
        .column_index(x)
        .ok_or_else(|| ChartError::MissingColumn(x.to_string()))?;
    let yi = y
        .map(|y| {
            table
                .column_index(y)
                .ok_or_else(|| ChartError::MissingColumn(y.to_string()))
        })
        .transpose()?;
    if table.rows.is_empty() {
        return Err(ChartError::EmptyTable);
    }

    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for (row_no, row) in table.rows.iter().enumerate() {
        let Some(key) = row.get(xi) else {
            continue;
        };
        let value = match yi {
            Some(yi) => row
                .get(yi)
                .and_then(|c| c.as_number())
                .ok_or_else(|| ChartError::NotNumeric {
                    row: row_no,
                    column: table.columns[yi].clone(),
                })?,
            None => 1.0,
        };
        *groups.entry(key.label()).or_default() += value;
    }
    Ok(groups
        .into_iter()
        .map(|(label, value)| DataPoint { label, value })
        .collect())
}

fn esc(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

const WIDTH: f64 = 640.0;
const MARGIN: f64 = 40.0;

impl ChartObject {
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(DataPoint::extent).fold(0.0, f64::max)
    }

    /// Draw the chart as a standalone `<svg>` element of the given pixel height.
    pub fn to_svg(&self, height: u32) -> String {
        let h = f64::from(height.max(120));
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart chart-{kind}" viewBox="0 0 {WIDTH} {h}" width="100%" height="{height}" role="img">"#,
            kind = self.kind.as_str(),
        );
        if let Some(title) = &self.title {
            let _ = write!(
                out,
                r#"<title>{t}</title><text x="{x}" y="20" text-anchor="middle" font-weight="bold">{t}</text>"#,
                t = esc(title),
                x = WIDTH / 2.0,
            );
        }
        match self.kind {
            ChartKind::Bar => self.draw_bars(&mut out, h),
            ChartKind::Line => self.draw_line(&mut out, h),
            ChartKind::Pie => self.draw_pie(&mut out, h),
        }
        out.push_str("</svg>");
        out
    }

    fn plot_area(&self, h: f64) -> (f64, f64, f64, f64) {
        // left, top, width, height
        (MARGIN, MARGIN, WIDTH - 2.0 * MARGIN, h - 2.0 * MARGIN)
    }

    fn draw_bars(&self, out: &mut String, h: f64) {
        let (left, top, pw, ph) = self.plot_area(h);
        let max = self.max_value();
        let n = self.points.len().max(1) as f64;
        let slot = pw / n;
        for (i, p) in self.points.iter().enumerate() {
            let bh = if max > 0.0 { p.extent() / max * ph } else { 0.0 };
            let x = left + slot * i as f64 + slot * 0.1;
            let y = top + ph - bh;
            let _ = write!(
                out,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{bh:.1}" fill="{c}"><title>{l}: {v}</title></rect><text x="{tx:.1}" y="{ty:.1}" text-anchor="middle" font-size="11">{l}</text>"#,
                w = slot * 0.8,
                c = self.color,
                l = esc(&p.label),
                v = fmt_value(p.value),
                tx = x + slot * 0.4,
                ty = top + ph + 14.0,
            );
        }
    }

    fn draw_line(&self, out: &mut String, h: f64) {
        let (left, top, pw, ph) = self.plot_area(h);
        let max = self.max_value();
        let step = if self.points.len() > 1 {
            pw / (self.points.len() - 1) as f64
        } else {
            0.0
        };
        let coords: Vec<(f64, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let y = if max > 0.0 { p.extent() / max * ph } else { 0.0 };
                (left + step * i as f64, top + ph - y)
            })
            .collect();
        let path: Vec<String> = coords.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
        let _ = write!(
            out,
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            self.color,
            path.join(" ")
        );
        for ((x, y), p) in coords.iter().zip(&self.points) {
            let _ = write!(
                out,
                r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{c}"><title>{l}: {v}</title></circle><text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="11">{l}</text>"#,
                c = self.color,
                l = esc(&p.label),
                v = fmt_value(p.value),
                ty = top + ph + 14.0,
            );
        }
    }

    fn draw_pie(&self, out: &mut String, h: f64) {
        let total: f64 = self.points.iter().map(DataPoint::extent).sum();
        if total <= 0.0 {
            return;
        }
        let cx = WIDTH / 2.0;
        let cy = h / 2.0 + 10.0;
        let r = (h / 2.0 - MARGIN).max(10.0);
        let mut angle = -std::f64::consts::FRAC_PI_2;
        for (i, p) in self.points.iter().enumerate() {
            let sweep = p.extent() / total * std::f64::consts::TAU;
            let color = PALETTE[i % PALETTE.len()];
            let label = esc(&p.label);
            let pct = p.extent() / total * 100.0;
            if (sweep - std::f64::consts::TAU).abs() < 1e-9 {
                let _ = write!(
                    out,
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{color}"><title>{label}: {pct:.1}%</title></circle>"#
                );
            } else {
                let (x0, y0) = (cx + r * angle.cos(), cy + r * angle.sin());
                let end = angle + sweep;
                let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
                let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
                let _ = write!(
                    out,
                    r#"<path d="M{cx:.1},{cy:.1} L{x0:.1},{y0:.1} A{r:.1},{r:.1} 0 {large} 1 {x1:.1},{y1:.1} Z" fill="{color}"><title>{label}: {pct:.1}%</title></path>"#
                );
            }
            let _ = write!(
                out,
                r#"<text x="10" y="{ly:.1}" font-size="11" fill="{color}">{label} ({pct:.1}%)</text>"#,
                ly = MARGIN + 14.0 * i as f64,
            );
            angle += sweep;
        }
    }
}
