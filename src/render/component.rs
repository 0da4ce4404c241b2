//! Component drawing
//!
//! One draw routine per component variant, each defensive about collaborator
//! output: table rows may be ragged, chart values may be strings with
//! thousands separators or percent signs, series lengths may disagree with
//! the label list. Anything that cannot be repaired locally surfaces as a
//! [`ComponentError`] and the caller substitutes an error marker.

use thiserror::Error;

use crate::document::{Bounds, Chart, ChartType, Series, Shape, ShapeKind, Table, TextFrame};
use crate::plan::{ComponentSpec, RawNumber, SeriesSpec};

/// A component that could not be drawn from the data supplied
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("table has no rows or no columns")]
    EmptyTable,

    #[error("chart is missing labels or series")]
    MissingChartData,
}

/// Table style keys to the document style ids used by the stock theme
const TABLE_STYLES: &[(&str, &str)] = &[
    ("light", "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"),
    ("medium", "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"),
    ("dark", "{2D5ABB26-0587-4C30-8999-92F81FD0307C}"),
    ("accent", "{3C2FFA5D-87B4-456A-9821-1D502468CF0F}"),
];

const DEFAULT_TABLE_STYLE: &str = "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}";

/// Draw one component into the shape list at the given anchor bounds
pub fn draw_component(
    shapes: &mut Vec<Shape>,
    name: &str,
    bounds: Bounds,
    spec: &ComponentSpec,
) -> Result<(), ComponentError> {
    let kind = match spec {
        ComponentSpec::Text { content, .. } => ShapeKind::TextBox {
            frame: TextFrame::plain(content),
        },
        ComponentSpec::Table {
            rows,
            style,
            font_size,
            ..
        } => ShapeKind::Table {
            table: build_table(rows, style.as_deref(), *font_size)?,
        },
        ComponentSpec::Chart {
            chart_type,
            labels,
            series,
            title,
            ..
        } => ShapeKind::Chart {
            chart: build_chart(chart_type, labels, series, title.as_deref())?,
        },
    };

    shapes.push(Shape {
        name: name.to_string(),
        bounds,
        kind,
    });
    Ok(())
}

/// Drop an error-marker text box at the anchor a component failed to fill
pub fn draw_error_marker(shapes: &mut Vec<Shape>, name: &str, bounds: Bounds, message: &str) {
    shapes.push(Shape {
        name: name.to_string(),
        bounds,
        kind: ShapeKind::TextBox {
            frame: TextFrame::plain(&format!("[Component Error]\n{}", message)),
        },
    });
}

fn build_table(
    rows: &[Vec<String>],
    style: Option<&str>,
    font_size: Option<f64>,
) -> Result<Table, ComponentError> {
    let cols = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    if rows.is_empty() || cols == 0 {
        return Err(ComponentError::EmptyTable);
    }

    // Short rows become present-but-empty trailing cells
    let cells = rows
        .iter()
        .map(|row| {
            let mut padded = row.clone();
            padded.resize(cols, String::new());
            padded
        })
        .collect();

    let style_id = style
        .and_then(|key| {
            TABLE_STYLES
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, id)| *id)
        })
        .unwrap_or(DEFAULT_TABLE_STYLE)
        .to_string();

    Ok(Table {
        style_id,
        font_size: font_size.unwrap_or_else(|| auto_font_size(rows.len())),
        header_bold: true,
        cells,
    })
}

/// Step table keeping tall tables inside fixed anchor bounds
fn auto_font_size(row_count: usize) -> f64 {
    if row_count > 15 {
        9.0
    } else if row_count > 10 {
        10.0
    } else if row_count > 5 {
        12.0
    } else {
        14.0
    }
}

fn build_chart(
    chart_type: &str,
    labels: &[String],
    series: &[SeriesSpec],
    title: Option<&str>,
) -> Result<Chart, ComponentError> {
    if labels.is_empty() || series.is_empty() {
        return Err(ComponentError::MissingChartData);
    }

    let chart_type = parse_chart_type(chart_type);

    let sanitized: Vec<Series> = series
        .iter()
        .map(|s| Series {
            name: s.name.clone(),
            values: s.values.iter().map(sanitize_number).collect(),
        })
        .collect();

    // Align labels and every series to the common minimum length. Truncation
    // only; padding would invent data points.
    let aligned_len = sanitized
        .iter()
        .map(|s| s.values.len())
        .chain(std::iter::once(labels.len()))
        .min()
        .unwrap_or(0);

    let categories = labels[..aligned_len].to_vec();
    let series: Vec<Series> = sanitized
        .into_iter()
        .map(|mut s| {
            s.values.truncate(aligned_len);
            s
        })
        .collect();

    let legend =
        series.len() > 1 || matches!(chart_type, ChartType::Pie | ChartType::Doughnut);

    Ok(Chart {
        chart_type,
        title: title.map(|t| t.to_string()),
        categories,
        series,
        legend,
    })
}

/// Fixed chart-type table; unknown values fall back to bar
fn parse_chart_type(raw: &str) -> ChartType {
    match raw.to_lowercase().as_str() {
        "line" => ChartType::Line,
        "pie" => ChartType::Pie,
        "doughnut" => ChartType::Doughnut,
        "area" => ChartType::Area,
        _ => ChartType::Bar,
    }
}

/// Coerce a loosely-typed value to a float
///
/// Thousands separators and a percent sign are stripped before parsing;
/// anything still unparseable becomes 0.0 rather than failing the chart.
pub fn sanitize_number(value: &RawNumber) -> f64 {
    match value {
        RawNumber::Number(n) => *n,
        RawNumber::Text(s) => {
            let clean = s.replace(',', "").replace('%', "");
            clean.trim().parse().unwrap_or(0.0)
        }
    }
}
