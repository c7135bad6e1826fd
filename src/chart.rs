//! SVG chart rendering for the selected table.
//!
//! Marks map 1:1 onto data rows: one bar, one line point, or one pie slice
//! per row, in row order. No aggregation, binning, or sorting happens here;
//! duplicate categories stay separate marks.

use std::f64::consts::{PI, TAU};
use std::fmt::{Display, Formatter, Write as _};
use std::str::FromStr;

use pdf_to_tables::{ChartTable, format_number};

pub const VIEW_WIDTH: f64 = 640.0;
pub const VIEW_HEIGHT: f64 = 400.0;

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 56.0;

const SERIES_COLOR: &str = "#4e79a7";
const SLICE_COLORS: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

const MAX_LEGEND_ROWS: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "pie" => Ok(Self::Pie),
            other => Err(format!("unknown chart kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRequest {
    /// X-axis column index; any column works as category labels.
    pub x: usize,
    /// Y-axis column index; must be in the table's numeric-column set.
    pub y: usize,
    pub kind: ChartKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    AxisOutOfRange(usize),
    YAxisNotNumeric(usize),
    NotChartable,
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AxisOutOfRange(index) => write!(f, "axis column {index} is out of range"),
            Self::YAxisNotNumeric(index) => {
                write!(f, "column {index} is not numeric and cannot be a Y axis")
            }
            Self::NotChartable => write!(f, "table must have at least 2 columns to chart"),
        }
    }
}

impl std::error::Error for ChartError {}

/// Render the requested chart as a standalone SVG document.
pub fn render_chart(table: &ChartTable, request: &ChartRequest) -> Result<String, ChartError> {
    if table.column_count() < 2 {
        return Err(ChartError::NotChartable);
    }
    if request.x >= table.column_count() {
        return Err(ChartError::AxisOutOfRange(request.x));
    }
    if request.y >= table.column_count() {
        return Err(ChartError::AxisOutOfRange(request.y));
    }
    if !table.numeric_columns().contains(&request.y) {
        return Err(ChartError::YAxisNotNumeric(request.y));
    }

    // One (category label, numeric value) pair per data row, row order kept.
    let series = table
        .rows
        .iter()
        .map(|row| (row[request.x].display(), row[request.y].as_number()))
        .collect::<Vec<_>>();

    let svg = match request.kind {
        ChartKind::Bar => render_bar(&series),
        ChartKind::Line => render_line(&series),
        ChartKind::Pie => render_pie(&series),
    };
    Ok(svg)
}

fn plot_width() -> f64 {
    VIEW_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    VIEW_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

struct ValueScale {
    min: f64,
    max: f64,
}

impl ValueScale {
    fn y_px(&self, value: f64) -> f64 {
        let t = (value - self.min) / (self.max - self.min);
        MARGIN_TOP + (1.0 - t) * plot_height()
    }
}

fn value_bounds(series: &[(String, Option<f64>)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in series.iter().filter_map(|(_, value)| *value) {
        min = min.min(value);
        max = max.max(value);
    }
    (min, max)
}

fn nice_step(range: f64) -> f64 {
    let raw = range / 5.0;
    let magnitude = 10_f64.powf(raw.log10().floor());
    for multiple in [1.0, 2.0, 5.0, 10.0] {
        let step = magnitude * multiple;
        if step >= raw {
            return step;
        }
    }
    magnitude * 10.0
}

fn axis_ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil();
    let mut ticks = Vec::new();
    let mut index = 0.0;
    while (first + index) * step <= max + step * 1e-6 {
        ticks.push((first + index) * step);
        index += 1.0;
    }
    ticks
}

/// Decimal places that render a tick value exactly for the given step.
fn tick_decimals(step: f64) -> usize {
    let places = -step.log10().floor();
    if places > 0.0 { places as usize } else { 0 }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out = text.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

fn svg_open(out: &mut String) {
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
         width=\"{VIEW_WIDTH}\" height=\"{VIEW_HEIGHT}\" \
         viewBox=\"0 0 {VIEW_WIDTH} {VIEW_HEIGHT}\" \
         font-family=\"sans-serif\" font-size=\"11\">\n"
    );
}

fn draw_value_axis(out: &mut String, scale: &ValueScale) {
    let bottom = MARGIN_TOP + plot_height();
    let _ = write!(
        out,
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{bottom}\" \
         stroke=\"#333\" stroke-width=\"1\"/>\n"
    );
    let step = nice_step(scale.max - scale.min);
    let decimals = tick_decimals(step);
    for tick in axis_ticks(scale.min, scale.max, step) {
        let y = scale.y_px(tick);
        let mark_start = MARGIN_LEFT - 4.0;
        let _ = write!(
            out,
            "  <line x1=\"{mark_start}\" y1=\"{y}\" x2=\"{MARGIN_LEFT}\" y2=\"{y}\" \
             stroke=\"#333\" stroke-width=\"1\"/>\n"
        );
        let text_x = MARGIN_LEFT - 8.0;
        let text_y = y + 4.0;
        let _ = write!(
            out,
            "  <text x=\"{text_x}\" y=\"{text_y}\" text-anchor=\"end\">{tick:.decimals$}</text>\n"
        );
    }
}

fn draw_category_labels(out: &mut String, labels: &[String]) {
    let slot = plot_width() / labels.len() as f64;
    let y = MARGIN_TOP + plot_height() + 18.0;
    for (index, label) in labels.iter().enumerate() {
        let x = MARGIN_LEFT + (index as f64 + 0.5) * slot;
        let _ = write!(
            out,
            "  <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\">{}</text>\n",
            xml_escape(&truncate_label(label, 12))
        );
    }
}

fn render_bar(series: &[(String, Option<f64>)]) -> String {
    let (low, high) = value_bounds(series);
    let mut min = low.min(0.0);
    let mut max = high.max(0.0);
    if !(max - min).is_normal() {
        min = 0.0;
        max = 1.0;
    }
    let scale = ValueScale { min, max };

    let mut out = String::new();
    svg_open(&mut out);
    draw_value_axis(&mut out, &scale);

    let baseline = scale.y_px(0.0);
    let right = MARGIN_LEFT + plot_width();
    let _ = write!(
        out,
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{baseline}\" x2=\"{right}\" y2=\"{baseline}\" \
         stroke=\"#333\" stroke-width=\"1\"/>\n"
    );

    let slot = plot_width() / series.len() as f64;
    for (index, (_, value)) in series.iter().enumerate() {
        // Missing values keep their category slot but draw no bar.
        let Some(value) = value else {
            continue;
        };
        let x = MARGIN_LEFT + index as f64 * slot + slot * 0.15;
        let width = slot * 0.7;
        let top = scale.y_px(*value).min(baseline);
        let height = (scale.y_px(*value) - baseline).abs();
        let _ = write!(
            out,
            "  <rect x=\"{x}\" y=\"{top}\" width=\"{width}\" height=\"{height}\" \
             fill=\"{SERIES_COLOR}\"/>\n"
        );
    }

    let labels = series.iter().map(|(label, _)| label.clone()).collect::<Vec<_>>();
    draw_category_labels(&mut out, &labels);
    out.push_str("</svg>\n");
    out
}

fn render_line(series: &[(String, Option<f64>)]) -> String {
    let (low, high) = value_bounds(series);
    let (mut min, mut max) = (low, high);
    if !min.is_finite() || !max.is_finite() {
        min = 0.0;
        max = 1.0;
    }
    let padding = if max > min { (max - min) * 0.05 } else { 1.0 };
    let scale = ValueScale {
        min: min - padding,
        max: max + padding,
    };

    let mut out = String::new();
    svg_open(&mut out);
    draw_value_axis(&mut out, &scale);

    let slot = plot_width() / series.len() as f64;
    let point_x = |index: usize| MARGIN_LEFT + (index as f64 + 0.5) * slot;

    // Consecutive present values form one segment; a missing value breaks
    // the line rather than bridging the gap.
    let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (index, (_, value)) in series.iter().enumerate() {
        match value {
            Some(value) => current.push((point_x(index), scale.y_px(*value))),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    for segment in &segments {
        if segment.len() >= 2 {
            let points = segment
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(
                out,
                "  <polyline points=\"{points}\" fill=\"none\" stroke=\"{SERIES_COLOR}\" \
                 stroke-width=\"2\"/>\n"
            );
        }
        for (x, y) in segment {
            let _ = write!(
                out,
                "  <circle cx=\"{x}\" cy=\"{y}\" r=\"3\" fill=\"{SERIES_COLOR}\"/>\n"
            );
        }
    }

    let labels = series.iter().map(|(label, _)| label.clone()).collect::<Vec<_>>();
    draw_category_labels(&mut out, &labels);
    out.push_str("</svg>\n");
    out
}

fn render_pie(series: &[(String, Option<f64>)]) -> String {
    let mut out = String::new();
    svg_open(&mut out);

    // Slice geometry needs positive weights; zero, negative, and missing
    // values are skipped.
    let total: f64 = series
        .iter()
        .filter_map(|(_, value)| *value)
        .filter(|value| *value > 0.0)
        .sum();

    let center_x = 200.0;
    let center_y = VIEW_HEIGHT / 2.0;
    let radius = 140.0;

    if total <= 0.0 {
        let _ = write!(
            out,
            "  <text x=\"{center_x}\" y=\"{center_y}\" text-anchor=\"middle\">no positive \
             values to plot</text>\n</svg>\n"
        );
        return out;
    }

    let mut angle = -PI / 2.0;
    let mut legend_row = 0_usize;
    let mut hidden_legend_entries = 0_usize;

    for (index, (label, value)) in series.iter().enumerate() {
        let Some(value) = value.filter(|value| *value > 0.0) else {
            continue;
        };

        let fraction = value / total;
        let color = SLICE_COLORS[index % SLICE_COLORS.len()];

        if fraction >= 1.0 - 1e-9 {
            let _ = write!(
                out,
                "  <path d=\"M {cx} {top} A {r} {r} 0 1 1 {cx} {bottom} A {r} {r} 0 1 1 {cx} \
                 {top} Z\" fill=\"{color}\"/>\n",
                cx = center_x,
                top = center_y - radius,
                bottom = center_y + radius,
                r = radius,
            );
        } else {
            let end = angle + fraction * TAU;
            let (x1, y1) = (center_x + radius * angle.cos(), center_y + radius * angle.sin());
            let (x2, y2) = (center_x + radius * end.cos(), center_y + radius * end.sin());
            let large_arc = i32::from(fraction > 0.5);
            let _ = write!(
                out,
                "  <path d=\"M {center_x} {center_y} L {x1} {y1} A {radius} {radius} 0 \
                 {large_arc} 1 {x2} {y2} Z\" fill=\"{color}\"/>\n"
            );
            angle = end;
        }

        // Legend, one row per slice; duplicate names stay separate rows.
        if legend_row < MAX_LEGEND_ROWS {
            let swatch_y = MARGIN_TOP + legend_row as f64 * 18.0;
            let text_y = swatch_y + 9.0;
            let _ = write!(
                out,
                "  <rect x=\"380\" y=\"{swatch_y}\" width=\"10\" height=\"10\" \
                 fill=\"{color}\"/>\n  <text x=\"396\" y=\"{text_y}\">{} ({})</text>\n",
                xml_escape(&truncate_label(label, 24)),
                xml_escape(&format_number(value)),
            );
            legend_row += 1;
        } else {
            hidden_legend_entries += 1;
        }
    }

    if hidden_legend_entries > 0 {
        let text_y = MARGIN_TOP + legend_row as f64 * 18.0 + 9.0;
        let _ = write!(
            out,
            "  <text x=\"396\" y=\"{text_y}\">+ {hidden_legend_entries} more</text>\n"
        );
    }

    out.push_str("</svg>\n");
    out
}
