//! SVG heatmap painting over the squarified layout.

use heatmap_core::StockRecord;

use crate::layout::{squarify, Rect};

pub const CANVAS_WIDTH: f64 = 1200.0;
pub const CANVAS_HEIGHT: f64 = 800.0;
const CELL_PADDING: f64 = 1.0;
const BACKGROUND: &str = "#111111";

/// Render records as a self-contained SVG treemap. Cell area is
/// proportional to |daily_return|, fill is green for non-negative returns
/// and red for negative ones, with intensity saturating at a 25.5% move.
/// Same records in the same order always produce the same document.
pub fn render(records: &[StockRecord]) -> String {
    // Descending weight, stable so equal weights keep input order.
    let mut ordered: Vec<&StockRecord> = records.iter().collect();
    ordered.sort_by(|a, b| {
        b.daily_return
            .abs()
            .partial_cmp(&a.daily_return.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let weights: Vec<f64> = ordered.iter().map(|r| r.daily_return.abs()).collect();
    let bounds = Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);
    let cells = squarify(&weights, bounds, CELL_PADDING);

    let mut svg = String::with_capacity(records.len() * 256 + 256);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"<rect width="{w}" height="{h}" fill="{bg}"/>"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
        bg = BACKGROUND
    ));
    svg.push('\n');

    for (record, cell) in ordered.iter().zip(&cells) {
        if cell.area() <= 0.0 {
            // Zero-weight record, nothing visible to paint.
            continue;
        }

        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            cell.x0,
            cell.y0,
            cell.width(),
            cell.height(),
            cell_color(record.daily_return)
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="13" fill="#ffffff">{}</text>"##,
            cell.x0 + 4.0,
            cell.y0 + 16.0,
            record.symbol
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" fill="#ffffff">{:.1}%</text>"##,
            cell.x0 + 4.0,
            cell.y0 + 30.0,
            record.daily_return
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

fn cell_color(daily_return: f64) -> String {
    let intensity = (daily_return.abs() * 10.0).min(255.0) as u8;
    if daily_return >= 0.0 {
        format!("rgb(0,{},0)", intensity)
    } else {
        format!("rgb({},0,0)", intensity)
    }
}
