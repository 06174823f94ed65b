//! Inline SVG charts of sentiment counts

use super::SentimentCounts;
use crate::config::ChartStyle;
use std::f64::consts::PI;
use std::fmt::Write as _;

const BAR_WIDTH: f64 = 420.0;
const BAR_HEIGHT: f64 = 260.0;
const BAR_MARGIN: f64 = 30.0;

const PIE_SIZE: f64 = 240.0;
const PIE_RADIUS: f64 = 100.0;
const DONUT_HOLE: f64 = 0.55;

/// Bar chart: one bar per label present in `counts`
pub fn bar_chart_svg(counts: &SentimentCounts) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart bar-chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img" aria-label="Sentiment distribution bar chart">"#,
        w = BAR_WIDTH,
        h = BAR_HEIGHT
    );

    if counts.is_empty() {
        push_empty_note(&mut svg, BAR_WIDTH, BAR_HEIGHT);
        svg.push_str("</svg>");
        return svg;
    }

    let max = counts.entries.iter().map(|e| e.count).max().unwrap_or(1).max(1) as f64;
    let plot_height = BAR_HEIGHT - 2.0 * BAR_MARGIN;
    let slot = (BAR_WIDTH - 2.0 * BAR_MARGIN) / counts.entries.len() as f64;
    let bar_width = slot * 0.6;
    let baseline = BAR_HEIGHT - BAR_MARGIN;

    let _ = write!(
        svg,
        r#"<line x1="{x0:.1}" y1="{y:.1}" x2="{x1:.1}" y2="{y:.1}" stroke="currentColor"/>"#,
        x0 = BAR_MARGIN,
        x1 = BAR_WIDTH - BAR_MARGIN,
        y = baseline
    );

    for (i, entry) in counts.entries.iter().enumerate() {
        let height = entry.count as f64 / max * (plot_height - 14.0);
        let x = BAR_MARGIN + slot * i as f64 + (slot - bar_width) / 2.0;
        let y = baseline - height;
        let center = x + bar_width / 2.0;

        let _ = write!(
            svg,
            r#"<rect class="bar" data-label="{label}" data-count="{count}" x="{x:.1}" y="{y:.1}" width="{bw:.1}" height="{h:.1}" fill="{color}"/>"#,
            label = entry.label,
            count = entry.count,
            bw = bar_width,
            h = height,
            color = entry.label.color()
        );
        let _ = write!(
            svg,
            r#"<text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" font-size="12">{count}</text>"#,
            cx = center,
            ty = y - 4.0,
            count = entry.count
        );
        let _ = write!(
            svg,
            r#"<text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" font-size="12">{label}</text>"#,
            cx = center,
            ty = baseline + 16.0,
            label = entry.label
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Pie (or donut) chart: one wedge per label present in `counts`
///
/// A single label is drawn as a full circle.
pub fn pie_chart_svg(counts: &SentimentCounts, style: ChartStyle) -> String {
    let width = PIE_SIZE + 160.0;
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart pie-chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img" aria-label="Sentiment distribution pie chart">"#,
        w = width,
        h = PIE_SIZE
    );

    if counts.is_empty() || counts.total == 0 {
        push_empty_note(&mut svg, width, PIE_SIZE);
        svg.push_str("</svg>");
        return svg;
    }

    let (cx, cy) = (PIE_SIZE / 2.0, PIE_SIZE / 2.0);

    if counts.entries.len() == 1 {
        let entry = counts.entries[0];
        let _ = write!(
            svg,
            r#"<circle class="wedge" data-label="{label}" data-count="{count}" cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{color}"/>"#,
            label = entry.label,
            count = entry.count,
            r = PIE_RADIUS,
            color = entry.label.color()
        );
    } else {
        // Start at twelve o'clock, run clockwise
        let mut angle = -PI / 2.0;
        for entry in &counts.entries {
            let sweep = entry.count as f64 / counts.total as f64 * 2.0 * PI;
            let end = angle + sweep;
            let (x0, y0) = (cx + PIE_RADIUS * angle.cos(), cy + PIE_RADIUS * angle.sin());
            let (x1, y1) = (cx + PIE_RADIUS * end.cos(), cy + PIE_RADIUS * end.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };

            let _ = write!(
                svg,
                r#"<path class="wedge" data-label="{label}" data-count="{count}" d="M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z" fill="{color}"/>"#,
                label = entry.label,
                count = entry.count,
                r = PIE_RADIUS,
                color = entry.label.color()
            );
            angle = end;
        }
    }

    if style == ChartStyle::Donut {
        let _ = write!(
            svg,
            r#"<circle class="donut-hole" cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="white"/>"#,
            r = PIE_RADIUS * DONUT_HOLE
        );
        let _ = write!(
            svg,
            r#"<text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" font-size="16">{total}</text>"#,
            ty = cy + 5.0,
            total = counts.total
        );
    }

    // Legend
    for (i, entry) in counts.entries.iter().enumerate() {
        let y = 30.0 + i as f64 * 22.0;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{ry:.1}" width="12" height="12" fill="{color}"/><text x="{tx:.1}" y="{ty:.1}" font-size="12">{label}: {count} ({pct:.1}%)</text>"#,
            x = PIE_SIZE + 10.0,
            ry = y - 10.0,
            color = entry.label.color(),
            tx = PIE_SIZE + 28.0,
            ty = y,
            label = entry.label,
            count = entry.count,
            pct = counts.share(entry.label) * 100.0
        );
    }

    svg.push_str("</svg>");
    svg
}

fn push_empty_note(svg: &mut String, width: f64, height: f64) {
    let _ = write!(
        svg,
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="14">No data</text>"#,
        x = width / 2.0,
        y = height / 2.0
    );
}
