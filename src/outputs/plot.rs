//! SVG line chart of a term trend, one line per outlet.
//!
//! Periods from all series share one categorical x axis, so an outlet that
//! has no articles in a period simply has no point there. The y axis is the
//! normalized weight in `[0, 1]`.

use crate::analysis::trend::TrendSeries;
use crate::utils::slugify_title;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 160.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;
const MAX_X_LABELS: usize = 12;

const COLORS: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the chart for `term` as an SVG document.
pub fn render_trend_svg(term: &str, series: &[TrendSeries]) -> Result<String, std::fmt::Error> {
    let mut periods: BTreeMap<NaiveDate, &str> = BTreeMap::new();
    for s in series {
        for p in &s.points {
            periods.entry(p.period).or_insert(&p.label);
        }
    }
    let slots: BTreeMap<NaiveDate, usize> = periods.keys().enumerate().map(|(i, d)| (*d, i)).collect();

    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let x = |slot: usize| {
        if periods.len() <= 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * slot as f64 / (periods.len() - 1) as f64
        }
    };
    let y = |value: f64| MARGIN_TOP + plot_h * (1.0 - value.clamp(0.0, 1.0));

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="25" text-anchor="middle" font-size="16">Normalized TF-IDF of "{}"</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        escape(term)
    )?;

    // y grid and ticks
    for tick in 0..=4 {
        let value = f64::from(tick) / 4.0;
        let ty = y(value);
        writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{ty}" x2="{}" y2="{ty}" stroke="#dddddd"/>"##,
            MARGIN_LEFT + plot_w
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end">{value:.2}</text>"#,
            MARGIN_LEFT - 8.0,
            ty + 4.0
        )?;
    }
    writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{}" x2="{}" y2="{}" stroke="black"/>"#,
        MARGIN_TOP + plot_h,
        MARGIN_LEFT + plot_w,
        MARGIN_TOP + plot_h
    )?;
    writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{}" stroke="black"/>"#,
        MARGIN_TOP + plot_h
    )?;

    let step = periods.len().div_ceil(MAX_X_LABELS).max(1);
    for (slot, label) in periods.values().enumerate() {
        if slot % step != 0 {
            continue;
        }
        let lx = x(slot);
        let ly = MARGIN_TOP + plot_h + 16.0;
        writeln!(
            svg,
            r#"<text x="{lx}" y="{ly}" text-anchor="end" transform="rotate(-35 {lx} {ly})">{}</text>"#,
            escape(label)
        )?;
    }

    for (i, s) in series.iter().enumerate() {
        let color = COLORS[i % COLORS.len()];
        let points: Vec<String> = s
            .points
            .iter()
            .map(|p| format!("{:.1},{:.1}", x(slots[&p.period]), y(p.normalized)))
            .collect();
        if points.len() > 1 {
            writeln!(
                svg,
                r#"<polyline fill="none" stroke="{color}" stroke-width="2" points="{}"/>"#,
                points.join(" ")
            )?;
        }
        for p in &s.points {
            writeln!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{color}"/>"#,
                x(slots[&p.period]),
                y(p.normalized)
            )?;
        }

        let legend_y = MARGIN_TOP + 20.0 * i as f64;
        let legend_x = WIDTH - MARGIN_RIGHT + 20.0;
        writeln!(
            svg,
            r#"<line x1="{legend_x}" y1="{legend_y}" x2="{}" y2="{legend_y}" stroke="{color}" stroke-width="3"/>"#,
            legend_x + 20.0
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}">{}</text>"#,
            legend_x + 26.0,
            legend_y + 4.0,
            s.outlet.display_name()
        )?;
    }

    writeln!(svg, "</svg>")?;
    Ok(svg)
}

/// Render and write `trend_{term}.svg`.
#[instrument(level = "info", skip(series), fields(outlets = series.len()))]
pub async fn write_trend_plot(output_dir: &Path, term: &str, series: &[TrendSeries]) -> Result<PathBuf, Box<dyn Error>> {
    let svg = render_trend_svg(term, series)?;
    let path = output_dir.join(format!("trend_{}.svg", slugify_title(term)));
    fs::write(&path, svg).await?;
    info!(path = %path.display(), "Wrote trend plot");
    Ok(path)
}
