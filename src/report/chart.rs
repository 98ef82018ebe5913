//! Bar chart of wallets per score range.

use super::buckets::ScoreBucket;
use crate::utils::error::{Error, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub const CHART_SIZE: (u32, u32) = (1000, 600);
const CAPTION: &str = "Wallet Credit Score Distribution";
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

fn chart_err<E: std::fmt::Display>(e: E) -> Error {
    Error::ChartError(e.to_string())
}

/// Draw one bar per bucket and save the image to `path` (format from extension)
pub fn render_distribution(buckets: &[ScoreBucket], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    draw_distribution(&root, buckets)?;
    root.present().map_err(chart_err)?;
    log::info!("Score distribution chart saved to {}", path.display());
    Ok(())
}

/// Paint the caption, axes and bars onto any drawing area
fn draw_distribution<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, buckets: &[ScoreBucket]) -> Result<()> {
    root.fill(&WHITE).map_err(chart_err)?;

    let n = buckets.len() as u32;
    let peak = buckets.iter().map(|b| b.count as u32).max().unwrap_or(0);
    let y_top = peak + (peak / 10).max(1);

    let mut chart = ChartBuilder::on(root)
        .caption(CAPTION, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0u32..y_top)
        .map_err(chart_err)?;

    let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Score Range")
        .y_desc("Number of Wallets")
        .x_label_formatter(&|v| match v {
            | SegmentValue::CenterOf(i) => labels.get(*i as usize).map(|l| l.to_string()).unwrap_or_default(),
            | _ => String::new(),
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(buckets.iter().enumerate().map(|(i, bucket)| {
            let i = i as u32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), bucket.count as u32)],
                SKY_BLUE.filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))
        .map_err(chart_err)?;

    Ok(())
}
