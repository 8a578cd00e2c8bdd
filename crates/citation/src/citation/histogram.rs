//! Degree distribution histogram
//!
//! Binning matches `numpy.histogram`: equal-width bins over [min, max], the
//! last bin closed on the right, and a range widened by 0.5 on each side
//! when every value is the same. A value sitting on an inner edge always
//! belongs to the bin on its right.

use paperlens_common::errors::{AppError, Result};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use tracing::info;

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);

/// Embedded so rendering never depends on system fonts
static CHART_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Equal-width histogram of integer values
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeHistogram {
    /// Bin edges, one more than the number of bins
    pub edges: Vec<f64>,
    /// Values per bin
    pub counts: Vec<usize>,
}

impl DegreeHistogram {
    /// Bin `values` into `bins` equal-width bins
    pub fn compute(values: &[usize], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(AppError::Configuration {
                message: "histogram needs at least one bin".to_string(),
            });
        }

        let (mut lo, mut hi) = match (values.iter().min(), values.iter().max()) {
            (Some(&min), Some(&max)) => (min as f64, max as f64),
            _ => (0.0, 1.0),
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let step = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| i as f64 * step + lo).collect();
        edges[bins] = hi;

        let mut counts = vec![0usize; bins];
        for &value in values {
            counts[bin_index(value as f64, &edges)] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Number of binned values
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Draw the histogram as a titled PNG bar chart
    pub fn render_png(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        let render_err = |e: &dyn std::fmt::Display| AppError::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        register_font("sans-serif", FontStyle::Normal, CHART_FONT)
            .map_err(|_| render_err(&"invalid font data"))?;

        let lo = self.edges.first().copied().unwrap_or(0.0);
        let hi = self.edges.last().copied().unwrap_or(1.0);
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1) as f64;

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| render_err(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Degree Distribution", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(lo..hi, 0f64..peak * 1.05)
            .map_err(|e| render_err(&e))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Degree")
            .y_desc("Number of Nodes")
            .label_style(("sans-serif", 14))
            .axis_desc_style(("sans-serif", 16))
            .draw()
            .map_err(|e| render_err(&e))?;

        let bars = self.counts.iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(self.edges[i], 0.0), (self.edges[i + 1], count as f64)],
                BAR_COLOR.filled(),
            )
        });
        chart.draw_series(bars).map_err(|e| render_err(&e))?;

        let outlines = self.counts.iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(self.edges[i], 0.0), (self.edges[i + 1], count as f64)],
                BLACK.stroke_width(1),
            )
        });
        chart.draw_series(outlines).map_err(|e| render_err(&e))?;

        root.present().map_err(|e| render_err(&e))?;

        info!(
            path = %path.display(),
            bins = self.bins(),
            nodes = self.total(),
            "Degree histogram saved"
        );
        Ok(())
    }
}

/// Bin of `value` given ascending `edges`, computed like numpy: scale into
/// the range, then correct against the edges themselves so rounding never
/// disagrees with them.
fn bin_index(value: f64, edges: &[f64]) -> usize {
    let bins = edges.len() - 1;
    let lo = edges[0];
    let hi = edges[bins];
    let norm = bins as f64 / (hi - lo);

    let mut index = (((value - lo) * norm) as usize).min(bins - 1);
    if value < edges[index] {
        index -= 1;
    } else if index != bins - 1 && value >= edges[index + 1] {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_counts_cover_every_value() {
        let degrees = vec![0, 0, 1, 2, 2, 3, 10];
        let hist = DegreeHistogram::compute(&degrees, 50).unwrap();

        assert_eq!(hist.bins(), 50);
        assert_eq!(hist.edges.len(), 51);
        assert_eq!(hist.total(), degrees.len());
        assert_eq!(hist.counts[0], 2);
        // The maximum lands in the closed last bin
        assert_eq!(hist.counts[49], 1);
        assert!((hist.edges[50] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_values_widen_range() {
        let hist = DegreeHistogram::compute(&[4, 4, 4], 2).unwrap();
        assert_eq!(hist.edges, vec![3.5, 4.0, 4.5]);
        // numpy puts a value sitting on an inner edge in the right bin
        assert_eq!(hist.counts, vec![0, 3]);
    }

    #[test]
    fn test_values_on_inner_edges_follow_the_edges() {
        let degrees: Vec<usize> = (0..=34).collect();
        let hist = DegreeHistogram::compute(&degrees, 50).unwrap();

        assert_eq!(hist.total(), degrees.len());
        for &degree in &degrees {
            let value = degree as f64;
            let bin = bin_index(value, &hist.edges);
            assert!(hist.edges[bin] <= value, "{degree} below its bin");
            if bin + 1 < hist.bins() {
                assert!(value < hist.edges[bin + 1], "{degree} above its bin");
            }
        }

        // 17 sits exactly on an inner edge and belongs to the bin it opens
        let edge = hist.edges.iter().position(|&e| e == 17.0);
        if let Some(edge) = edge {
            assert_eq!(bin_index(17.0, &hist.edges), edge);
            assert_eq!(hist.counts[edge], 1);
        }
    }

    #[test]
    fn test_every_range_agrees_with_its_edges() {
        for max in 1..300usize {
            let degrees: Vec<usize> = (0..=max).collect();
            let hist = DegreeHistogram::compute(&degrees, 50).unwrap();
            let mut expected = vec![0usize; 50];
            for &degree in &degrees {
                let value = degree as f64;
                let bin = hist
                    .edges
                    .windows(2)
                    .position(|w| w[0] <= value && value < w[1])
                    .unwrap_or(49);
                expected[bin] += 1;
            }
            assert_eq!(hist.counts, expected, "max degree {max}");
        }
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(DegreeHistogram::compute(&[1, 2], 0).is_err());
    }

    #[test]
    fn test_render_png_writes_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("degree_histogram.png");

        let hist = DegreeHistogram::compute(&[0, 1, 1, 2, 5, 5, 5], 50).unwrap();
        hist.render_png(&path, 400, 300).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
