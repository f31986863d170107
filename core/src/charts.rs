//! SVG chart rendering. One file per chart under the output directory.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const FONT: &str = "sans-serif";

/// Categorical palette for pie slices.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// A named group of values drawn in one colour.
pub struct Series<'a, T> {
    pub name:   &'a str,
    pub color:  RGBColor,
    pub values: &'a [T],
}

/// A reference line drawn across the plot.
pub struct Marker<'a> {
    pub value: f64,
    pub label: &'a str,
    pub color: RGBColor,
}

pub struct ChartWriter {
    out_dir: PathBuf,
    width:   u32,
    height:  u32,
}

impl ChartWriter {
    pub fn new(out_dir: impl Into<PathBuf>, width: u32, height: u32) -> Result<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir)
            .map_err(|e| anyhow::anyhow!("Cannot create {}: {e}", out_dir.display()))?;
        Ok(Self { out_dir, width, height })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Line over consecutive days. `points` are (day offset from `start`, value).
    pub fn daily_line(
        &self,
        file: &str,
        title: &str,
        y_desc: &str,
        start: NaiveDate,
        points: &[(i32, f64)],
    ) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        {
            let root = SVGBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            let x_max = points.iter().map(|p| p.0).max().unwrap_or(0).max(1);
            let y_max = upper_bound(points.iter().map(|p| p.1));

            let mut chart = ChartBuilder::on(&root)
                .caption(title, (FONT, 24).into_font())
                .margin(20)
                .x_label_area_size(60)
                .y_label_area_size(100)
                .build_cartesian_2d(0..x_max, 0.0..y_max)?;

            let day_label = |offset: &i32| {
                (start + Duration::days(i64::from(*offset)))
                    .format("%Y-%m-%d")
                    .to_string()
            };
            chart
                .configure_mesh()
                .x_desc("Fecha")
                .y_desc(y_desc)
                .x_labels(10)
                .x_label_formatter(&day_label)
                .draw()?;

            chart.draw_series(LineSeries::new(points.iter().copied(), &PALETTE[0]))?;
            root.present()?;
        }
        Ok(path)
    }

    /// Horizontal bars, first entry on the bottom row.
    pub fn horizontal_bars(
        &self,
        file: &str,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        bars: &[(String, f64)],
    ) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        {
            let root = SVGBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            let rows = (bars.len() as i32).max(1);
            let x_max = upper_bound(bars.iter().map(|b| b.1));

            let mut chart = ChartBuilder::on(&root)
                .caption(title, (FONT, 24).into_font())
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(140)
                .build_cartesian_2d(0.0..x_max, (0..rows).into_segmented())?;

            let row_label = |v: &SegmentValue<i32>| segment_label(v, bars);
            chart
                .configure_mesh()
                .disable_y_mesh()
                .x_desc(x_desc)
                .y_desc(y_desc)
                .y_labels(bars.len().max(1))
                .y_label_formatter(&row_label)
                .draw()?;

            chart.draw_series(
                Histogram::horizontal(&chart)
                    .style(PALETTE[0].mix(0.8).filled())
                    .margin(4)
                    .data(bars.iter().enumerate().map(|(i, b)| (i as i32, b.1))),
            )?;
            root.present()?;
        }
        Ok(path)
    }

    /// Vertical bars, one per category.
    pub fn vertical_bars(
        &self,
        file: &str,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        bars: &[(String, f64)],
    ) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        {
            let root = SVGBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            let columns = (bars.len() as i32).max(1);
            let y_max = upper_bound(bars.iter().map(|b| b.1));

            let mut chart = ChartBuilder::on(&root)
                .caption(title, (FONT, 24).into_font())
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d((0..columns).into_segmented(), 0.0..y_max)?;

            let column_label = |v: &SegmentValue<i32>| segment_label(v, bars);
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc(x_desc)
                .y_desc(y_desc)
                .x_labels(bars.len().max(1))
                .x_label_formatter(&column_label)
                .draw()?;

            chart.draw_series(
                Histogram::vertical(&chart)
                    .style(PALETTE[0].mix(0.8).filled())
                    .margin(20)
                    .data(bars.iter().enumerate().map(|(i, b)| (i as i32, b.1))),
            )?;
            root.present()?;
        }
        Ok(path)
    }

    /// Pie with percentage labels.
    pub fn pie(&self, file: &str, title: &str, slices: &[(String, f64)]) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        {
            let side = self.width.min(self.height).max(200);
            let root = SVGBackend::new(&path, (side, side)).into_drawing_area();
            root.fill(&WHITE)?;
            let area = root.titled(title, (FONT, 24).into_font())?;

            let (w, h) = area.dim_in_pixel();
            let center = (w as i32 / 2, h as i32 / 2);
            let radius = f64::from(w.min(h)) * 0.35;
            let sizes: Vec<f64> = slices.iter().map(|s| s.1).collect();
            let labels: Vec<&str> = slices.iter().map(|s| s.0.as_str()).collect();
            let colors: Vec<RGBColor> = (0..slices.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.label_style((FONT, 14).into_font().color(&BLACK));
            pie.percentages((FONT, 12).into_font().color(&WHITE));
            area.draw(&pie)?;
            root.present()?;
        }
        Ok(path)
    }

    /// Overlaid histograms over a shared binning, plus optional vertical marker.
    pub fn grouped_histogram(
        &self,
        file: &str,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        groups: &[Series<'_, f64>],
        bins: usize,
        marker: Option<Marker<'_>>,
    ) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        {
            let root = SVGBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            let all = groups.iter().flat_map(|g| g.values.iter().copied());
            let marker_value = marker.as_ref().map(|m| m.value);
            let (lo, hi) = value_range(all.chain(marker_value));
            let bins = bins.max(1);
            let width = (hi - lo) / bins as f64;

            let counts: Vec<Vec<usize>> = groups
                .iter()
                .map(|g| bin_counts(g.values, lo, width, bins))
                .collect();
            let y_max = upper_bound(counts.iter().flatten().map(|&c| c as f64));

            let mut chart = ChartBuilder::on(&root)
                .caption(title, (FONT, 24).into_font())
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(lo..hi, 0.0..y_max)?;
            chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

            for (group, counts) in groups.iter().zip(&counts) {
                let color = group.color;
                chart
                    .draw_series(counts.iter().enumerate().filter(|(_, c)| **c > 0).map(
                        |(i, &c)| {
                            let x0 = lo + width * i as f64;
                            Rectangle::new([(x0, 0.0), (x0 + width, c as f64)], color.mix(0.5).filled())
                        },
                    ))?
                    .label(group.name)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
            }

            if let Some(m) = marker {
                let color = m.color;
                chart
                    .draw_series(LineSeries::new(
                        vec![(m.value, 0.0), (m.value, y_max)],
                        color.stroke_width(2),
                    ))?
                    .label(m.label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
            root.present()?;
        }
        Ok(path)
    }

    /// Scatter of (x, y) groups with a vertical and a horizontal marker.
    pub fn grouped_scatter(
        &self,
        file: &str,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        groups: &[Series<'_, (f64, f64)>],
        x_marker: Marker<'_>,
        y_marker: Marker<'_>,
    ) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        {
            let root = SVGBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            let points = || groups.iter().flat_map(|g| g.values.iter().copied());
            let x_max = upper_bound(points().map(|p| p.0).chain([x_marker.value]));
            let y_max = upper_bound(points().map(|p| p.1).chain([y_marker.value]));

            let mut chart = ChartBuilder::on(&root)
                .caption(title, (FONT, 24).into_font())
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;
            chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

            for group in groups {
                let color = group.color;
                chart
                    .draw_series(
                        group.values.iter().map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.7).filled())),
                    )?
                    .label(group.name)
                    .legend(move |(x, y)| Circle::new((x + 6, y), 4, color.filled()));
            }

            let x_color = x_marker.color;
            chart
                .draw_series(LineSeries::new(
                    vec![(x_marker.value, 0.0), (x_marker.value, y_max)],
                    x_color.stroke_width(2),
                ))?
                .label(x_marker.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], x_color));

            let y_color = y_marker.color;
            chart
                .draw_series(LineSeries::new(
                    vec![(0.0, y_marker.value), (x_max, y_marker.value)],
                    y_color.stroke_width(2),
                ))?
                .label(y_marker.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], y_color));

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
            root.present()?;
        }
        Ok(path)
    }
}

/// 5% headroom above the largest value; never an empty range.
fn upper_bound(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 { max * 1.05 } else { 1.0 }
}

fn segment_label(v: &SegmentValue<i32>, bars: &[(String, f64)]) -> String {
    match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| bars.get(i))
            .map(|b| b.0.clone())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// Smallest and largest value. A single distinct value gets a unit-wide
/// range centred on it; no values give [0, 1].
pub fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Counts per bin over [lo, lo + width·bins]; the top edge falls in the last bin.
pub fn bin_counts(values: &[f64], lo: f64, width: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    if bins == 0 || width <= 0.0 {
        return counts;
    }
    for &v in values {
        let index = ((v - lo) / width).floor();
        if index < 0.0 {
            continue;
        }
        let index = (index as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_cover_both_edges() {
        let counts = bin_counts(&[0.0, 0.5, 1.0, 9.99, 10.0], 0.0, 1.0, 10);
        assert_eq!(counts.iter().sum::<usize>(), 5);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[9], 2, "top edge lands in the last bin");
    }

    #[test]
    fn single_value_range_is_centred_on_it() {
        let (lo, hi) = value_range([10.0, 10.0, 10.0].into_iter());
        assert_eq!((lo, hi), (9.5, 10.5));

        let counts = bin_counts(&[10.0, 10.0, 10.0], lo, (hi - lo) / 4.0, 4);
        assert_eq!(counts[2], 3, "values land mid-range, not in an edge bin");
        assert_eq!(value_range(std::iter::empty()), (0.0, 1.0));
        assert_eq!(value_range([2.0, 7.0].into_iter()), (2.0, 7.0));
    }

    #[test]
    fn upper_bound_never_collapses() {
        assert_eq!(upper_bound(std::iter::empty()), 1.0);
        assert_eq!(upper_bound([0.0].into_iter()), 1.0);
        assert!((upper_bound([100.0].into_iter()) - 105.0).abs() < 1e-9);
    }
}
