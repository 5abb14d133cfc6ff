//! Aggregation of inertia matrices and chart/array output.

use crate::error::ReportError;
use crate::experiment::{Experiment, InertiaMatrix};
use ndarray::{Array1, ArrayView2, Axis};
use ndarray_npy::WriteNpyExt;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Chart title of the error-bar plot
pub const ERRORBAR_TITLE: &str = "Mean and Std deviation inertia for various k-means init";

/// Mean and population standard deviation of inertia per restart count.
#[derive(Debug, Clone, PartialEq)]
pub struct InertiaSummary {
    pub n_init: Vec<usize>,
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl InertiaSummary {
    /// `std / mean` per restart count; 0 where the mean is 0.
    pub fn relative_std(&self) -> Array1<f64> {
        ndarray::Zip::from(&self.std)
            .and(&self.mean)
            .map_collect(|&s, &m| if m == 0.0 { 0.0 } else { s / m })
    }

    pub fn len(&self) -> usize {
        self.n_init.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_init.is_empty()
    }
}

/// Row-wise mean and population std of a fully populated inertia matrix.
pub fn aggregate(inertia: &InertiaMatrix) -> Result<InertiaSummary, ReportError> {
    let (rows, cols) = inertia.shape();
    if rows == 0 || cols == 0 {
        return Err(ReportError::EmptyMatrix);
    }
    if let Some((row, col)) = inertia.first_unset() {
        return Err(ReportError::Unpopulated { row, col });
    }

    let values = inertia.view();
    let mean = values.mean_axis(Axis(1)).ok_or(ReportError::EmptyMatrix)?;
    let std = values.std_axis(Axis(1), 0.0);

    Ok(InertiaSummary {
        n_init: inertia.n_init_range().to_vec(),
        mean,
        std,
    })
}

/// Legend entry for a strategy
pub fn series_label(init: impl std::fmt::Display) -> String {
    format!("k-means with {} init", init)
}

/// Summaries of several experiments, labelled for the chart legend.
pub fn summarize(experiments: &[Experiment]) -> Result<Vec<(String, InertiaSummary)>, ReportError> {
    experiments
        .iter()
        .map(|e| Ok((series_label(e.init), aggregate(&e.inertia)?)))
        .collect()
}

fn plot_err<E: std::error::Error>(err: E) -> ReportError {
    ReportError::Plot(err.to_string())
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"))
}

/// Draw one error-bar series per summary against the restart-count axis.
///
/// `.svg` paths are rendered as SVG, anything else as a bitmap.
pub fn plot_inertia_errorbars(
    path: &Path,
    series: &[(String, InertiaSummary)],
) -> Result<(), ReportError> {
    if series.is_empty() || series.iter().any(|(_, s)| s.is_empty()) {
        return Err(ReportError::EmptyMatrix);
    }
    if let Some((label, _)) = series
        .iter()
        .find(|(_, s)| s.mean.len() != s.n_init.len() || s.std.len() != s.n_init.len())
    {
        return Err(ReportError::SeriesMismatch(format!(
            "'{}' has mismatched n_init/mean/std lengths",
            label
        )));
    }

    if is_svg(path) {
        let root = SVGBackend::new(path, (1024, 768)).into_drawing_area();
        draw_errorbars(&root, series)?;
    } else {
        let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
        draw_errorbars(&root, series)?;
    }

    info!(path = %path.display(), series = series.len(), "wrote inertia chart");
    Ok(())
}

fn draw_errorbars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[(String, InertiaSummary)],
) -> Result<(), ReportError> {
    let x_max = series
        .iter()
        .flat_map(|(_, s)| s.n_init.iter().copied())
        .max()
        .unwrap_or(1) as f64;

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, s) in series {
        for (&m, &sd) in s.mean.iter().zip(s.std.iter()) {
            y_min = y_min.min(m - sd);
            y_max = y_max.max(m + sd);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() || (y_max - y_min).abs() < 1e-9 {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = 0.1 * (y_max - y_min);

    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(root)
        .caption(ERRORBAR_TITLE, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0f64..(x_max + 1.0), (y_min - pad)..(y_max + pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("n_init")
        .y_desc("inertia")
        .draw()
        .map_err(plot_err)?;

    for (i, (label, s)) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let points: Vec<(f64, f64)> = s
            .n_init
            .iter()
            .zip(s.mean.iter())
            .map(|(&n, &m)| (n as f64, m))
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(plot_err)?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart
            .draw_series(s.n_init.iter().zip(s.mean.iter()).zip(s.std.iter()).map(
                |((&n, &m), &sd)| {
                    ErrorBar::new_vertical(n as f64, m - sd, m, m + sd, color.filled(), 10)
                },
            ))
            .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Scatter of one clustering: points coloured by assignment, centroids ringed.
pub fn plot_cluster_assignment(
    path: &Path,
    points: &ArrayView2<f32>,
    labels: &[usize],
    centroids: &ArrayView2<f32>,
) -> Result<(), ReportError> {
    if labels.is_empty() {
        return Err(ReportError::EmptyMatrix);
    }
    if points.nrows() != labels.len() {
        return Err(ReportError::SeriesMismatch(format!(
            "{} points but {} labels",
            points.nrows(),
            labels.len()
        )));
    }
    if points.ncols() != 2 || centroids.ncols() != 2 {
        return Err(ReportError::SeriesMismatch(
            "cluster scatter needs 2D points and centroids".to_string(),
        ));
    }
    if let Some(&bad) = labels.iter().find(|&&l| l >= centroids.nrows()) {
        return Err(ReportError::SeriesMismatch(format!(
            "label {} has no centroid ({} centroids)",
            bad,
            centroids.nrows()
        )));
    }

    if is_svg(path) {
        let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
        draw_assignment(&root, points, labels, centroids)?;
    } else {
        let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
        draw_assignment(&root, points, labels, centroids)?;
    }

    info!(path = %path.display(), n_points = labels.len(), "wrote cluster scatter");
    Ok(())
}

fn draw_assignment<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &ArrayView2<f32>,
    labels: &[usize],
    centroids: &ArrayView2<f32>,
) -> Result<(), ReportError> {
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (f32::MAX, f32::MIN, f32::MAX, f32::MIN);
    for row in points.outer_iter().chain(centroids.outer_iter()) {
        x_min = x_min.min(row[0]);
        x_max = x_max.max(row[0]);
        y_min = y_min.min(row[1]);
        y_max = y_max.max(row[1]);
    }
    let pad = 0.05 * (x_max - x_min).max(y_max - y_min).max(1.0);

    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(root)
        .caption(
            "Example cluster allocation with a single random init",
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d((x_min - pad)..(x_max + pad), (y_min - pad)..(y_max + pad))
        .map_err(plot_err)?;

    chart.configure_mesh().draw().map_err(plot_err)?;

    let n_clusters = centroids.nrows();
    chart
        .draw_series(points.outer_iter().zip(labels.iter()).map(|(p, &label)| {
            let color = Palette99::pick(label % n_clusters.max(1));
            Circle::new((p[0], p[1]), 2, color.filled())
        }))
        .map_err(plot_err)?;

    chart
        .draw_series(centroids.outer_iter().enumerate().map(|(k, c)| {
            let color = Palette99::pick(k);
            EmptyElement::at((c[0], c[1]))
                + Circle::new((0, 0), 6, color.filled())
                + Circle::new((0, 0), 6, BLACK.stroke_width(1))
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Write each experiment's inertia matrix to `dir/inertia_<init>.npy`.
pub fn write_inertia_npy(dir: &Path, experiments: &[Experiment]) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(experiments.len());
    for experiment in experiments {
        let path = dir.join(format!("inertia_{}.npy", experiment.init.file_stem()));
        let writer = BufWriter::new(File::create(&path)?);
        experiment.inertia.view().write_npy(writer)?;
        info!(path = %path.display(), init = %experiment.init, "saved inertia matrix");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::InitStrategy;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn matrix(values: ndarray::Array2<f64>) -> InertiaMatrix {
        let n_init = (1..=values.nrows()).collect();
        InertiaMatrix::from_values(n_init, values).unwrap()
    }

    #[test]
    fn test_aggregate_constant_rows() {
        let summary = aggregate(&matrix(array![[3.0, 3.0, 3.0], [7.5, 7.5, 7.5]])).unwrap();

        assert_eq!(summary.len(), 2);
        assert_relative_eq!(summary.mean[0], 3.0);
        assert_relative_eq!(summary.mean[1], 7.5);
        assert_eq!(summary.std[0], 0.0);
        assert_eq!(summary.std[1], 0.0);
    }

    #[test]
    fn test_aggregate_population_std() {
        let summary = aggregate(&matrix(array![[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]])).unwrap();

        assert_relative_eq!(summary.mean[0], 5.0);
        assert_relative_eq!(summary.std[0], 2.0);
        assert_relative_eq!(summary.relative_std()[0], 0.4);
    }

    #[test]
    fn test_aggregate_rejects_unpopulated() {
        let mut inertia = InertiaMatrix::new(vec![1, 5], 2);
        inertia.set(0, 0, 1.0);
        inertia.set(0, 1, 1.0);
        inertia.set(1, 0, 1.0);

        let err = aggregate(&inertia).unwrap_err();
        assert!(matches!(err, ReportError::Unpopulated { row: 1, col: 1 }));
    }

    #[test]
    fn test_aggregate_rejects_empty() {
        let inertia = InertiaMatrix::new(vec![1, 5], 0);
        assert!(matches!(aggregate(&inertia), Err(ReportError::EmptyMatrix)));
    }

    #[test]
    fn test_relative_std_zero_mean() {
        let summary = aggregate(&matrix(array![[0.0, 0.0]])).unwrap();
        assert_eq!(summary.relative_std()[0], 0.0);
    }

    #[test]
    fn test_summarize_labels() {
        let experiments = vec![Experiment {
            init: InitStrategy::KMeansPlusPlus,
            inertia: matrix(array![[1.0, 2.0]]),
        }];
        let summaries = summarize(&experiments).unwrap();
        assert_eq!(summaries[0].0, "k-means with k-means++ init");
    }

    #[test]
    fn test_plot_rejects_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        let result = plot_inertia_errorbars(&dir.path().join("chart.svg"), &[]);
        assert!(matches!(result, Err(ReportError::EmptyMatrix)));
    }

    #[test]
    fn test_plot_errorbars_svg_has_legend_and_axes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let series = vec![
            (
                series_label(InitStrategy::KMeansPlusPlus),
                aggregate(&matrix(array![[4.0, 4.2], [4.0, 4.1]])).unwrap(),
            ),
            (
                series_label(InitStrategy::Random),
                aggregate(&matrix(array![[9.0, 30.0], [5.0, 12.0]])).unwrap(),
            ),
        ];

        plot_inertia_errorbars(&path, &series).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains(ERRORBAR_TITLE));
        assert!(svg.contains("n_init"));
        assert!(svg.contains("inertia"));
        assert!(svg.contains("k-means with k-means++ init"));
        assert!(svg.contains("k-means with random init"));
    }

    #[test]
    fn test_plot_errorbars_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let series = vec![(
            series_label(InitStrategy::Random),
            aggregate(&matrix(array![[2.0, 3.0]])).unwrap(),
        )];

        plot_inertia_errorbars(&path, &series).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_plot_cluster_assignment_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter.svg");
        let points = array![[0.0f32, 0.0], [0.1, 0.0], [1.0, 1.0], [1.1, 1.0]];
        let centroids = array![[0.05f32, 0.0], [1.05, 1.0]];

        plot_cluster_assignment(&path, &points.view(), &[0, 0, 1, 1], &centroids.view()).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Example cluster allocation with a single random init"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_scatter_rejects_label_without_centroid() {
        let dir = tempfile::tempdir().unwrap();
        let points = array![[0.0f32, 0.0], [1.0, 1.0]];
        let centroids = array![[0.5f32, 0.5]];

        let result = plot_cluster_assignment(
            &dir.path().join("scatter.svg"),
            &points.view(),
            &[0, 1],
            &centroids.view(),
        );
        assert!(matches!(result, Err(ReportError::SeriesMismatch(_))));
    }

    #[test]
    fn test_write_inertia_npy() {
        use ndarray::Array2;
        use ndarray_npy::read_npy;

        let dir = tempfile::tempdir().unwrap();
        let experiments = vec![
            Experiment {
                init: InitStrategy::KMeansPlusPlus,
                inertia: matrix(array![[1.0, 2.0], [3.0, 4.0]]),
            },
            Experiment {
                init: InitStrategy::Random,
                inertia: matrix(array![[5.0, 6.0], [7.0, 8.0]]),
            },
        ];

        let written = write_inertia_npy(dir.path(), &experiments).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("inertia_kmeans_pp.npy"));

        let restored: Array2<f64> = read_npy(&written[1]).unwrap();
        assert_eq!(restored, array![[5.0, 6.0], [7.0, 8.0]]);
    }
}
