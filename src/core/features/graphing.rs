//! Graphing mode: sample `y = f(x)` over a range and fit a y-window

use crate::core::features::calculator::{normalize_expression, Expression};
use crate::shared::error::AppResult;
use crate::shared::errors::GraphError;

pub const MIN_SAMPLES: usize = 50;
pub const DEFAULT_SAMPLES: usize = 600;
pub const DEFAULT_MAX_SAMPLES: usize = 10_000;

/// Fraction of the y-span added above and below auto-fitted windows
const AUTO_PAD_RATIO: f64 = 0.1;

/// Sampled points; only finite `y` values are kept
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSample {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl GraphSample {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Evaluate `expr` at `samples` evenly spaced points from `x_min` to `x_max`.
///
/// Points where `x` or the evaluated `y` is not finite, or where evaluation
/// fails, are dropped.
pub fn sample(expr: &Expression, x_min: f64, x_max: f64, samples: usize) -> GraphSample {
    let dx = (x_max - x_min) / samples.saturating_sub(1).max(1) as f64;
    let mut graph = GraphSample::default();

    for i in 0..samples {
        let x = x_min + i as f64 * dx;
        match expr.eval_at(x) {
            Ok(y) if x.is_finite() && y.is_finite() => {
                graph.xs.push(x);
                graph.ys.push(y);
            }
            _ => {}
        }
    }

    graph
}

/// Check an x-range and clamp the sample count to `[MIN_SAMPLES, max_samples]`
pub fn validate_range(x_min: f64, x_max: f64, samples: usize, max_samples: usize) -> Result<usize, GraphError> {
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err(GraphError::InvalidXRange);
    }
    if x_max <= x_min {
        return Err(GraphError::EmptyXRange);
    }
    if !(x_max - x_min).is_finite() {
        return Err(GraphError::InvalidXRange);
    }
    Ok(samples.clamp(MIN_SAMPLES, max_samples.max(MIN_SAMPLES)))
}

/// Visible y-window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YRange {
    pub min: f64,
    pub max: f64,
}

impl YRange {
    /// Fit the extrema of `ys`, padded by a tenth of the span (1.0 for a flat line)
    pub fn auto(ys: &[f64]) -> Result<Self, GraphError> {
        let mut finite = ys.iter().copied().filter(|y| y.is_finite());
        let first = finite.next().ok_or(GraphError::NoValidPoints)?;
        let (min, max) = finite.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));

        let span = max - min;
        let pad = if span == 0.0 { 1.0 } else { span * AUTO_PAD_RATIO };
        Ok(Self { min: min - pad, max: max + pad })
    }

    pub fn manual(min: f64, max: f64) -> Result<Self, GraphError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(GraphError::EmptyYRange);
        }
        Ok(Self { min, max })
    }
}

/// A validated plot: the samples plus the window to draw them in
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub sample: GraphSample,
    pub y_range: Option<YRange>,
}

/// Parse, validate and sample in one step.
///
/// With `y_window` the range is taken as given, otherwise it is fitted to the
/// samples and left empty when no point could be evaluated.
pub fn plot(
    text: &str,
    x_min: f64,
    x_max: f64,
    samples: usize,
    max_samples: usize,
    y_window: Option<(f64, f64)>,
) -> AppResult<Plot> {
    let expr = Expression::parse(&normalize_expression(text))?;
    let samples = validate_range(x_min, x_max, samples, max_samples)?;
    let points = sample(&expr, x_min, x_max, samples);

    let y_range = match y_window {
        Some((min, max)) => Some(YRange::manual(min, max)?),
        None => YRange::auto(&points.ys).ok(),
    };

    tracing::debug!(expression = text, samples, kept = points.len(), "sampled graph");
    Ok(Plot { sample: points, y_range })
}
