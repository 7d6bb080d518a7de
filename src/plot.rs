//! Sampling of a function of `x` for plotting.
//!
//! The expression is normalized and compiled once, then evaluated at evenly
//! spaced values of `x`. A compilation failure aborts the whole pass, while
//! a sample that evaluates to `NaN` or an infinity is only recorded as a gap
//! in the curve.

use crate::config::PlotConfig;
use crate::context::EvaluationContext;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::normalize::normalize;
use log::{debug, trace};

/// One evaluation of the plotted function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Value of the free variable
    pub x: f64,
    /// `None` when the function is not finite at `x`
    pub y: Option<f64>,
}

/// Result of a sampling pass
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    samples: Vec<Sample>,
}

/// Sample the raw calculator expression `input` at `sample_count` values of
/// `x` evenly spread over `[xmin, xmax]`, bounds included.
///
/// # Examples
///
/// ```
/// use scicalc::{plot, AngleMode, EvaluationContext};
///
/// let context = EvaluationContext::new(AngleMode::Radians);
/// let plot = plot::sample("x^2", &context, -2.0, 2.0, 5).unwrap();
/// assert_eq!(plot.values(), vec![Some(4.0), Some(1.0), Some(0.0), Some(1.0), Some(4.0)]);
/// ```
pub fn sample(
    input: &str,
    context: &EvaluationContext,
    xmin: f64,
    xmax: f64,
    sample_count: usize,
) -> Result<Plot> {
    if !xmin.is_finite() || !xmax.is_finite() {
        return Err(Error::InvalidRange { xmin, xmax });
    }
    let canonical = normalize(input);
    let context = context.clone().with_x(xmin);
    let expr = Expr::compile(&canonical, &context)?;

    let mut samples = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let x = sample_x(xmin, xmax, i, sample_count);
        let y = expr.eval_at(x);
        if y.is_finite() {
            samples.push(Sample { x, y: Some(y) });
        } else {
            trace!("skipping non-finite sample {} at x = {}", y, x);
            samples.push(Sample { x, y: None });
        }
    }
    debug!(
        "sampled '{}' {} times over [{}, {}]",
        canonical, sample_count, xmin, xmax
    );
    Ok(Plot { samples })
}

/// Position of the sample `i` out of `count`. `xmax - xmin` can overflow,
/// so both bounds are weighted instead.
fn sample_x(xmin: f64, xmax: f64, i: usize, count: usize) -> f64 {
    if count < 2 {
        return xmin;
    }
    let t = i as f64 / (count - 1) as f64;
    xmin * (1.0 - t) + xmax * t
}

impl Plot {
    /// Every sample, from `xmin` to `xmax`
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The sampled values, in order
    pub fn values(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|sample| sample.y).collect()
    }

    /// Split the curve into maximal runs of finite samples. Each run is drawn
    /// as one line, the gaps between runs are not drawn.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for sample in &self.samples {
            match sample.y {
                Some(y) => current.push((sample.x, y)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Vertical range fitting every finite sample, with the default padding
    pub fn y_range(&self) -> (f64, f64) {
        self.y_range_with(&PlotConfig::default())
    }

    /// Vertical range fitting every finite sample, padded as set in `config`
    pub fn y_range_with(&self, config: &PlotConfig) -> (f64, f64) {
        auto_scale(self.samples.iter().filter_map(|sample| sample.y), config)
    }
}

/// Compute the vertical range of a plot from its finite `values`.
///
/// The observed span is padded by `config.padding_ratio` of its width on both
/// sides, or by `config.degenerate_padding` if all values are equal. Without
/// any value, `config.fallback_range` is used.
pub fn auto_scale<I>(values: I, config: &PlotConfig) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let bounds = values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |bounds, value| match bounds {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        });
    match bounds {
        None => config.fallback_range,
        Some((min, max)) if min == max => {
            (min - config.degenerate_padding, max + config.degenerate_padding)
        }
        Some((min, max)) => {
            let padding = (max - min) * config.padding_ratio;
            (min - padding, max + padding)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::AngleMode;

    fn radians() -> EvaluationContext {
        EvaluationContext::new(AngleMode::Radians)
    }

    #[test]
    fn parabola() {
        let plot = sample("x^2", &radians(), -2.0, 2.0, 5).unwrap();
        let xs: Vec<f64> = plot.samples().iter().map(|sample| sample.x).collect();
        assert_eq!(xs, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(
            plot.values(),
            vec![Some(4.0), Some(1.0), Some(0.0), Some(1.0), Some(4.0)]
        );
        assert_eq!(plot.segments().len(), 1);
        let (ymin, ymax) = plot.y_range();
        assert!((ymin + 0.4).abs() < 1e-12);
        assert!((ymax - 4.4).abs() < 1e-12);
    }

    #[test]
    fn sample_counts() {
        assert!(sample("x", &radians(), 0.0, 1.0, 0).unwrap().samples().is_empty());
        let plot = sample("x", &radians(), 3.0, 5.0, 1).unwrap();
        assert_eq!(plot.values(), vec![Some(3.0)]);
    }

    #[test]
    fn reversed_range() {
        let plot = sample("x", &radians(), 1.0, -1.0, 3).unwrap();
        assert_eq!(plot.values(), vec![Some(1.0), Some(0.0), Some(-1.0)]);
    }

    #[test]
    fn widest_range() {
        let plot = sample("x", &radians(), -f64::MAX, f64::MAX, 3).unwrap();
        let xs: Vec<f64> = plot.samples().iter().map(|sample| sample.x).collect();
        assert_eq!(xs, vec![-f64::MAX, 0.0, f64::MAX]);
        assert_eq!(plot.values(), vec![Some(-f64::MAX), Some(0.0), Some(f64::MAX)]);
    }

    #[test]
    fn non_finite_samples_break_the_line() {
        let plot = sample("1/x", &radians(), -1.0, 1.0, 3).unwrap();
        assert_eq!(plot.values(), vec![Some(-1.0), None, Some(1.0)]);
        assert_eq!(
            plot.segments(),
            vec![vec![(-1.0, -1.0)], vec![(1.0, 1.0)]]
        );

        let plot = sample("sqrt(x)", &radians(), -2.0, 2.0, 5).unwrap();
        assert_eq!(plot.values(), vec![None, None, Some(0.0), Some(1.0), Some(2.0_f64.sqrt())]);
        assert_eq!(plot.segments().len(), 1);
    }

    #[test]
    fn compilation_errors_abort() {
        assert_eq!(
            sample("x +", &radians(), 0.0, 1.0, 10),
            Err(Error::parse("unexpected end of expression"))
        );
        assert!(sample("y * x", &radians(), 0.0, 1.0, 10)
            .unwrap_err()
            .is_parse_error());
        assert_eq!(
            sample("", &radians(), 0.0, 1.0, 10),
            Err(Error::parse("empty expression"))
        );
    }

    #[test]
    fn invalid_range() {
        assert_eq!(
            sample("x", &radians(), 0.0, f64::INFINITY, 10),
            Err(Error::InvalidRange {
                xmin: 0.0,
                xmax: f64::INFINITY
            })
        );
    }

    #[test]
    fn raw_syntax_is_normalized() {
        let plot = sample("x! × π", &radians(), 0.0, 3.0, 4);
        // `x!` is not a literal factorial
        assert!(plot.is_err());

        let plot = sample("(x)! × 2", &radians(), 0.0, 3.0, 4).unwrap();
        assert_eq!(plot.values(), vec![Some(2.0), Some(2.0), Some(4.0), Some(12.0)]);
    }

    #[test]
    fn angle_mode_applies() {
        let degrees = EvaluationContext::new(AngleMode::Degrees);
        let plot = sample("sin(x)", &degrees, 0.0, 90.0, 2).unwrap();
        let values = plot.values();
        assert_eq!(values[0], Some(0.0));
        assert!((values[1].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scaling() {
        let config = PlotConfig::default();
        assert_eq!(auto_scale(vec![], &config), (-10.0, 10.0));
        assert_eq!(auto_scale(vec![f64::NAN], &config), (-10.0, 10.0));
        assert_eq!(auto_scale(vec![3.0, 3.0], &config), (2.0, 4.0));
        assert_eq!(auto_scale(vec![0.0, 10.0, 5.0], &config), (-1.0, 11.0));

        let plot = sample("sqrt(-1)", &radians(), 0.0, 1.0, 10).unwrap();
        assert!(plot.segments().is_empty());
        assert_eq!(plot.y_range(), (-10.0, 10.0));
    }
}
