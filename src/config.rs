use crate::bindings::AngleMode;

/// Defaults for a calculator [`Session`](struct.Session.html)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Angle mode of a new session
    pub angle_mode: AngleMode,
    /// Text shown in place of the result when the equals action fails
    pub error_token: String,
    /// Plot settings
    pub plot: PlotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Degrees,
            error_token: "ERR".into(),
            plot: PlotConfig::default(),
        }
    }
}

/// Sampling and vertical scaling of plots
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Number of samples, one per horizontal pixel
    pub sample_count: usize,
    /// Default left bound of the x axis
    pub xmin: f64,
    /// Default right bound of the x axis
    pub xmax: f64,
    /// Fraction of the observed y span added above and below it
    pub padding_ratio: f64,
    /// Padding used when all finite samples have the same value
    pub degenerate_padding: f64,
    /// Vertical range used when no sample is finite
    pub fallback_range: (f64, f64),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            sample_count: 600,
            xmin: -10.0,
            xmax: 10.0,
            padding_ratio: 0.1,
            degenerate_padding: 1.0,
            fallback_range: (-10.0, 10.0),
        }
    }
}

impl Config {
    /// Change the initial angle mode
    #[must_use]
    pub fn with_angle_mode(mut self, angle_mode: AngleMode) -> Self {
        self.angle_mode = angle_mode;
        self
    }

    /// Change the number of plot samples
    #[must_use]
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.plot.sample_count = sample_count;
        self
    }

    /// Change the default plot range
    #[must_use]
    pub fn with_x_range(mut self, xmin: f64, xmax: f64) -> Self {
        self.plot.xmin = xmin;
        self.plot.xmax = xmax;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.angle_mode, AngleMode::Degrees);
        assert_eq!(config.error_token, "ERR");
        assert_eq!(config.plot.padding_ratio, 0.1);
        assert_eq!(config.plot.fallback_range, (-10.0, 10.0));
    }

    #[test]
    fn builders() {
        let config = Config::default()
            .with_angle_mode(AngleMode::Radians)
            .with_sample_count(5)
            .with_x_range(-2.0, 2.0);
        assert_eq!(config.angle_mode, AngleMode::Radians);
        assert_eq!(config.plot.sample_count, 5);
        assert_eq!((config.plot.xmin, config.plot.xmax), (-2.0, 2.0));
    }
}
