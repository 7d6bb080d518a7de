use crate::bindings::AngleMode;
use crate::config::Config;
use crate::context::EvaluationContext;
use crate::error::{Error, Result};
use crate::expr::eval;
use crate::plot::{self, Plot};
use log::debug;

/// State of an interactive calculator: the expression being typed, the last
/// answer and the angle mode.
///
/// ```
/// use scicalc::Session;
///
/// let mut session = Session::default();
/// session.push("3!");
/// session.push("×2");
/// assert_eq!(session.equals(), Ok(12.0));
/// assert_eq!(session.display(), "12");
/// assert_eq!(session.history(), "3!×2 =");
///
/// session.push("+");
/// session.insert_last_answer();
/// assert_eq!(session.equals(), Ok(24.0));
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    buffer: String,
    display: String,
    history: String,
    last_answer: f64,
    angle_mode: AngleMode,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    /// Create an empty session, in the angle mode of `config`
    ///
    /// ```
    /// use scicalc::{AngleMode, Config, Session};
    ///
    /// let session = Session::new(Config::default().with_angle_mode(AngleMode::Radians));
    /// assert_eq!(session.angle_mode(), AngleMode::Radians);
    /// assert_eq!(session.buffer(), "");
    /// assert_eq!(session.display(), "0");
    /// assert_eq!(session.last_answer(), 0.0);
    /// assert_eq!(session.config().error_token, "ERR");
    /// ```
    pub fn new(config: Config) -> Self {
        let angle_mode = config.angle_mode;
        let mut session = Self {
            config,
            buffer: String::new(),
            display: String::new(),
            history: String::new(),
            last_answer: 0.0,
            angle_mode,
        };
        session.refresh_display();
        session
    }

    /// Append `text` to the input buffer
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.refresh_display();
    }

    /// Append the `π` symbol to the input buffer
    pub fn push_pi(&mut self) {
        self.push("π");
    }

    /// Append the last answer to the input buffer
    pub fn insert_last_answer(&mut self) {
        let answer = self.last_answer.to_string();
        self.push(&answer);
    }

    /// Empty the input buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.refresh_display();
    }

    /// Remove the last character of the input buffer
    pub fn backspace(&mut self) {
        self.buffer.pop();
        self.refresh_display();
    }

    /// Switch between degrees and radians, and return the new mode
    pub fn toggle_angle_mode(&mut self) -> AngleMode {
        self.angle_mode = self.angle_mode.toggled();
        debug!("angle mode is now {}", self.angle_mode);
        self.angle_mode
    }

    /// Evaluate the input buffer.
    ///
    /// On success the buffer is replaced by the result, which also becomes
    /// the last answer. On failure, including a `NaN` or infinite result, the
    /// buffer is cleared, the display shows the error token and the last
    /// answer is kept.
    pub fn equals(&mut self) -> Result<f64> {
        let input = std::mem::take(&mut self.buffer);
        let result = eval(&input, &self.context()).and_then(|value| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(Error::NonFinite(value))
            }
        });
        match result {
            Ok(value) => {
                self.last_answer = value;
                self.history = format!("{} =", input);
                self.buffer = value.to_string();
                self.refresh_display();
            }
            Err(ref error) => {
                debug!("evaluation of '{}' failed: {}", input, error);
                self.display = self.config.error_token.clone();
            }
        }
        result
    }

    /// Sample `input` for plotting over `[xmin, xmax]`, with the session
    /// angle mode and the configured number of samples.
    pub fn plot(&self, input: &str, xmin: f64, xmax: f64) -> Result<Plot> {
        plot::sample(input, &self.context(), xmin, xmax, self.config.plot.sample_count)
    }

    /// Sample `input` over the configured default range
    pub fn plot_default_range(&self, input: &str) -> Result<Plot> {
        self.plot(input, self.config.plot.xmin, self.config.plot.xmax)
    }

    /// The evaluation context of the next evaluation
    pub fn context(&self) -> EvaluationContext {
        EvaluationContext::new(self.angle_mode)
    }

    /// Text shown to the user: the buffer, `0` when it is empty, or the
    /// error token after a failure
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The expression being typed
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The last successfully evaluated expression, followed by ` =`
    pub fn history(&self) -> &str {
        &self.history
    }

    /// Result of the last successful evaluation, `0` at first
    pub fn last_answer(&self) -> f64 {
        self.last_answer
    }

    /// Angle mode of the next evaluation
    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Settings this session was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn refresh_display(&mut self) {
        self.display = if self.buffer.is_empty() {
            "0".into()
        } else {
            self.buffer.clone()
        };
    }
}
