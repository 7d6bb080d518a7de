use crate::bindings::{AngleMode, Binding, Bindings, FREE_VARIABLE};

/// Everything an expression is compiled and evaluated against: the
/// constant and function bindings, the angle mode, and the value of the free
/// variable `x` when plotting.
///
/// ```
/// use scicalc::{AngleMode, EvaluationContext};
///
/// let context = EvaluationContext::new(AngleMode::Radians).with_x(2.0);
/// assert_eq!(context.x(), Some(2.0));
/// assert_eq!(context.angle_mode(), AngleMode::Radians);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    bindings: Bindings,
    angle_mode: AngleMode,
    x: Option<f64>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new(AngleMode::default())
    }
}

impl EvaluationContext {
    /// Create a context with the standard bindings and no free variable
    #[must_use]
    pub fn new(angle_mode: AngleMode) -> Self {
        Self::with_bindings(Bindings::default(), angle_mode)
    }

    /// Create a context with custom bindings
    #[must_use]
    pub fn with_bindings(bindings: Bindings, angle_mode: AngleMode) -> Self {
        Self {
            bindings,
            angle_mode,
            x: None,
        }
    }

    /// Bind the free variable `x`
    #[must_use]
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Remove the binding of the free variable
    #[must_use]
    pub fn without_x(mut self) -> Self {
        self.x = None;
        self
    }

    /// Change the angle mode
    #[must_use]
    pub fn with_angle_mode(mut self, angle_mode: AngleMode) -> Self {
        self.angle_mode = angle_mode;
        self
    }

    /// Angle mode of the trigonometric functions
    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Value of the free variable, `None` when it is not bound
    pub fn x(&self) -> Option<f64> {
        self.x
    }

    /// Constants and functions visible to the expressions
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Resolve an identifier. The free variable shadows nothing: it is only
    /// visible when bound, and `x` can never be found in the bindings.
    pub(crate) fn resolve(&self, name: &str) -> Resolved {
        if name == FREE_VARIABLE {
            return match self.x {
                Some(_) => Resolved::Variable,
                None => Resolved::Unbound,
            };
        }
        match self.bindings.get(name) {
            Some(binding) => Resolved::Bound(binding),
            None => Resolved::Unbound,
        }
    }
}

/// What an identifier refers to in a given context
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resolved {
    Bound(Binding),
    Variable,
    Unbound,
}
