use crate::ast::Ast;
use crate::bindings::AngleMode;
use crate::context::EvaluationContext;
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::normalize::normalize;
use log::debug;

/// Evaluate a single canonical expression from `input`.
///
/// Returns `Ok(result)` if the expression parses, or `Err(cause)` if it is
/// malformed or references an unbound identifier. The result may be `NaN` or
/// infinite: deciding whether that is an error is up to the caller, see
/// [`evaluate_finite`](fn.evaluate_finite.html).
///
/// # Example
///
/// ```
/// use scicalc::{evaluate, AngleMode, EvaluationContext};
///
/// let context = EvaluationContext::new(AngleMode::Degrees);
/// assert_eq!(evaluate("45 - 2^3", &context), Ok(37.0));
/// assert_eq!(evaluate("1/0", &context), Ok(f64::INFINITY));
///
/// let context = context.with_x(-5.0);
/// assert_eq!(evaluate("3 * x", &context), Ok(-15.0));
/// ```
pub fn evaluate(input: &str, context: &EvaluationContext) -> Result<f64> {
    Expr::compile(input, context).map(|expr| expr.eval())
}

/// Evaluate a canonical expression, rejecting `NaN` and infinite results with
/// [`Error::NonFinite`](enum.Error.html#variant.NonFinite).
pub fn evaluate_finite(input: &str, context: &EvaluationContext) -> Result<f64> {
    let value = evaluate(input, context)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFinite(value))
    }
}

/// Normalize the raw calculator text `input`, then evaluate it.
///
/// ```
/// use scicalc::{eval, AngleMode, EvaluationContext};
///
/// let context = EvaluationContext::new(AngleMode::Radians);
/// assert_eq!(eval("3! × 2", &context), Ok(12.0));
/// ```
pub fn eval(input: &str, context: &EvaluationContext) -> Result<f64> {
    evaluate(&normalize(input), context)
}

/// A parsed and optimized mathematical expression.
///
/// An `Expr` is compiled against an [`EvaluationContext`]: identifiers are
/// resolved with its bindings, and its angle mode is used for every later
/// evaluation. If the context binds `x`, the expression can be evaluated at
/// any value of `x`.
///
/// # Examples
/// ```
/// # use scicalc::{AngleMode, EvaluationContext, Expr};
/// let context = EvaluationContext::new(AngleMode::Degrees);
/// let expr = Expr::compile("3 + 5 * 2", &context).unwrap();
/// assert_eq!(expr.eval(), 13.0);
///
/// let expr = Expr::compile("x^2 - 1", &context.with_x(0.0)).unwrap();
/// assert_eq!(expr.eval_at(3.0), 8.0);
/// assert_eq!(expr.eval_at(-2.0), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    ast: Ast,
    angle_mode: AngleMode,
    x: f64,
}

impl Expr {
    /// Compile the given canonical `expression` into an `Expr`.
    ///
    /// # Examples
    /// ```
    /// # use scicalc::{EvaluationContext, Expr};
    /// let context = EvaluationContext::default();
    /// // A valid expression
    /// assert!(Expr::compile("3 + 5 * 2", &context).is_ok());
    /// // an invalid expression
    /// assert!(Expr::compile("3eff + 5 * 2", &context).is_err());
    /// // `x` is only known when the context binds it
    /// assert!(Expr::compile("x + 1", &context).is_err());
    /// assert!(Expr::compile("x + 1", &context.with_x(0.0)).is_ok());
    /// ```
    pub fn compile(expression: &str, context: &EvaluationContext) -> Result<Self> {
        let mut tokens = Lexer::new(expression).parse()?;
        let ast = Ast::from_tokens(&mut tokens, context)?;
        debug!("compiled '{}' into {:?}", expression, ast);
        Ok(Self {
            ast,
            angle_mode: context.angle_mode(),
            x: context.x().unwrap_or(0.0),
        })
    }

    /// Evaluate the expression with the value of `x` from the compilation
    /// context.
    pub fn eval(&self) -> f64 {
        self.ast.eval(self.angle_mode, self.x)
    }

    /// Evaluate the expression with `x` bound to the given value.
    pub fn eval_at(&self, x: f64) -> f64 {
        self.ast.eval(self.angle_mode, x)
    }

    /// Check whether the expression depends on the free variable `x`
    pub fn uses_variable(&self) -> bool {
        self.ast.uses_variable()
    }

    /// The angle mode used by the trigonometric functions of this expression
    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// The optimized syntax tree
    pub fn ast(&self) -> &Ast {
        &self.ast
    }
}
