#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::non_ascii_literal,
    clippy::must_use_candidate,
    clippy::float_cmp
)]

//! Scicalc, the evaluation engine of a scientific calculator with a function
//! plotter.
//!
//! Text typed on the calculator goes through two steps: the
//! [`normalize`](fn.normalize.html) function rewrites the surface syntax
//! (`×`, `÷`, `π`, postfix `!`) into a canonical expression, which is then
//! parsed and evaluated against an
//! [`EvaluationContext`](struct.EvaluationContext.html). The easiest way to
//! do both is the [`eval`](fn.eval.html) function:
//!
//! ```
//! use scicalc::{eval, AngleMode, EvaluationContext};
//!
//! let context = EvaluationContext::new(AngleMode::Degrees);
//! assert_eq!(eval("3 + 5 × 2", &context), Ok(13.0));
//! assert!((eval("sin(30)", &context).unwrap() - 0.5).abs() < 1e-12);
//! ```
//!
//! The context holds the angle mode used by the trigonometric functions, the
//! bound constants and functions, and, when plotting, the value of the free
//! variable `x`. It is also possible to separate the parsing from the
//! evaluation of an expression with the [`Expr`](struct.Expr.html) type,
//! which is how the [`plot`](plot/index.html) module evaluates a function at
//! every sample:
//!
//! ```
//! use scicalc::{AngleMode, EvaluationContext, Expr};
//!
//! let context = EvaluationContext::new(AngleMode::Radians).with_x(0.0);
//! let expr = Expr::compile("x^2 + 1", &context).unwrap();
//! assert_eq!(expr.eval_at(2.0), 5.0);
//! assert_eq!(expr.eval_at(3.0), 10.0);
//! ```
//!
//! # Language definition
//!
//! The canonical language can contain the following elements:
//!
//! - float literal values: `12.456`, `.5`, `3.`, `0.0045e78`, ...;
//! - left and right parenthesis;
//! - mathematical operators: `+` for addition, `-` for subtraction and
//!   negation, `*` for multiplication, `/` for division and `^` for
//!   exponentiation. `^` is right associative and binds tighter than
//!   negation, so `-2^2` is `-4`;
//! - the constants `PI` and `E`;
//! - the free variable `x`, only when the context binds it;
//! - function call: `sin(a)`, `log(22.0)`. The following functions are
//!   accessible: `sin`, `cos`, `tan` (in degrees or radians depending on the
//!   angle mode), `sqrt`, `ln` (natural logarithm), `log` (base 10
//!   logarithm) and `factorial`.
//!
//! Any other symbol is forbidden in the input, and there is no implicit
//! multiplication.
//! An expression tree can be at most 256 levels deep, each operator and
//! function call adding one level: `1+1+...+1` with more terms is rejected
//! as a parse error.
//!
//! The mathematical operators carry the floating point properties: dividing
//! by zero gives an infinity, `sqrt(-1)` is `NaN`, ... Such values are
//! regular results of the evaluation; the [`Session`](struct.Session.html)
//! equals action reports them as errors, and the plot sampler skips them.
//!
//! # Technical details
//!
//! The expressions are parsed with a Shunting-Yard algorithm into an AST,
//! which is simplified by constant propagation and then interpreted. Nothing
//! but this fixed grammar is ever executed.

#[macro_use]
extern crate lazy_static;

mod ast;
mod bindings;
mod config;
mod context;
mod error;
mod expr;
mod lexer;
mod normalize;
pub mod plot;
mod session;
mod token;

pub use ast::Ast;
pub use bindings::{factorial, AngleMode, Binding, Bindings, Builtin, FREE_VARIABLE};
pub use config::{Config, PlotConfig};
pub use context::EvaluationContext;
pub use error::{Error, Result};
pub use expr::{eval, evaluate, evaluate_finite, Expr};
pub use lexer::is_identifier;
pub use normalize::normalize;
pub use plot::{Plot, Sample};
pub use session::Session;
