use crate::bindings::{AngleMode, Binding, Builtin};
use crate::context::{EvaluationContext, Resolved};
use crate::error::{Error, Result};
use crate::token::{Op, Token};

/// Ast nodes for the expressions
#[derive(Debug, Clone)]
pub enum Ast {
    /// The free variable `x`
    Variable,
    /// A constant value
    Value(f64),
    /// -<operand>
    Neg(Box<Ast>),
    /// <left> + <right>
    Add(Box<Ast>, Box<Ast>),
    /// <left> - <right>
    Sub(Box<Ast>, Box<Ast>),
    /// <left> * <right>
    Mul(Box<Ast>, Box<Ast>),
    /// <left> / <right>
    Div(Box<Ast>, Box<Ast>),
    /// <left> ^ <right>
    Exp(Box<Ast>, Box<Ast>),
    /// fn(<arg>)
    Function(Builtin, Box<Ast>),
}

impl PartialEq<Self> for Ast {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ast::Variable, Ast::Variable) => true,
            (Ast::Value(v), Ast::Value(v2)) => v.to_le_bytes() == v2.to_le_bytes(),
            (Ast::Neg(a), Ast::Neg(a2)) => a == a2,
            (Ast::Add(a, b), Ast::Add(a2, b2))
            | (Ast::Sub(a, b), Ast::Sub(a2, b2))
            | (Ast::Mul(a, b), Ast::Mul(a2, b2))
            | (Ast::Div(a, b), Ast::Div(a2, b2))
            | (Ast::Exp(a, b), Ast::Exp(a2, b2)) => a == a2 && b == b2,
            (Ast::Function(f, a), Ast::Function(f2, a2)) => f == f2 && a == a2,
            _ => false,
        }
    }
}
impl Eq for Ast {}

impl Ast {
    /// Construct the AST for a vector of tokens in reverse polish notation,
    /// resolving identifiers in `context`. This function eats the tokens as
    /// it uses them, and fails if some are left over.
    pub fn from_tokens(tokens: &mut Vec<Token>, context: &EvaluationContext) -> Result<Self> {
        let ast = Self::from_tokens_internal(tokens, context, "")?;
        if !tokens.is_empty() {
            return Err(Error::parse("unexpected tokens after expression"));
        }
        Ok(ast.optimize(context.angle_mode()))
    }

    fn from_tokens_internal(
        tokens: &mut Vec<Token>,
        context: &EvaluationContext,
        location: &str,
    ) -> Result<Self> {
        let token = match tokens.pop() {
            Some(token) => token,
            None => return Err(Error::parse(format!("empty expression{}", location))),
        };
        match token {
            Token::Number(number) => Ok(Self::Value(number)),
            Token::Name(name) => match context.resolve(&name) {
                Resolved::Bound(Binding::Constant(value)) => Ok(Self::Value(value)),
                Resolved::Variable => Ok(Self::Variable),
                Resolved::Bound(Binding::Function(_)) => Err(Error::parse(format!(
                    "function '{}' requires an argument",
                    name
                ))),
                Resolved::Unbound => Err(unbound(&name)),
            },
            Token::Call(name) => match context.resolve(&name) {
                Resolved::Bound(Binding::Function(builtin)) => {
                    let arg = Self::from_tokens_internal(tokens, context, " in function call")?;
                    Ok(Self::Function(builtin, Box::new(arg)))
                }
                Resolved::Bound(Binding::Constant(_)) | Resolved::Variable => {
                    Err(Error::parse(format!("'{}' is not a function", name)))
                }
                Resolved::Unbound => Err(unbound(&name)),
            },
            Token::Op(Op::Neg) => {
                let operand = Self::from_tokens_internal(tokens, context, " after operator")?;
                Ok(Self::Neg(Box::new(operand)))
            }
            Token::Op(op) => {
                let right = Box::new(Self::from_tokens_internal(tokens, context, " after operator")?);
                let left = Box::new(Self::from_tokens_internal(tokens, context, " before operator")?);
                binary(op, left, right)
            }
            other => Err(Error::parse(format!(
                "unexpected {} after shunting yard",
                other
            ))),
        }
    }

    /// If the AST node correspond to a constant, get `Some(constant)`. Else,
    /// get `None`
    pub fn value(&self) -> Option<f64> {
        if let Self::Value(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Check whether the free variable appears in this AST
    pub fn uses_variable(&self) -> bool {
        match self {
            Self::Variable => true,
            Self::Value(_) => false,
            Self::Neg(operand) | Self::Function(_, operand) => operand.uses_variable(),
            Self::Add(left, right)
            | Self::Sub(left, right)
            | Self::Mul(left, right)
            | Self::Div(left, right)
            | Self::Exp(left, right) => left.uses_variable() || right.uses_variable(),
        }
    }

    /// Evaluate the AST with `x` as the value of the free variable
    pub fn eval(&self, mode: AngleMode, x: f64) -> f64 {
        match *self {
            Self::Variable => x,
            Self::Value(value) => value,
            Self::Neg(ref operand) => -operand.eval(mode, x),
            Self::Add(ref left, ref right) => left.eval(mode, x) + right.eval(mode, x),
            Self::Sub(ref left, ref right) => left.eval(mode, x) - right.eval(mode, x),
            Self::Mul(ref left, ref right) => left.eval(mode, x) * right.eval(mode, x),
            Self::Div(ref left, ref right) => left.eval(mode, x) / right.eval(mode, x),
            Self::Exp(ref left, ref right) => libm::pow(left.eval(mode, x), right.eval(mode, x)),
            Self::Function(builtin, ref arg) => builtin.apply(arg.eval(mode, x), mode),
        }
    }

    /// Optimize the AST by doing constants propagation. Folding uses the same
    /// operations as `eval`, so a folded tree gives bit-identical results.
    pub fn optimize(self, mode: AngleMode) -> Self {
        let folded = match self {
            Self::Variable | Self::Value(_) => return self,
            Self::Neg(operand) => Self::Neg(Box::new(operand.optimize(mode))),
            Self::Function(builtin, arg) => Self::Function(builtin, Box::new(arg.optimize(mode))),
            Self::Add(left, right) => Self::Add(fold(left, mode), fold(right, mode)),
            Self::Sub(left, right) => Self::Sub(fold(left, mode), fold(right, mode)),
            Self::Mul(left, right) => Self::Mul(fold(left, mode), fold(right, mode)),
            Self::Div(left, right) => Self::Div(fold(left, mode), fold(right, mode)),
            Self::Exp(left, right) => Self::Exp(fold(left, mode), fold(right, mode)),
        };
        if folded.uses_variable() {
            folded
        } else {
            // the free variable is absent, its value does not matter
            Self::Value(folded.eval(mode, 0.0))
        }
    }
}

fn binary(op: Op, left: Box<Ast>, right: Box<Ast>) -> Result<Ast> {
    match op {
        Op::Plus => Ok(Ast::Add(left, right)),
        Op::Minus => Ok(Ast::Sub(left, right)),
        Op::Mul => Ok(Ast::Mul(left, right)),
        Op::Div => Ok(Ast::Div(left, right)),
        Op::Exp => Ok(Ast::Exp(left, right)),
        Op::Neg => Err(Error::parse("unary operator '-' used with two operands")),
    }
}

fn fold(ast: Box<Ast>, mode: AngleMode) -> Box<Ast> {
    Box::new(ast.optimize(mode))
}

fn unbound(name: &str) -> Error {
    Error::Name(format!("name '{}' is not defined", name))
}

#[cfg(test)]
mod tests {
    use super::Ast;
    use crate::bindings::{AngleMode, Builtin};
    use crate::context::EvaluationContext;
    use crate::error::Error;
    use crate::lexer::Lexer;

    fn build(input: &str, context: &EvaluationContext) -> Result<Ast, Error> {
        let mut tokens = Lexer::new(input).parse()?;
        Ast::from_tokens(&mut tokens, context)
    }

    #[test]
    // Verifies that we have reduced the input to a single value token when possible
    fn optimize() {
        let context = EvaluationContext::new(AngleMode::Degrees);

        let ast = build("3 + 5", &context).unwrap();
        assert_eq!(ast.value(), Some(8.0));

        let ast = build("(3 + 5^2)*45", &context).unwrap();
        assert_eq!(ast.value(), Some(1260.0));

        let ast = build("sqrt(9)", &context).unwrap();
        assert_eq!(ast.value(), Some(3.0));

        let ast = build("-factorial(3)", &context).unwrap();
        assert_eq!(ast.value(), Some(-6.0));
    }

    #[test]
    fn keeps_variable_sub_trees() {
        let context = EvaluationContext::new(AngleMode::Radians).with_x(0.0);
        let ast = build("x * (2 + 3)", &context).unwrap();
        assert_eq!(
            ast,
            Ast::Mul(Box::new(Ast::Variable), Box::new(Ast::Value(5.0)))
        );
        assert!(ast.uses_variable());

        let ast = build("sin(x)", &context).unwrap();
        assert_eq!(ast, Ast::Function(Builtin::Sin, Box::new(Ast::Variable)));
    }

    #[test]
    fn resolution_errors() {
        let context = EvaluationContext::new(AngleMode::Degrees);
        assert_eq!(
            build("x + 1", &context),
            Err(Error::Name("name 'x' is not defined".into()))
        );
        assert_eq!(
            build("Math", &context),
            Err(Error::Name("name 'Math' is not defined".into()))
        );
        assert_eq!(
            build("sin", &context),
            Err(Error::Parse("function 'sin' requires an argument".into()))
        );
        assert_eq!(
            build("PI(2)", &context),
            Err(Error::Parse("'PI' is not a function".into()))
        );
        assert_eq!(
            build("foo(2)", &context),
            Err(Error::Name("name 'foo' is not defined".into()))
        );
    }

    #[test]
    fn folding_matches_evaluation() {
        let context = EvaluationContext::new(AngleMode::Degrees).with_x(0.3);
        let expressions = ["sin(x) / 7 + x^0.5", "ln(x) - log(x) * sqrt(x)", "-x^2"];
        for expression in &expressions {
            let with_variable = build(expression, &context).unwrap();
            let folded = build(
                &expression.replace('x', "0.3"),
                &EvaluationContext::new(AngleMode::Degrees),
            )
            .unwrap();
            assert_eq!(
                with_variable.eval(AngleMode::Degrees, 0.3).to_bits(),
                folded.value().unwrap().to_bits()
            );
        }
    }
}
