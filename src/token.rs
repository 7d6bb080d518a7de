use std::fmt::{self, Display, Formatter};

/// Possible tokens to find in the input string
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal
    Number(f64),
    /// An identifier: constant, variable or function name
    Name(String),
    /// A function call. Only found in reverse polish notation output, where
    /// it follows the tokens of its argument.
    Call(String),
    /// An operator
    Op(Op),
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
}

impl Display for Token {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match *self {
            Self::Number(value) => write!(fmt, "number {}", value),
            Self::Name(ref name) => write!(fmt, "identifier '{}'", name),
            Self::Call(ref name) => write!(fmt, "call to '{}'", name),
            Self::Op(op) => write!(fmt, "operator '{}'", op),
            Self::LParen => write!(fmt, "'('"),
            Self::RParen => write!(fmt, "')'"),
        }
    }
}

/// Allowed operators in the algorithm
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Plus,
    Minus,
    Mul,
    Div,
    Exp,
    /// Unary minus
    Neg,
}

impl Op {
    /// Get the operator precedence. Operators with higher precedence should be
    /// evaluated first.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Plus | Self::Minus => 1,
            Self::Mul | Self::Div => 2,
            Self::Neg => 3,
            Self::Exp => 4,
        }
    }

    /// Check if the operator is left associative
    pub fn is_left_associative(self) -> bool {
        match self {
            Self::Plus | Self::Minus | Self::Mul | Self::Div => true,
            Self::Exp | Self::Neg => false,
        }
    }

    /// Check if an operator `self` sitting on the operator stack must be
    /// moved to the output before pushing the binary operator `incoming`.
    pub fn pops_before(self, incoming: Op) -> bool {
        if incoming.is_left_associative() {
            incoming.precedence() <= self.precedence()
        } else {
            incoming.precedence() < self.precedence()
        }
    }
}

impl Display for Op {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let symbol = match *self {
            Self::Plus => "+",
            Self::Minus | Self::Neg => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Exp => "^",
        };
        fmt.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Op;
    use test_case::test_case;

    #[test_case(Op::Mul, Op::Plus => true ; "multiplication before addition")]
    #[test_case(Op::Plus, Op::Minus => true ; "left associative at same level")]
    #[test_case(Op::Plus, Op::Mul => false ; "addition waits for multiplication")]
    #[test_case(Op::Exp, Op::Exp => false ; "exponentiation is right associative")]
    #[test_case(Op::Neg, Op::Exp => false ; "negation is looser than exponentiation")]
    #[test_case(Op::Neg, Op::Mul => true ; "negation is tighter than multiplication")]
    fn pops_before(stacked: Op, incoming: Op) -> bool {
        stacked.pops_before(incoming)
    }
}
