use crate::error::{Error, Result};
use crate::token::{Op, Token};
use std::iter::Peekable;
use std::str::CharIndices;

/// Deepest expression tree accepted by [`Lexer::parse`]. Every operator and
/// function call adds one level, so `1+1+1` is three levels deep.
pub const MAX_DEPTH: usize = 256;

#[must_use]
/// Check if `ident` is a valid identifier
///
/// # Examples
///
/// ```
/// # use scicalc::is_identifier;
///
/// assert_eq!(is_identifier("__abc3"), true);
/// assert_eq!(is_identifier("34zb"), false);
/// ```
pub fn is_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    // Check first char
    if !chars.next().map_or(false, is_identifier_start) {
        return false;
    }
    // Check all others
    chars.all(is_identifier_part)
}

/// An helper struct for lexing the input
pub struct Lexer<'a> {
    source: &'a str,
    input: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            input: source.char_indices().peekable(),
        }
    }

    /// Read the whole input and convert it to reverse polish notation with
    /// the shunting-yard algorithm, checking that operands and operators
    /// alternate on the way.
    pub fn parse(&mut self) -> Result<Vec<Token>> {
        let mut output = Vec::new();
        let mut operators: Vec<Token> = Vec::new();
        // true when the next token must start an operand
        let mut expect_operand = true;
        let mut seen_any = false;

        let tokens = self.tokenize()?;
        let mut tokens = tokens.into_iter().peekable();

        'tokens: while let Some(token) = tokens.next() {
            seen_any = true;
            match token {
                Token::Number(_) if expect_operand => {
                    output.push(token);
                    expect_operand = false;
                }
                Token::Name(name) if expect_operand => {
                    if tokens.peek() == Some(&Token::LParen) {
                        operators.push(Token::Call(name));
                    } else {
                        output.push(Token::Name(name));
                        expect_operand = false;
                    }
                }
                Token::LParen if expect_operand => operators.push(token),
                Token::Op(Op::Minus) if expect_operand => operators.push(Token::Op(Op::Neg)),
                // unary plus does nothing
                Token::Op(Op::Plus) if expect_operand => {}
                Token::Op(o1) if !expect_operand => {
                    while let Some(&Token::Op(o2)) = operators.last() {
                        if o2.pops_before(o1) {
                            operators.pop();
                            output.push(Token::Op(o2));
                        } else {
                            break;
                        }
                    }
                    operators.push(token);
                    expect_operand = true;
                }
                Token::RParen if !expect_operand => {
                    while let Some(token) = operators.pop() {
                        match token {
                            Token::LParen => {
                                if let Some(&Token::Call(_)) = operators.last() {
                                    if let Some(call) = operators.pop() {
                                        output.push(call);
                                    }
                                }
                                continue 'tokens;
                            }
                            Token::Op(_) => output.push(token),
                            other => {
                                return Err(Error::parse(format!(
                                    "unexpected {} in operators stack",
                                    other
                                )))
                            }
                        }
                    }
                    return Err(Error::parse("mismatched parenthesis"));
                }
                other => {
                    return Err(Error::parse(format!("unexpected {}", other)));
                }
            }
        }

        if !seen_any {
            return Err(Error::parse("empty expression"));
        }
        if expect_operand {
            return Err(Error::parse("unexpected end of expression"));
        }

        while let Some(token) = operators.pop() {
            match token {
                Token::Op(_) => output.push(token),
                _ => return Err(Error::parse("mismatched parenthesis")),
            }
        }
        check_depth(&output)?;
        Ok(output)
    }

    /// Split the input in tokens, in reading order
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        while let Some(&(_, c)) = self.input.peek() {
            if c.is_whitespace() {
                self.input.next();
            } else {
                break;
            }
        }

        let (start, c) = match self.input.next() {
            Some(next) => next,
            None => return Ok(None),
        };
        let token = match c {
            c if is_number_start(c) => self.number(start)?,
            c if is_identifier_start(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, c)) = self.input.peek() {
                    if is_identifier_part(c) {
                        self.input.next();
                        end = i + c.len_utf8();
                    } else {
                        break;
                    }
                }
                Token::Name(self.source[start..end].to_owned())
            }
            '+' => Token::Op(Op::Plus),
            '-' => Token::Op(Op::Minus),
            '*' => Token::Op(Op::Mul),
            '/' => Token::Op(Op::Div),
            '^' => Token::Op(Op::Exp),
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(Error::parse(format!(
                    "unexpected character in input: {}",
                    other
                )));
            }
        };
        Ok(Some(token))
    }

    /// Read a decimal literal starting at `start`, with an optional exponent
    fn number(&mut self, start: usize) -> Result<Token> {
        let mut end = start + 1;
        while let Some(&(i, c)) = self.input.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.input.next();
                end = i + 1;
            } else {
                break;
            }
        }

        // only consume an exponent marker when digits follow it, so that
        // `2E` stays a number followed by an identifier
        if matches!(self.input.peek(), Some(&(_, 'e')) | Some(&(_, 'E'))) {
            let mut ahead = self.input.clone();
            ahead.next();
            if matches!(ahead.peek(), Some(&(_, '+')) | Some(&(_, '-'))) {
                ahead.next();
            }
            if let Some(&(_, c)) = ahead.peek() {
                if c.is_ascii_digit() {
                    while let Some(&(i, c)) = ahead.peek() {
                        if c.is_ascii_digit() {
                            ahead.next();
                            end = i + 1;
                        } else {
                            break;
                        }
                    }
                    self.input = ahead;
                }
            }
        }

        let literal = &self.source[start..end];
        literal
            .parse()
            .map(Token::Number)
            .map_err(|_| Error::parse(format!("invalid number {}", literal)))
    }
}

/// Reject reverse polish notation `tokens` that would build a tree deeper
/// than `MAX_DEPTH`, as the tree is built and evaluated recursively.
fn check_depth(tokens: &[Token]) -> Result<()> {
    let mut depths: Vec<usize> = Vec::new();
    for token in tokens {
        let depth = match token {
            Token::Number(_) | Token::Name(_) => 1,
            Token::Op(Op::Neg) | Token::Call(_) => depths.pop().unwrap_or(0) + 1,
            Token::Op(_) => {
                let right = depths.pop().unwrap_or(0);
                let left = depths.pop().unwrap_or(0);
                left.max(right) + 1
            }
            Token::LParen | Token::RParen => continue,
        };
        if depth > MAX_DEPTH {
            return Err(Error::parse("expression is too deeply nested"));
        }
        depths.push(depth);
    }
    Ok(())
}

/// Check if `c` can appear at the first character of a number
fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Check if `c` can appear at the first character of an identifier
fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// Check if `c` can appear inside an identifier
fn is_identifier_part(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Op, Token};
    use test_case::test_case;

    fn num(value: f64) -> Token {
        Token::Number(value)
    }

    fn name(name: &str) -> Token {
        Token::Name(name.to_string())
    }

    #[test_case("2 + 2" => Ok(vec![num(2.0), num(2.0), Token::Op(Op::Plus)]) ; "addition is parsed properly")]
    #[test_case("2+2" => Ok(vec![num(2.0), num(2.0), Token::Op(Op::Plus)]) ; "spaces are optional")]
    #[test_case("2+3*4" => Ok(vec![num(2.0), num(3.0), num(4.0), Token::Op(Op::Mul), Token::Op(Op::Plus)]) ; "precedence")]
    #[test_case("2^3^2" => Ok(vec![num(2.0), num(3.0), num(2.0), Token::Op(Op::Exp), Token::Op(Op::Exp)]) ; "right associative exponent")]
    #[test_case("8-2-1" => Ok(vec![num(8.0), num(2.0), Token::Op(Op::Minus), num(1.0), Token::Op(Op::Minus)]) ; "left associative minus")]
    #[test_case("-2^2" => Ok(vec![num(2.0), num(2.0), Token::Op(Op::Exp), Token::Op(Op::Neg)]) ; "negation after exponent")]
    #[test_case("2*-3" => Ok(vec![num(2.0), num(3.0), Token::Op(Op::Neg), Token::Op(Op::Mul)]) ; "negated operand")]
    #[test_case("+4" => Ok(vec![num(4.0)]) ; "unary plus")]
    #[test_case("sin(x)" => Ok(vec![name("x"), Token::Call("sin".into())]) ; "function call")]
    #[test_case("sqrt((PI))" => Ok(vec![name("PI"), Token::Call("sqrt".into())]) ; "nested parenthesis")]
    fn parse(equation: &str) -> Result<Vec<Token>> {
        Lexer::new(equation).parse()
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "only spaces")]
    #[test_case("(1+2" ; "unclosed parenthesis")]
    #[test_case("1+2)" ; "unopened parenthesis")]
    #[test_case("()" ; "empty parenthesis")]
    #[test_case("1+" ; "dangling operator")]
    #[test_case("*1" ; "leading operator")]
    #[test_case("2(3)" ; "implicit multiplication")]
    #[test_case("2 3" ; "two numbers")]
    #[test_case("1.2.3" ; "malformed number")]
    #[test_case("3!" ; "factorial is not normalized")]
    #[test_case("2**3" ; "double star")]
    fn parse_errors(equation: &str) {
        let result = Lexer::new(equation).parse();
        assert!(matches!(result, Err(Error::Parse(_))), "{:?}", result);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            Lexer::new("").parse(),
            Err(Error::parse("empty expression"))
        );
        assert_eq!(
            Lexer::new("(2").parse(),
            Err(Error::parse("mismatched parenthesis"))
        );
        assert_eq!(
            Lexer::new("2 # 3").parse(),
            Err(Error::parse("unexpected character in input: #"))
        );
        assert_eq!(
            Lexer::new("2 x").parse(),
            Err(Error::parse("unexpected identifier 'x'"))
        );
    }

    #[test]
    fn nesting_limit() {
        let chain = |terms: usize| format!("1{}", "+1".repeat(terms - 1));
        // `terms` operands need `terms - 1` additions over a leaf
        assert!(Lexer::new(&chain(MAX_DEPTH)).parse().is_ok());
        let too_deep = Err(Error::parse("expression is too deeply nested"));
        assert_eq!(Lexer::new(&chain(MAX_DEPTH + 1)).parse(), too_deep);
        assert_eq!(Lexer::new(&chain(5000)).parse(), too_deep);
        assert_eq!(Lexer::new(&format!("{}1", "-".repeat(5000))).parse(), too_deep);
        let calls = format!("{}1{}", "sqrt(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(Lexer::new(&calls).parse(), too_deep);

        // parenthesis alone do not deepen the tree
        let wrapped = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
        assert_eq!(Lexer::new(&wrapped).parse(), Ok(vec![num(1.0)]));
    }

    #[test_case("3" => Ok(vec![num(3.0)]) ; "integer")]
    #[test_case("3." => Ok(vec![num(3.0)]) ; "trailing dot")]
    #[test_case(".5" => Ok(vec![num(0.5)]) ; "leading dot")]
    #[test_case("1e3" => Ok(vec![num(1000.0)]) ; "exponent")]
    #[test_case("2.5E-2" => Ok(vec![num(0.025)]) ; "negative exponent")]
    #[test_case("2E" => Ok(vec![num(2.0), name("E")]) ; "euler constant after number")]
    #[test_case("2e+x" => Ok(vec![num(2.0), name("e"), Token::Op(Op::Plus), name("x")]) ; "incomplete exponent")]
    fn tokenize(input: &str) -> Result<Vec<Token>> {
        Lexer::new(input).tokenize()
    }

    #[test]
    fn idents() {
        let identifier_starts = ['c', 'Z', '_', 'f'];
        for c in &identifier_starts {
            assert!(is_identifier_start(*c));
        }

        let non_identifier_starts = ['3', 'à', '@', ']', '[', '.', 'π'];
        for c in &non_identifier_starts {
            assert!(!is_identifier_start(*c));
        }

        let identifiers = ["_______", "abc", "PI", "a__45__bc", "x"];
        for v in &identifiers {
            assert!(is_identifier(v));
        }

        let non_identifiers = ["a-bc", "@bc", "6bc", "ab.c", "abc[90]", ""];
        for nv in &non_identifiers {
            assert!(!is_identifier(nv));
        }
    }
}
