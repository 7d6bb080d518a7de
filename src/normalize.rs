//! Rewriting of the calculator surface syntax into the canonical form read
//! by [`Expr::compile`](crate::Expr::compile).
//!
//! The rules run in a fixed order, each one over the output of the previous
//! one:
//!
//! 1. the `×`, `÷` and `−` glyphs become `*`, `/` and `-`;
//! 2. `^` is kept, as it already is the exponentiation operator;
//! 3. a numeric literal or a parenthesized group followed by `!` becomes a
//!    call to `factorial`;
//! 4. `π` becomes `PI`;
//! 5. whitespace is removed.
//!
//! Normalization never fails: anything it does not understand is left in
//! place for the parser to reject.

use log::debug;

/// Name of the function that postfix `!` is rewritten to
pub const FACTORIAL: &str = "factorial";

/// Name of the constant that `π` is rewritten to
pub const PI: &str = "PI";

/// Rewrite `input` into a canonical expression.
///
/// # Examples
///
/// ```
/// use scicalc::normalize;
///
/// assert_eq!(normalize("2 × π"), "2*PI");
/// assert_eq!(normalize("5! ÷ (1+2)!"), "factorial(5)/factorial((1+2))");
/// assert_eq!(normalize("2^10"), "2^10");
/// ```
pub fn normalize(input: &str) -> String {
    let output = strip_whitespace(&replace_pi(&replace_factorials(&replace_glyphs(input))));
    if output != input {
        debug!("normalized '{}' into '{}'", input, output);
    }
    output
}

fn replace_glyphs(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}

/// Rewrite `<literal>!` and `(<group>)!`. When the group is the argument
/// list of a function call, the whole call is wrapped. A second `!` wraps
/// the first call, so `3!!` is `(3!)!` and not the double factorial.
fn replace_factorials(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        if c != '!' {
            output.push(c);
            continue;
        }
        match operand_start(&output) {
            Some(start) => {
                let operand = output.split_off(start);
                output.push_str(FACTORIAL);
                output.push('(');
                output.push_str(&operand);
                output.push(')');
            }
            None => output.push('!'),
        }
    }
    output
}

/// Find the byte offset where the operand of a postfix `!` starts at the end
/// of `text`, if there is one.
fn operand_start(text: &str) -> Option<usize> {
    if text.ends_with(')') {
        let open = matching_open_paren(text)?;
        // include the name of a called function
        let name_start = text[..open]
            .char_indices()
            .rev()
            .take_while(|&(_, c)| c == '_' || c.is_ascii_alphanumeric())
            .last()
            .map_or(open, |(i, _)| i);
        if text[name_start..open]
            .chars()
            .next()
            .map_or(true, |c| !c.is_ascii_digit())
        {
            return Some(name_start);
        }
        return Some(open);
    }

    let mut start = digits_start(text)?;
    // `<mantissa>e<exponent>`, with an optional sign on the exponent
    let before = &text[..start];
    let before = before
        .strip_suffix(|c: char| c == '+' || c == '-')
        .unwrap_or(before);
    if let Some(mantissa) = before.strip_suffix(|c: char| c == 'e' || c == 'E') {
        if !text[start..].contains('.') {
            if let Some(mantissa_start) = digits_start(mantissa) {
                start = mantissa_start;
            }
        }
    }
    // digits at the end of an identifier are not a literal
    let glued = text[..start]
        .chars()
        .next_back()
        .map_or(false, |c| c == '_' || c.is_ascii_alphabetic());
    if glued {
        None
    } else {
        Some(start)
    }
}

/// Byte offset of the run of digits and dots ending `text`, if it holds at
/// least one digit
fn digits_start(text: &str) -> Option<usize> {
    let start = text
        .char_indices()
        .rev()
        .take_while(|&(_, c)| c.is_ascii_digit() || c == '.')
        .last()
        .map(|(i, _)| i)?;
    if text[start..].chars().any(|c| c.is_ascii_digit()) {
        Some(start)
    } else {
        None
    }
}

/// Byte offset of the `(` matching the `)` that ends `text`
fn matching_open_paren(text: &str) -> Option<usize> {
    let mut depth = 0_usize;
    for (i, c) in text.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn replace_pi(input: &str) -> String {
    input.replace('π', PI)
}

fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}
