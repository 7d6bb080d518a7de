use hashbrown::HashMap;
use std::f64::consts;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::Error;

/// How the trigonometric functions interpret their argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleMode {
    /// Arguments are in degrees
    Degrees,
    /// Arguments are in radians
    Radians,
}

impl AngleMode {
    /// Get the other angle mode
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Degrees => Self::Radians,
            Self::Radians => Self::Degrees,
        }
    }

    /// Convert an angle expressed in this mode to radians
    #[must_use]
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => (angle * consts::PI) / 180.0,
            Self::Radians => angle,
        }
    }
}

impl Default for AngleMode {
    fn default() -> Self {
        Self::Degrees
    }
}

impl Display for AngleMode {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match *self {
            Self::Degrees => write!(fmt, "DEG"),
            Self::Radians => write!(fmt, "RAD"),
        }
    }
}

impl FromStr for AngleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(Self::Degrees),
            "rad" | "radian" | "radians" => Ok(Self::Radians),
            other => Err(Error::parse(format!("unknown angle mode: {}", other))),
        }
    }
}

/// Built-in functions of one argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Tangent
    Tan,
    /// Principal square root
    Sqrt,
    /// Natural logarithm
    Ln,
    /// Base 10 logarithm
    Log,
    /// See [`factorial`](fn.factorial.html)
    Factorial,
}

impl Builtin {
    /// Apply the function to `arg`. Only the trigonometric functions look at
    /// `mode`.
    #[must_use]
    pub fn apply(self, arg: f64, mode: AngleMode) -> f64 {
        match self {
            Self::Sin => libm::sin(mode.to_radians(arg)),
            Self::Cos => libm::cos(mode.to_radians(arg)),
            Self::Tan => libm::tan(mode.to_radians(arg)),
            Self::Sqrt => libm::sqrt(arg),
            Self::Ln => libm::log(arg),
            Self::Log => libm::log10(arg),
            Self::Factorial => factorial(arg),
        }
    }

    /// The name this function is bound to in the standard bindings
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "sqrt",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Factorial => "factorial",
        }
    }
}

/// Product `2 * 3 * ... * floor(n)`.
///
/// Negative arguments give `NaN`, `0` and `1` give `1`, and a non-integer
/// argument is truncated to its floor.
#[must_use]
pub fn factorial(n: f64) -> f64 {
    if n < 0.0 {
        return f64::NAN;
    }
    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        // the product can only stay infinite from here on
        if result.is_infinite() {
            break;
        }
        i += 1.0;
    }
    result
}

/// Anything an identifier can be bound to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    /// A numeric constant
    Constant(f64),
    /// A callable function
    Function(Builtin),
}

/// Name of the free variable used for plotting
pub const FREE_VARIABLE: &str = "x";

lazy_static! {
    static ref STANDARD: HashMap<String, Binding> = {
        let mut map = HashMap::<String, Binding>::new();
        map.insert("PI".into(), Binding::Constant(consts::PI));
        map.insert("E".into(), Binding::Constant(consts::E));
        for builtin in &[
            Builtin::Sin,
            Builtin::Cos,
            Builtin::Tan,
            Builtin::Sqrt,
            Builtin::Ln,
            Builtin::Log,
            Builtin::Factorial,
        ] {
            map.insert(builtin.name().into(), Binding::Function(*builtin));
        }
        map.shrink_to_fit();
        map
    };
}

/// Lookup table from identifiers to constants and functions.
///
/// The default table holds `PI`, `E`, `sin`, `cos`, `tan`, `sqrt`, `ln`,
/// `log` and `factorial`.
///
/// ```
/// use scicalc::{Binding, Bindings, Builtin};
///
/// let mut bindings = Bindings::default();
/// bindings.insert_constant("g", 9.81);
/// bindings.insert_function("fact", Builtin::Factorial);
/// assert_eq!(bindings.get("g"), Some(Binding::Constant(9.81)));
/// assert_eq!(bindings.get("fact"), Some(Binding::Function(Builtin::Factorial)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    names: HashMap<String, Binding>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            names: STANDARD.clone(),
        }
    }
}

impl Bindings {
    /// A table with no bindings at all
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Get the binding for `name`, if any
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.names.get(name).copied()
    }

    /// Bind `name` to a constant value. The free variable can not be bound
    /// this way.
    pub fn insert_constant<S: Into<String>>(&mut self, name: S, value: f64) -> Option<Binding> {
        self.insert(name.into(), Binding::Constant(value))
    }

    /// Bind `name` to one of the built-in functions
    pub fn insert_function<S: Into<String>>(&mut self, name: S, builtin: Builtin) -> Option<Binding> {
        self.insert(name.into(), Binding::Function(builtin))
    }

    fn insert(&mut self, name: String, binding: Binding) -> Option<Binding> {
        if name == FREE_VARIABLE {
            return None;
        }
        self.names.insert(name, binding)
    }

    /// Check whether `name` is bound to a function
    #[must_use]
    pub fn is_function(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Binding::Function(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn factorial_matches_product() {
        let mut product = 1.0;
        assert_eq!(factorial(0.0), 1.0);
        for n in 1..=20 {
            product *= f64::from(n);
            assert_eq!(factorial(f64::from(n)), product);
        }
    }

    #[test_case(-1.0 ; "minus one")]
    #[test_case(-0.5 ; "negative fraction")]
    #[test_case(f64::NEG_INFINITY ; "negative infinity")]
    fn factorial_of_negative_is_nan(n: f64) {
        assert!(factorial(n).is_nan());
    }

    #[test_case(1.0 => 1.0 ; "one")]
    #[test_case(3.5 => 6.0 ; "floors non integers")]
    #[test_case(0.99 => 1.0 ; "below one")]
    #[test_case(171.0 => f64::INFINITY ; "overflows to infinity")]
    #[test_case(f64::INFINITY => f64::INFINITY ; "infinite argument")]
    fn factorial_values(n: f64) -> f64 {
        factorial(n)
    }

    #[test]
    fn trigonometry_follows_angle_mode() {
        assert!((Builtin::Sin.apply(90.0, AngleMode::Degrees) - 1.0).abs() < 1e-9);
        assert!((Builtin::Sin.apply(90.0, AngleMode::Radians) - 0.893_996_663_6).abs() < 1e-6);
        assert!((Builtin::Cos.apply(180.0, AngleMode::Degrees) + 1.0).abs() < 1e-9);
        assert!((Builtin::Tan.apply(45.0, AngleMode::Degrees) - 1.0).abs() < 1e-9);
        // other functions ignore the mode
        assert_eq!(
            Builtin::Sqrt.apply(16.0, AngleMode::Degrees),
            Builtin::Sqrt.apply(16.0, AngleMode::Radians)
        );
    }

    #[test]
    fn logarithms() {
        assert!((Builtin::Log.apply(1000.0, AngleMode::Degrees) - 3.0).abs() < 1e-12);
        assert_eq!(Builtin::Ln.apply(1.0, AngleMode::Degrees), 0.0);
        assert!(Builtin::Sqrt.apply(-4.0, AngleMode::Degrees).is_nan());
    }

    #[test]
    fn angle_mode() {
        assert_eq!(AngleMode::default(), AngleMode::Degrees);
        assert_eq!(AngleMode::Degrees.toggled(), AngleMode::Radians);
        assert_eq!(AngleMode::Radians.toggled(), AngleMode::Degrees);
        assert_eq!("RAD".parse::<AngleMode>(), Ok(AngleMode::Radians));
        assert_eq!("degrees".parse::<AngleMode>(), Ok(AngleMode::Degrees));
        assert!("grad".parse::<AngleMode>().is_err());
        assert_eq!(AngleMode::Radians.to_string(), "RAD");
    }

    #[test]
    fn standard_bindings() {
        let bindings = Bindings::default();
        assert_eq!(bindings.get("PI"), Some(Binding::Constant(consts::PI)));
        assert_eq!(bindings.get("E"), Some(Binding::Constant(consts::E)));
        assert!(bindings.is_function("factorial"));
        assert!(!bindings.is_function("PI"));
        assert_eq!(bindings.get("x"), None);
        assert_eq!(bindings.get("Math"), None);
    }

    #[test]
    fn free_variable_is_reserved() {
        let mut bindings = Bindings::empty();
        assert_eq!(bindings.insert_constant("x", 2.0), None);
        assert_eq!(bindings.get("x"), None);
    }
}
