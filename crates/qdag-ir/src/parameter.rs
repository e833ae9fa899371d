//! Gate parameters: numeric values or symbolic expressions.
//!
//! Parameters are hashed and compared structurally so that they can key the
//! circuit's parameter table. Floating-point constants compare by bit
//! pattern, which keeps `Eq` and `Hash` consistent.

use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A numeric or symbolic gate parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Param {
    /// A numeric value.
    Value(f64),
    /// A named symbol.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<Param>),
    /// Sum.
    Add(Box<Param>, Box<Param>),
    /// Difference.
    Sub(Box<Param>, Box<Param>),
    /// Product.
    Mul(Box<Param>, Box<Param>),
    /// Quotient.
    Div(Box<Param>, Box<Param>),
}

impl Param {
    /// Create a numeric parameter.
    pub fn value(v: f64) -> Self {
        Param::Value(v)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        Param::Symbol(name.into())
    }

    /// Whether any symbol occurs in this parameter.
    pub fn is_symbolic(&self) -> bool {
        match self {
            Param::Value(_) | Param::Pi => false,
            Param::Symbol(_) => true,
            Param::Neg(p) => p.is_symbolic(),
            Param::Add(a, b) | Param::Sub(a, b) | Param::Mul(a, b) | Param::Div(a, b) => {
                a.is_symbolic() || b.is_symbolic()
            }
        }
    }

    /// Numeric value, if the parameter contains no symbols.
    ///
    /// Division by zero yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        Some(match self {
            Param::Value(v) => *v,
            Param::Symbol(_) => return None,
            Param::Pi => PI,
            Param::Neg(p) => -p.as_f64()?,
            Param::Add(a, b) => a.as_f64()? + b.as_f64()?,
            Param::Sub(a, b) => a.as_f64()? - b.as_f64()?,
            Param::Mul(a, b) => a.as_f64()? * b.as_f64()?,
            Param::Div(a, b) => {
                let d = b.as_f64()?;
                if d == 0.0 {
                    return None;
                }
                a.as_f64()? / d
            }
        })
    }

    /// Names of all symbols, sorted.
    pub fn symbols(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.visit_symbols(&mut |s| {
            out.insert(s);
        });
        out
    }

    fn visit_symbols<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Param::Value(_) | Param::Pi => {}
            Param::Symbol(s) => f(s),
            Param::Neg(p) => p.visit_symbols(f),
            Param::Add(a, b) | Param::Sub(a, b) | Param::Mul(a, b) | Param::Div(a, b) => {
                a.visit_symbols(f);
                b.visit_symbols(f);
            }
        }
    }

    /// Substitute `value` for every occurrence of the symbol `name`.
    ///
    /// Subexpressions that become fully numeric are folded to a single value.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        let bound = match self {
            Param::Symbol(s) if s == name => return Param::Value(value),
            Param::Value(_) | Param::Pi | Param::Symbol(_) => return self.clone(),
            Param::Neg(p) => Param::Neg(Box::new(p.bind(name, value))),
            Param::Add(a, b) => Param::Add(
                Box::new(a.bind(name, value)),
                Box::new(b.bind(name, value)),
            ),
            Param::Sub(a, b) => Param::Sub(
                Box::new(a.bind(name, value)),
                Box::new(b.bind(name, value)),
            ),
            Param::Mul(a, b) => Param::Mul(
                Box::new(a.bind(name, value)),
                Box::new(b.bind(name, value)),
            ),
            Param::Div(a, b) => Param::Div(
                Box::new(a.bind(name, value)),
                Box::new(b.bind(name, value)),
            ),
        };
        match bound.as_f64() {
            Some(v) => Param::Value(v),
            None => bound,
        }
    }

    /// Approximate equality of two numeric parameters, in units of turns.
    ///
    /// Angles that differ by a whole number of turns (multiples of 2π) are
    /// considered equal. Symbolic parameters compare structurally.
    pub fn approx_eq_turn(&self, other: &Param, tol: f64) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => {
                let turns = (a - b) / (2.0 * PI);
                (turns - turns.round()).abs() * 2.0 * PI <= tol
            }
            (None, None) => self == other,
            _ => false,
        }
    }

    fn discriminant(&self) -> u8 {
        match self {
            Param::Value(_) => 0,
            Param::Symbol(_) => 1,
            Param::Pi => 2,
            Param::Neg(_) => 3,
            Param::Add(..) => 4,
            Param::Sub(..) => 5,
            Param::Mul(..) => 6,
            Param::Div(..) => 7,
        }
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Param::Value(a), Param::Value(b)) => a.to_bits() == b.to_bits(),
            (Param::Symbol(a), Param::Symbol(b)) => a == b,
            (Param::Pi, Param::Pi) => true,
            (Param::Neg(a), Param::Neg(b)) => a == b,
            (Param::Add(a1, b1), Param::Add(a2, b2))
            | (Param::Sub(a1, b1), Param::Sub(a2, b2))
            | (Param::Mul(a1, b1), Param::Mul(a2, b2))
            | (Param::Div(a1, b1), Param::Div(a2, b2)) => a1 == a2 && b1 == b2,
            _ => false,
        }
    }
}

impl Eq for Param {}

impl Hash for Param {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.discriminant().hash(state);
        match self {
            Param::Value(v) => v.to_bits().hash(state),
            Param::Symbol(s) => s.hash(state),
            Param::Pi => {}
            Param::Neg(p) => p.hash(state),
            Param::Add(a, b) | Param::Sub(a, b) | Param::Mul(a, b) | Param::Div(a, b) => {
                a.hash(state);
                b.hash(state);
            }
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(v) => write!(f, "{v}"),
            Param::Symbol(s) => write!(f, "{s}"),
            Param::Pi => write!(f, "π"),
            Param::Neg(p) => write!(f, "-({p})"),
            Param::Add(a, b) => write!(f, "({a} + {b})"),
            Param::Sub(a, b) => write!(f, "({a} - {b})"),
            Param::Mul(a, b) => write!(f, "({a} * {b})"),
            Param::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Value(v)
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Param::Symbol(name.to_string())
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl std::ops::$trait for Param {
            type Output = Param;

            fn $method(self, rhs: Param) -> Param {
                Param::$variant(Box::new(self), Box::new(rhs))
            }
        }
    };
}

impl_binop!(Add, add, Add);
impl_binop!(Sub, sub, Sub);
impl_binop!(Mul, mul, Mul);
impl_binop!(Div, div, Div);

impl std::ops::Neg for Param {
    type Output = Param;

    fn neg(self) -> Param {
        Param::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_numeric_and_symbolic() {
        assert!(!Param::value(1.5).is_symbolic());
        assert_eq!(Param::Pi.as_f64(), Some(PI));

        let t = Param::symbol("t1") - Param::symbol("t2");
        assert!(t.is_symbolic());
        assert_eq!(t.as_f64(), None);
        assert_eq!(t.symbols().into_iter().collect::<Vec<_>>(), ["t1", "t2"]);
    }

    #[test]
    fn test_bind_folds_constants() {
        let p = Param::symbol("theta") * Param::value(2.0);
        assert_eq!(p.bind("theta", 0.25), Param::Value(0.5));
        assert_eq!(p.bind("phi", 0.25), p);
    }

    #[test]
    fn test_structural_hash() {
        let mut set = FxHashSet::default();
        set.insert(Param::symbol("t1"));
        set.insert(Param::symbol("t2"));
        set.insert(Param::symbol("t1") - Param::symbol("t2"));
        set.insert(Param::symbol("t1"));
        assert_eq!(set.len(), 3);
        assert_ne!(Param::value(0.0), Param::value(-0.0));
    }

    #[test]
    fn test_approx_eq_turn() {
        let a = Param::value(0.1);
        let b = Param::value(0.1 + 2.0 * PI);
        assert!(a.approx_eq_turn(&b, 1e-9));
        assert!(!a.approx_eq_turn(&Param::value(0.2), 1e-9));
        assert!(Param::symbol("x").approx_eq_turn(&Param::symbol("x"), 1e-9));
        assert!(!Param::symbol("x").approx_eq_turn(&Param::value(0.0), 1e-9));
    }
}
