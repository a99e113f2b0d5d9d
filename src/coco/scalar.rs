//! Numbers copied from label files.
//!
//! Box coordinates in manifests and sequence labels are written either as
//! integers (`10`) or as decimals (`10.4`). `Scalar` keeps whichever form was
//! read so the output repeats it: `10` stays `10` and `10.0` stays `10.0`.

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

/// An integer or floating-point JSON number.
///
/// Equality is structural: `Int(5)` and `Float(5.0)` differ because they
/// serialize differently. Compare [`Scalar::as_f64`] for numeric equality.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl Scalar {
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Int(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

/// Integer products stay integers unless they overflow; anything involving a
/// float is a float.
impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        match (self, rhs) {
            (Scalar::Int(a), Scalar::Int(b)) => match a.checked_mul(b) {
                Some(product) => Scalar::Int(product),
                None => Scalar::Float(a as f64 * b as f64),
            },
            (a, b) => Scalar::Float(a.as_f64() * b.as_f64()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v:?}"),
        }
    }
}
