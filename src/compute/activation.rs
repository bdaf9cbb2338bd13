//! Activation functions applied elementwise after convolution.
//!
//! The catalog is a closed enum; [`Activation::eval`] switches on it. Several
//! entries are undefined or divergent outside (0, 1] (sqrt, ln, the inverse
//! powers, arcsin and arccos beyond [-1, 1]). They return NaN or infinity
//! there and the resulting speckle is left to show on screen.

use std::f32::consts::PI;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Field;

/// sqrt(2 / pi), for the tanh approximation of GELU.
const GELU_COEFF: f32 = 0.797_884_6;

/// Named scalar nonlinearity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Identity,
    Relu,
    Gelu,
    Abs,
    Sin,
    SinPi,
    Tanh,
    Atan,
    /// floor(8x) / 8
    Bitcrush,
    /// 1 - 2^(-x^2)
    InverseGaussian,
    #[default]
    Arcsin,
    Cos,
    CosPi,
    Sqrt,
    Exp,
    /// 1 / x^2
    InverseSquare,
    /// 1 / x^3
    InverseCube,
    Arccos,
    Ln,
}

impl Activation {
    /// Every activation, in cycling order.
    pub const ALL: [Activation; 19] = [
        Activation::Identity,
        Activation::Relu,
        Activation::Gelu,
        Activation::Abs,
        Activation::Sin,
        Activation::SinPi,
        Activation::Tanh,
        Activation::Atan,
        Activation::Bitcrush,
        Activation::InverseGaussian,
        Activation::Arcsin,
        Activation::Cos,
        Activation::CosPi,
        Activation::Sqrt,
        Activation::Exp,
        Activation::InverseSquare,
        Activation::InverseCube,
        Activation::Arccos,
        Activation::Ln,
    ];

    /// Evaluate the function at `x`.
    #[inline]
    pub fn eval(self, x: f32) -> f32 {
        match self {
            Activation::Identity => x,
            Activation::Relu => x.max(0.0),
            Activation::Gelu => 0.5 * x * (1.0 + (GELU_COEFF * (x + 0.044715 * x * x * x)).tanh()),
            Activation::Abs => x.abs(),
            Activation::Sin => x.sin(),
            Activation::SinPi => (PI * x).sin(),
            Activation::Tanh => x.tanh(),
            Activation::Atan => x.atan(),
            Activation::Bitcrush => (x * 8.0).floor() / 8.0,
            Activation::InverseGaussian => 1.0 - (-(x * x)).exp2(),
            Activation::Arcsin => x.asin(),
            Activation::Cos => x.cos(),
            Activation::CosPi => (PI * x).cos(),
            Activation::Sqrt => x.sqrt(),
            Activation::Exp => x.exp(),
            Activation::InverseSquare => 1.0 / (x * x),
            Activation::InverseCube => 1.0 / (x * x * x),
            Activation::Arccos => x.acos(),
            Activation::Ln => x.ln(),
        }
    }

    /// Input interval on which the function is guaranteed finite.
    pub fn safe_domain(self) -> RangeInclusive<f32> {
        match self {
            Activation::Arcsin | Activation::Arccos => -1.0..=1.0,
            Activation::Sqrt => 0.0..=1.0,
            Activation::Ln | Activation::InverseSquare | Activation::InverseCube => 1e-6..=1.0,
            Activation::Exp => -1.0..=1.0,
            _ => -4.0..=4.0,
        }
    }

    /// Identifier used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Activation::Identity => "identity",
            Activation::Relu => "relu",
            Activation::Gelu => "gelu",
            Activation::Abs => "abs",
            Activation::Sin => "sin",
            Activation::SinPi => "sin_pi",
            Activation::Tanh => "tanh",
            Activation::Atan => "atan",
            Activation::Bitcrush => "bitcrush",
            Activation::InverseGaussian => "inverse_gaussian",
            Activation::Arcsin => "arcsin",
            Activation::Cos => "cos",
            Activation::CosPi => "cos_pi",
            Activation::Sqrt => "sqrt",
            Activation::Exp => "exp",
            Activation::InverseSquare => "inverse_square",
            Activation::InverseCube => "inverse_cube",
            Activation::Arccos => "arccos",
            Activation::Ln => "ln",
        }
    }

    /// Step `offset` places through [`Activation::ALL`], wrapping at both ends.
    pub fn cycle(self, offset: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let pos = Self::ALL.iter().position(|&a| a == self).unwrap_or(0) as i32;
        Self::ALL[(pos + offset).rem_euclid(len) as usize]
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown activation identifier.
#[derive(Debug, thiserror::Error)]
#[error("Unknown activation '{0}'")]
pub struct UnknownActivation(pub String);

impl FromStr for Activation {
    type Err = UnknownActivation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownActivation(s.to_string()))
    }
}

/// Apply an activation to every channel of every pixel in place.
///
/// Channels are independent; there is no cross-channel interaction.
pub fn activate_field_inplace(field: &mut Field, activation: Activation) {
    for plane in &mut field.channels {
        activate_inplace(plane, activation);
    }
}

fn activate_inplace(grid: &mut [f32], activation: Activation) {
    for v in grid.iter_mut() {
        *v = activation.eval(*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_arcsin() {
        assert_eq!(Activation::default(), Activation::Arcsin);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(Activation::Relu.eval(-0.3), 0.0);
        assert_eq!(Activation::Bitcrush.eval(0.3), 0.25);
        assert_eq!(Activation::Bitcrush.eval(1.0), 1.0);
        assert_eq!(Activation::InverseGaussian.eval(0.0), 0.0);
        assert!((Activation::InverseGaussian.eval(1.0) - 0.5).abs() < 1e-6);
        assert!((Activation::SinPi.eval(0.5) - 1.0).abs() < 1e-6);
        assert!((Activation::CosPi.eval(1.0) + 1.0).abs() < 1e-6);
        assert!((Activation::Arcsin.eval(1.0) - PI / 2.0).abs() < 1e-6);
        assert_eq!(Activation::InverseSquare.eval(0.5), 4.0);
        assert_eq!(Activation::InverseCube.eval(0.5), 8.0);
        assert!(Activation::Gelu.eval(3.0) > 2.9);
        assert!(Activation::Gelu.eval(-3.0).abs() < 0.01);
    }

    #[test]
    fn test_domain_violations_are_not_clamped() {
        assert!(Activation::Sqrt.eval(-1.0).is_nan());
        assert!(Activation::Ln.eval(-1.0).is_nan());
        assert_eq!(Activation::Ln.eval(0.0), f32::NEG_INFINITY);
        assert!(Activation::Arcsin.eval(1.5).is_nan());
        assert!(Activation::Arccos.eval(-2.0).is_nan());
        assert_eq!(Activation::InverseSquare.eval(0.0), f32::INFINITY);
    }

    #[test]
    fn test_name_roundtrip() {
        for a in Activation::ALL {
            assert_eq!(a.name().parse::<Activation>().unwrap(), a);
            let json = serde_json::to_string(&a).unwrap();
            assert_eq!(json, format!("\"{}\"", a.name()));
        }
        assert!("softmax".parse::<Activation>().is_err());
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Activation::Identity.cycle(-1), Activation::Ln);
        assert_eq!(Activation::Ln.cycle(1), Activation::Identity);
        assert_eq!(Activation::Arcsin.cycle(1), Activation::Cos);
        assert_eq!(Activation::Tanh.cycle(19), Activation::Tanh);
    }

    #[test]
    fn test_activate_field_per_channel() {
        let mut field = Field::zeros(2, 1);
        field.set_pixel(0, 0, [-1.0, 0.0, 2.0]);
        field.set_pixel(1, 0, [0.5, -0.25, -3.0]);

        activate_field_inplace(&mut field, Activation::Abs);
        assert_eq!(field.pixel(0, 0), [1.0, 0.0, 2.0]);
        assert_eq!(field.pixel(1, 0), [0.5, 0.25, 3.0]);

        activate_field_inplace(&mut field, Activation::Bitcrush);
        assert_eq!(field.pixel(1, 0), [0.5, 0.25, 3.0]);
    }

    #[test]
    fn test_activate_field_keeps_nan() {
        let mut field = Field::filled(2, 2, -0.5);
        activate_field_inplace(&mut field, Activation::Sqrt);
        assert!(field.channels.iter().flatten().all(|v| v.is_nan()));
    }

    proptest! {
        #[test]
        fn prop_finite_on_safe_domain(index in 0usize..Activation::ALL.len(), t in 0.0f32..=1.0) {
            let activation = Activation::ALL[index];
            let domain = activation.safe_domain();
            let x = domain.start() + (domain.end() - domain.start()) * t;
            let x = x.clamp(*domain.start(), *domain.end());
            let y = activation.eval(x);
            prop_assert!(y.is_finite(), "{} at {} gave {}", activation, x, y);
        }
    }
}
