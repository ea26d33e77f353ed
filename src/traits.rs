use std::{fmt, ops};

use num_complex::Complex;
use num_traits::ToPrimitive;

pub trait Int: num_traits::PrimInt + fmt::Display + fmt::Debug {
    fn from_usize(i: usize) -> Self {
        match Self::from(i) {
            Some(j) => j,
            None => panic!("must be able to create Int from {}", i),
        }
    }

    /// Returns `None` for negative or out of range values.
    fn try_index(&self) -> Option<usize> {
        self.to_usize()
    }
}

impl Int for usize {}
impl Int for u32 {}
impl Int for u64 {}

impl Int for isize {}
impl Int for i32 {}
impl Int for i64 {}

pub trait Scalar:
    Copy
    + PartialEq
    + num_traits::Zero
    + num_traits::One
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + ops::Sub<Output = Self>
    + ops::AddAssign
    + ops::SubAssign
    + ops::MulAssign
    + ops::DivAssign
    + Norm<Self::Norm>
    + fmt::Display
    + fmt::Debug
{
    type Norm: PartialOrd + Copy + ToPrimitive + fmt::Display + fmt::Debug;

    #[cfg(feature = "debug")]
    fn pretty_string(&self, _config: pretty_dtoa::FmtFloatConfig) -> String {
        format!("{}", self)
    }
}

impl Scalar for f64 {
    type Norm = f64;

    #[cfg(feature = "debug")]
    fn pretty_string(&self, config: pretty_dtoa::FmtFloatConfig) -> String {
        pretty_dtoa::dtoa(*self, config)
    }
}

impl Scalar for f32 {
    type Norm = f32;

    #[cfg(feature = "debug")]
    fn pretty_string(&self, config: pretty_dtoa::FmtFloatConfig) -> String {
        pretty_dtoa::dtoa(*self as f64, config)
    }
}

impl Scalar for Complex<f64> {
    type Norm = f64;

    #[cfg(feature = "debug")]
    fn pretty_string(&self, config: pretty_dtoa::FmtFloatConfig) -> String {
        format!(
            "{}{}j{}",
            pretty_dtoa::dtoa(self.re, config),
            if self.im.signum() < 0.0 { "-" } else { "+" },
            pretty_dtoa::dtoa(self.im.abs(), config)
        )
    }
}

/// Magnitude used for pivot selection.
pub trait Norm<F> {
    fn norm(&self) -> F;
}

impl Norm<f64> for f64 {
    fn norm(&self) -> f64 {
        f64::abs(*self)
    }
}

impl Norm<f32> for f32 {
    fn norm(&self) -> f32 {
        f32::abs(*self)
    }
}

impl Norm<f64> for Complex<f64> {
    fn norm(&self) -> f64 {
        num_complex::Complex::norm(*self)
    }
}
