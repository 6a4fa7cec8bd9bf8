use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::ad::Ad;
use crate::adn::Adn;
use crate::grid::Grid;

/// The arithmetic seam for numeric algorithms that should run on plain
/// reals and AD values alike.
///
/// Decompositions, linear solves and similar routines written against
/// this trait work unmodified whether their elements track derivatives
/// or not — the operators below are defined consistently across `f64`,
/// [`Adn`] and [`Ad`]. The bound set is the minimum those algorithms
/// need; there is no open-ended numeric-type registry behind it.
pub trait Scalar:
    Sized
    + Clone
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(v: f64) -> Self;
    /// Magnitude, for pivot selection.
    fn abs(&self) -> Self;
    /// Square root, for Cholesky-style factorizations.
    fn sqrt(&self) -> Self;
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.
    }

    fn one() -> Self {
        1.
    }

    fn from_f64(v: f64) -> Self {
        v
    }

    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    fn sqrt(&self) -> Self {
        f64::sqrt(*self)
    }
}

impl Scalar for Adn {
    fn zero() -> Self {
        Adn::constant(0., 0)
    }

    fn one() -> Self {
        Adn::constant(1., 0)
    }

    fn from_f64(v: f64) -> Self {
        Adn::constant(v, 0)
    }

    fn abs(&self) -> Self {
        Adn::abs(self)
    }

    fn sqrt(&self) -> Self {
        Adn::sqrt(self)
    }
}

impl Scalar for Ad {
    fn zero() -> Self {
        Ad::constant(Grid::scalar(0.))
    }

    fn one() -> Self {
        Ad::constant(Grid::scalar(1.))
    }

    fn from_f64(v: f64) -> Self {
        Ad::constant(Grid::scalar(v))
    }

    fn abs(&self) -> Self {
        Ad::abs(self)
    }

    fn sqrt(&self) -> Self {
        Ad::sqrt(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A routine written for plain numbers, run on AD values unchanged.
    fn sum_of_squares<T: Scalar>(values: &[T]) -> T {
        values
            .iter()
            .fold(T::zero(), |acc, v| acc + v.clone() * v.clone())
    }

    #[test]
    fn generic_algorithm_runs_on_every_kind() {
        assert_eq!(sum_of_squares(&[3.0f64, 4.0]), 25.);

        let x = crate::adn(3., 2);
        let s = sum_of_squares(&[x.clone(), Adn::from_f64(4.)]);
        assert_eq!(s.nom(), 25.);
        assert_eq!(s.d(1), 6.);
        assert_eq!(s.d(2), 2.);

        let g = crate::ad([3., 4.]);
        let s = sum_of_squares(&[g.at(0).unwrap(), g.at(1).unwrap()]);
        assert_eq!(s.nom().as_scalar(), Some(25.));
        assert_eq!(s.d1(), Grid::vector(vec![6., 8.]));
    }
}
