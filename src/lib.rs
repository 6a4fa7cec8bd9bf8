//! Forward-mode automatic differentiation.
//!
//! Two kinds of AD value are provided:
//!
//! - [`Adn`] tracks one input to an arbitrary, fixed derivative order:
//!   every arithmetic operator and elementary function propagates the
//!   whole raw-derivative sequence through the Taylor/Leibniz
//!   recurrences, so `z.d(k)` is the exact k-th derivative of the
//!   composed expression.
//! - [`Ad`] tracks first-order partials with respect to several
//!   independent variables at once, over scalar or grid-shaped
//!   nominals, with explicit trailing-dimension broadcasting.
//!
//! Seed variables with [`adn`] (univariate) or [`ad`] (multivariate),
//! compose expressions with ordinary operators and the elementary
//! functions, then read derivatives back with `d(k)`/`d1()`, assemble
//! a Jacobian with [`jacobian`] or [`unite`], or turn a univariate
//! value into an evaluable approximant with [`taylorfunc`].
//!
//! ```
//! use adnum::{ad, adn, jacobian};
//!
//! let x = adn(1.5, 4);
//! let y = &x * &x;
//! assert_eq!((y.nom(), y.d(1), y.d(2)), (2.25, 3.0, 2.0));
//!
//! let v = ad([-1.0, 2.1, 0.25]);
//! let z = &v.at(0).unwrap() * &(&v.at(1).unwrap() * &v.at(2).unwrap()).sin();
//! let j = jacobian(&[z]).unwrap();
//! assert_eq!(j.shape(), &[1, 3]);
//! ```

mod ad;
mod adn;
pub mod error;
mod grid;
mod recurrence;
mod rules;
mod scalar;
mod taylor;

pub use ad::{ad, ad_with, jacobian, unite, Ad};
pub use adn::{adn, Adn};
pub use error::AdError;
pub use grid::Grid;
pub use scalar::Scalar;
pub use taylor::{taylorfunc, TaylorPoly};
