use crate::adn::Adn;
use crate::grid::Grid;

/// An evaluable Taylor approximant built from a univariate AD value.
///
/// From a value `z` of order `N` and an expansion point `at`, the
/// polynomial is
///
/// `p(x) = sum_{k=0}^{N} z.d(k) / k! * (x - at)^k`
///
/// — the factorial division happens here, once, because `d(k)` stores
/// raw derivatives. Evaluation is unrestricted in `x`; the approximant
/// simply loses accuracy away from `at`, which is inherent to the
/// truncated series rather than an error condition.
#[derive(Clone, Debug)]
pub struct TaylorPoly {
    /// Taylor coefficients, `d(k) / k!`.
    coeffs: Vec<f64>,
    at: f64,
}

/// Build the Taylor approximant of `z` around `at` (typically the
/// nominal of the independent variable `z` was derived from).
pub fn taylorfunc(z: &Adn, at: f64) -> TaylorPoly {
    TaylorPoly::new(z, at)
}

impl TaylorPoly {
    pub fn new(z: &Adn, at: f64) -> Self {
        let mut factorial = 1.;
        let coeffs = z
            .derivatives()
            .iter()
            .enumerate()
            .map(|(k, &d)| {
                if k > 0 {
                    factorial *= k as f64;
                }
                d / factorial
            })
            .collect();
        Self { coeffs, at }
    }

    /// Degree of the polynomial (the order of the source value).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn expansion_point(&self) -> f64 {
        self.at
    }

    /// Evaluate at a scalar point. Horner's scheme; at `x == at` every
    /// product vanishes and the result is exactly the order-0 entry.
    pub fn eval(&self, x: f64) -> f64 {
        let dx = x - self.at;
        self.coeffs
            .iter()
            .rev()
            .fold(0., |acc, &c| acc * dx + c)
    }

    /// Evaluate elementwise over a grid of points.
    pub fn eval_grid(&self, x: &Grid) -> Grid {
        x.map(|v| self.eval(v))
    }
}

#[test]
fn test_exact_at_expansion_point() {
    let x = crate::adn(1.3, 6);
    let z = &x.sin() * &x.exp();
    let p = taylorfunc(&z, 1.3);
    assert_eq!(p.eval(1.3), z.nom());
}

#[test]
fn test_quadratic_is_reproduced_exactly() {
    // A degree-2 polynomial equals its own order-2 Taylor expansion
    // everywhere, not just near the expansion point.
    let x = crate::adn(2., 2);
    let y = &(&x * &x) + &(&x * 3.);
    let p = taylorfunc(&y, 2.);
    for t in [-3., 0., 1.5, 10.] {
        assert!((p.eval(t) - (t * t + 3. * t)).abs() < 1e-12);
    }
}

#[test]
fn test_grid_eval_matches_scalar_eval() {
    let x = crate::adn(0.5, 4);
    let p = taylorfunc(&x.exp(), 0.5);
    let pts = Grid::vector(vec![0.4, 0.5, 0.6]);
    let vals = p.eval_grid(&pts);
    for (i, &t) in [0.4, 0.5, 0.6].iter().enumerate() {
        assert_eq!(vals[i], p.eval(t));
    }
}
