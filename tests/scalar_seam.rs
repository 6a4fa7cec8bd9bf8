//! A linear solver written once against [`Scalar`] and exercised on
//! plain floats, high-order univariate values and multivariate sessions.

use adnum::{ad, adn, Ad, Scalar};
use approx::assert_relative_eq;

/// Gaussian elimination with partial pivoting. Knows nothing about
/// derivatives; pivot selection goes through `Scalar::abs` and the
/// nominal-value ordering.
fn solve<T: Scalar>(mut a: Vec<Vec<T>>, mut b: Vec<T>) -> Vec<T> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let f = a[row][col].clone() / a[col][col].clone();
            for k in col..n {
                a[row][k] = a[row][k].clone() - f.clone() * a[col][k].clone();
            }
            b[row] = b[row].clone() - f.clone() * b[col].clone();
        }
    }
    let mut x = vec![T::zero(); n];
    for row in (0..n).rev() {
        let mut s = b[row].clone();
        for k in row + 1..n {
            s = s - a[row][k].clone() * x[k].clone();
        }
        x[row] = s / a[row][row].clone();
    }
    x
}

#[test]
fn plain_float_baseline() {
    // Forces a pivot swap in the first column.
    let a = vec![
        vec![2., 1., -1.],
        vec![-3., -1., 2.],
        vec![-2., 1., 2.],
    ];
    let b = vec![8., -11., -3.];
    let x = solve(a, b);
    assert_relative_eq!(x[0], 2., max_relative = 1e-12);
    assert_relative_eq!(x[1], 3., max_relative = 1e-12);
    assert_relative_eq!(x[2], -1., max_relative = 1e-12);
}

#[test]
fn univariate_solution_curvature() {
    // [t 1; 1 1] x = [1; 0] has x0 = 1/(t - 1), so the solver run on
    // order-2 values should report the first two derivatives of that
    // rational function.
    let t = adn(3., 2);
    let one = <adnum::Adn as Scalar>::one();
    let a = vec![vec![t.clone(), one.clone()], vec![one.clone(), one.clone()]];
    let b = vec![one, <adnum::Adn as Scalar>::zero()];
    let x = solve(a, b);

    assert_relative_eq!(x[0].nom(), 0.5, max_relative = 1e-12);
    assert_relative_eq!(x[0].d(1), -0.25, max_relative = 1e-12);
    assert_relative_eq!(x[0].d(2), 0.25, max_relative = 1e-12);
    // x1 = -x0 along the whole curve.
    assert_relative_eq!(x[1].nom(), -0.5, max_relative = 1e-12);
    assert_relative_eq!(x[1].d(1), 0.25, max_relative = 1e-12);
}

#[test]
fn multivariate_solution_sensitivities() {
    // [a 1; 1 b] x = [1; 0]: x0 = b/(ab - 1), x1 = -1/(ab - 1).
    let theta = ad([4., 1.]);
    let a = theta.at(0).unwrap();
    let b = theta.at(1).unwrap();
    let one = <Ad as Scalar>::one();

    let x = solve(
        vec![vec![a, one.clone()], vec![one.clone(), b]],
        vec![one, <Ad as Scalar>::zero()],
    );

    // det = 3 at (a, b) = (4, 1).
    assert_relative_eq!(x[0].nom().as_scalar().unwrap(), 1. / 3., max_relative = 1e-12);
    assert_relative_eq!(x[1].nom().as_scalar().unwrap(), -1. / 3., max_relative = 1e-12);

    // d x0 / d a = -b^2 / det^2, d x0 / d b = -1 / det^2.
    let dx0 = x[0].d1();
    assert_relative_eq!(dx0[0], -1. / 9., max_relative = 1e-12);
    assert_relative_eq!(dx0[1], -1. / 9., max_relative = 1e-12);
    // d x1 / d a = b / det^2, d x1 / d b = a / det^2.
    let dx1 = x[1].d1();
    assert_relative_eq!(dx1[0], 1. / 9., max_relative = 1e-12);
    assert_relative_eq!(dx1[1], 4. / 9., max_relative = 1e-12);
}

#[test]
fn sensitivities_match_finite_differences() {
    fn solve_f64(a: f64, b: f64) -> Vec<f64> {
        solve(vec![vec![a, 1.], vec![1., b]], vec![1., 0.])
    }

    let (a0, b0) = (4., 1.);
    let theta = ad([a0, b0]);
    let x = solve(
        vec![
            vec![theta.at(0).unwrap(), <Ad as Scalar>::one()],
            vec![<Ad as Scalar>::one(), theta.at(1).unwrap()],
        ],
        vec![<Ad as Scalar>::one(), <Ad as Scalar>::zero()],
    );

    let h = 1e-6;
    for out in 0..2 {
        let da = (solve_f64(a0 + h, b0)[out] - solve_f64(a0 - h, b0)[out]) / (2. * h);
        let db = (solve_f64(a0, b0 + h)[out] - solve_f64(a0, b0 - h)[out]) / (2. * h);
        let d = x[out].d1();
        assert_relative_eq!(d[0], da, max_relative = 1e-6);
        assert_relative_eq!(d[1], db, max_relative = 1e-6);
    }
}
