use adnum::{adn, taylorfunc, Grid};
use approx::assert_relative_eq;

#[test]
fn exact_at_the_expansion_point() {
    for (x0, order) in [(0.0, 1), (1.3, 4), (-2.7, 9)] {
        let x = adn(x0, order);
        let z = &(&x.sin() + &x.cosh()) * &(&x / 3.).exp();
        let p = taylorfunc(&z, x0);
        assert_eq!(p.eval(x0), z.nom());
        assert_eq!(p.degree(), order);
    }
}

#[test]
fn accuracy_improves_with_order() {
    // Near the expansion point higher orders approximate exp better.
    let x0 = 1.0;
    let target = 1.4f64.exp();
    let mut last_err = f64::INFINITY;
    for order in [1, 3, 5, 7] {
        let z = adn(x0, order).exp();
        let err = (taylorfunc(&z, x0).eval(1.4) - target).abs();
        assert!(err < last_err, "order {order}: {err} vs {last_err}");
        last_err = err;
    }
    assert!(last_err < 1e-6);
}

#[test]
fn coefficients_are_rescaled_raw_derivatives() {
    // exp at 0: raw derivatives all 1, Taylor coefficients 1/k!.
    let z = adn(0., 4).exp();
    let p = taylorfunc(&z, 0.);
    // p(1) = 1 + 1 + 1/2 + 1/6 + 1/24
    assert_relative_eq!(p.eval(1.), 65. / 24., max_relative = 1e-12);
}

#[test]
fn far_evaluation_degrades_but_never_fails() {
    let z = adn(0., 3).sin();
    let p = taylorfunc(&z, 0.);
    // x - x^3/6 is a poor sine far out, yet still a finite value.
    let far = p.eval(10.);
    assert!(far.is_finite());
    assert!((far - 10f64.sin()).abs() > 1.);
}

#[test]
fn grid_evaluation_is_elementwise() {
    let z = adn(0.5, 6).ln();
    let p = taylorfunc(&z, 0.5);
    let pts = Grid::vector(vec![0.45, 0.5, 0.55]);
    let vals = p.eval_grid(&pts);
    assert_eq!(vals.shape(), &[3]);
    for i in 0..3 {
        assert_relative_eq!(vals[i], p.eval(pts[i]), max_relative = 1e-15);
        assert_relative_eq!(vals[i], pts[i].ln(), max_relative = 1e-6);
    }
}
