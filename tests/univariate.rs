use adnum::{adn, Adn};

#[test]
fn square_truncates_exactly() {
    let x = adn(1.5, 1);
    let y = &x * &x;
    assert_eq!(y.nom(), 2.25);
    assert_eq!(y.d(1), 3.0);

    let x = adn(1.5, 4);
    let y = &x * &x;
    assert_eq!(y.d(2), 2.0);
    assert_eq!(y.d(3), 0.0);
    assert_eq!(y.d(4), 0.0);
}

/// Central finite-difference estimate of the k-th derivative of `f`
/// at `x`, recursing on first differences.
fn finite_diff(f: &dyn Fn(f64) -> f64, x: f64, k: usize, h: f64) -> f64 {
    if k == 0 {
        f(x)
    } else {
        (finite_diff(f, x + h, k - 1, h) - finite_diff(f, x - h, k - 1, h)) / (2. * h)
    }
}

#[test]
fn derivatives_match_finite_differences() {
    let f = |x: f64| x.sin() * (x / 2.).exp() + 1. / (1. + x * x);
    let fad = |x: &Adn| &(&x.sin() * &(x / 2.).exp()) + &(1. / &(&(x * x) + 1.));

    let x0 = 0.8;
    let z = fad(&adn(x0, 3));
    assert_eq!(z.nom(), f(x0));
    for k in 1..=3 {
        // The estimate tightens as the step shrinks.
        let coarse = (finite_diff(&f, x0, k, 1e-2) - z.d(k)).abs();
        let fine = (finite_diff(&f, x0, k, 1e-3) - z.d(k)).abs();
        assert!(fine < coarse, "k = {k}: {fine} vs {coarse}");
        assert!(fine < 1e-4, "k = {k}: {fine}");
    }
}

#[test]
fn composed_elementary_functions() {
    // ln(sqrt(x)) has the derivatives of ln(x)/2.
    let x = adn(2.7, 5);
    let a = x.sqrt().ln();
    let b = &x.ln() / 2.;
    for k in 0..=5 {
        assert!((a.d(k) - b.d(k)).abs() < 1e-10, "k = {k}");
    }

    // cosh^2 - sinh^2 is constant 1 at every order.
    let c = &(&x.cosh() * &x.cosh()) - &(&x.sinh() * &x.sinh());
    assert!((c.nom() - 1.).abs() < 1e-9);
    for k in 1..=5 {
        assert!(c.d(k).abs() < 1e-7, "k = {k}: {}", c.d(k));
    }
}

#[test]
fn inverse_functions_restore_the_seed() {
    // atan(tan(x)) and asin(sin(x)) are the identity near 0.4.
    let x = adn(0.4, 4);
    for y in [x.tan().atan(), x.sin().asin(), x.exp().ln()] {
        assert!((y.nom() - 0.4).abs() < 1e-12);
        assert!((y.d(1) - 1.).abs() < 1e-10);
        for k in 2..=4 {
            assert!(y.d(k).abs() < 1e-8, "k = {k}: {}", y.d(k));
        }
    }
}

#[test]
fn real_power_handles_negative_base() {
    // (-x)^3 derivatives stay real where the log composition cannot go.
    let x = adn(-2., 3);
    let y = x.powf(3.);
    assert_eq!(y.nom(), -8.);
    assert_eq!(y.d(1), 12.);
    assert_eq!(y.d(2), -12.);
    assert_eq!(y.d(3), 6.);
}

#[test]
fn domain_edges_propagate_nan() {
    let x = adn(-1., 2);
    let y = x.sqrt();
    assert!(y.nom().is_nan());
    assert!(y.d(1).is_nan());

    let z = &adn(1., 2) / &Adn::constant(0., 2);
    assert!(z.nom().is_infinite());
}

#[test]
fn mixed_orders_are_rejected() {
    let a = adn(1., 2);
    let b = adn(1., 5);
    assert!(a.try_mul(&b).is_err());
    // An order-0 value is a plain constant and joins any order.
    let c = Adn::constant(3., 0);
    let y = a.try_mul(&c).unwrap();
    assert_eq!(y.order(), 2);
    assert_eq!(y.d(1), 3.);
}
