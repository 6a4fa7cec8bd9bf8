//! Order-by-order Taylor recurrences over raw-derivative sequences.
//!
//! A sequence `f` of length `N + 1` holds the raw derivatives
//! `f(x), f'(x), ..., f^(N)(x)` at one point, *not* divided by `k!`.
//! In this convention the product rule is the binomial-weighted Leibniz
//! convolution, and every elementary function reduces to its governing
//! first-order ODE differentiated `k - 1` times by the same rule and
//! solved for the unknown top coefficient. The two shapes that ODE can
//! take are implemented once as [`chain_step`] (`c' = u * g'`) and
//! [`chain_solve`] (`c' * w = g'`); each function only supplies its
//! companion sequence `u` or `w` and its order-0 seed.

/// Binomial coefficient. Division is interleaved with multiplication:
/// after step `i` the accumulator is exactly `C(n, i + 1)`, so every
/// division is even and the intermediate never exceeds the result.
pub(crate) fn choose(n: usize, k: usize) -> usize {
    assert!(k <= n);
    let mut res = 1;
    for i in 0..k {
        res = res * (n - i) / (i + 1);
    }
    res
}

/// The Leibniz convolution `(a * b)^(k) = sum_j C(k, j) a[j] b[k-j]`.
pub(crate) fn leibniz(a: &[f64], b: &[f64], k: usize) -> f64 {
    (0..=k)
        .map(|j| choose(k, j) as f64 * a[j] * b[k - j])
        .sum()
}

/// The k-th raw derivative of `c` where `c' = u * g'`, for `k >= 1`:
/// `c[k] = (u * g')^(k-1) = sum_{j<k} C(k-1, j) u[j] g[k-j]`.
///
/// Only `u[0..k]` is read, so a companion sequence that itself depends
/// on `c` may be filled in alongside `c` one order at a time.
pub(crate) fn chain_step(u: &[f64], g: &[f64], k: usize) -> f64 {
    (0..k)
        .map(|j| choose(k - 1, j) as f64 * u[j] * g[k - j])
        .sum()
}

/// Solve `c' * w = g'` for the k-th raw derivative of `c`, `k >= 1`,
/// given all lower orders of `c`:
/// `c[k] = (g[k] - sum_{j<k-1} C(k-1, j) c[j+1] w[k-1-j]) / w[0]`.
pub(crate) fn chain_solve(w: &[f64], g: &[f64], c: &[f64], k: usize) -> f64 {
    let known: f64 = (0..k.saturating_sub(1))
        .map(|j| choose(k - 1, j) as f64 * c[j + 1] * w[k - 1 - j])
        .sum();
    (g[k] - known) / w[0]
}

pub(crate) fn mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    (0..a.len()).map(|k| leibniz(a, b, k)).collect()
}

/// Forward substitution on `b * c = a`.
pub(crate) fn div(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut c = vec![0.; a.len()];
    for k in 0..a.len() {
        let known: f64 = (1..=k)
            .map(|j| choose(k, j) as f64 * b[j] * c[k - j])
            .sum();
        c[k] = (a[k] - known) / b[0];
    }
    c
}

/// Real-exponent power `c = g^p`, from the ODE `c' * g = p * c * g'`
/// expanded by the Leibniz rule and solved order by order. Unlike the
/// `exp(p * ln g)` composition this stays valid for negative bases.
pub(crate) fn powf(g: &[f64], p: f64) -> Vec<f64> {
    let mut c = vec![0.; g.len()];
    c[0] = g[0].powf(p);
    for k in 1..g.len() {
        // Differentiated k-1 times, the left side takes the chain_solve
        // shape with w = g and the right side is a plain chain_step.
        let known: f64 = (0..k - 1)
            .map(|j| choose(k - 1, j) as f64 * c[j + 1] * g[k - 1 - j])
            .sum();
        c[k] = (p * chain_step(&c, g, k) - known) / g[0];
    }
    c
}

pub(crate) fn exp(g: &[f64]) -> Vec<f64> {
    let mut c = vec![0.; g.len()];
    c[0] = g[0].exp();
    for k in 1..g.len() {
        c[k] = chain_step(&c, g, k);
    }
    c
}

/// `sin(g)` and `cos(g)` through their coupled ODE pair.
pub(crate) fn sin_cos(g: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut s = vec![0.; g.len()];
    let mut c = vec![0.; g.len()];
    s[0] = g[0].sin();
    c[0] = g[0].cos();
    for k in 1..g.len() {
        s[k] = chain_step(&c, g, k);
        c[k] = -chain_step(&s, g, k);
    }
    (s, c)
}

/// `sinh(g)` and `cosh(g)`; same pair as `sin`/`cos` without the sign.
pub(crate) fn sinh_cosh(g: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut sh = vec![0.; g.len()];
    let mut ch = vec![0.; g.len()];
    sh[0] = g[0].sinh();
    ch[0] = g[0].cosh();
    for k in 1..g.len() {
        sh[k] = chain_step(&ch, g, k);
        ch[k] = chain_step(&sh, g, k);
    }
    (sh, ch)
}

pub(crate) fn ln(g: &[f64]) -> Vec<f64> {
    let mut c = vec![0.; g.len()];
    c[0] = g[0].ln();
    for k in 1..g.len() {
        c[k] = chain_solve(g, g, &c, k);
    }
    c
}

/// `c = sqrt(g)` from `c * c = g`; the unknown appears twice in the
/// Leibniz expansion, once at each end.
pub(crate) fn sqrt(g: &[f64]) -> Vec<f64> {
    let mut c = vec![0.; g.len()];
    c[0] = g[0].sqrt();
    for k in 1..g.len() {
        let known: f64 = (1..k)
            .map(|j| choose(k, j) as f64 * c[j] * c[k - j])
            .sum();
        c[k] = (g[k] - known) / (2. * c[0]);
    }
    c
}

/// `tan(g)` via `c' = (1 + c^2) * g'`, the companion `1 + c^2` filled
/// in one order behind `c`.
pub(crate) fn tan(g: &[f64]) -> Vec<f64> {
    let mut c = vec![0.; g.len()];
    let mut u = vec![0.; g.len()];
    c[0] = g[0].tan();
    u[0] = 1. + c[0] * c[0];
    for k in 1..g.len() {
        c[k] = chain_step(&u, g, k);
        u[k] = leibniz(&c, &c, k);
    }
    c
}

/// `tanh(g)` via `c' = (1 - c^2) * g'`.
pub(crate) fn tanh(g: &[f64]) -> Vec<f64> {
    let mut c = vec![0.; g.len()];
    let mut u = vec![0.; g.len()];
    c[0] = g[0].tanh();
    u[0] = 1. - c[0] * c[0];
    for k in 1..g.len() {
        c[k] = chain_step(&u, g, k);
        u[k] = -leibniz(&c, &c, k);
    }
    c
}

/// `1 - g^2` (asin/acos companion input) or `1 + g^2` (atan).
fn one_plus_scaled_square(g: &[f64], sign: f64) -> Vec<f64> {
    let mut q = mul(g, g);
    for v in q.iter_mut() {
        *v *= sign;
    }
    q[0] += 1.;
    q
}

pub(crate) fn asin(g: &[f64]) -> Vec<f64> {
    // c' * sqrt(1 - g^2) = g'
    let w = sqrt(&one_plus_scaled_square(g, -1.));
    let mut c = vec![0.; g.len()];
    c[0] = g[0].asin();
    for k in 1..g.len() {
        c[k] = chain_solve(&w, g, &c, k);
    }
    c
}

pub(crate) fn acos(g: &[f64]) -> Vec<f64> {
    let mut c = asin(g);
    c[0] = g[0].acos();
    for v in c[1..].iter_mut() {
        *v = -*v;
    }
    c
}

pub(crate) fn atan(g: &[f64]) -> Vec<f64> {
    // c' * (1 + g^2) = g'
    let w = one_plus_scaled_square(g, 1.);
    let mut c = vec![0.; g.len()];
    c[0] = g[0].atan();
    for k in 1..g.len() {
        c[k] = chain_solve(&w, g, &c, k);
    }
    c
}

/// Derivatives follow the sign of the nominal; at zero the kink is
/// resolved toward the positive branch like `f64::signum`.
pub(crate) fn abs(g: &[f64]) -> Vec<f64> {
    let sign = g[0].signum();
    let mut c: Vec<f64> = g.iter().map(|&v| sign * v).collect();
    c[0] = g[0].abs();
    c
}

#[test]
fn test_choose() {
    assert_eq!(choose(0, 0), 1);
    assert_eq!(choose(2, 1), 2);
    assert_eq!(choose(3, 2), 3);
    assert_eq!(choose(5, 2), 10);
    // The naive product n (n-1) ... (n-k+1) overflows well before these.
    assert_eq!(choose(40, 20), 137846528820);
    assert_eq!(choose(60, 30), 118264581564861424);
}

#[cfg(test)]
fn seed(x: f64, n: usize) -> Vec<f64> {
    let mut g = vec![0.; n + 1];
    g[0] = x;
    g[1] = 1.;
    g
}

#[test]
fn test_mul_square() {
    // y = x^2 at x = 1.5: y = 2.25, y' = 3, y'' = 2, rest 0.
    let g = seed(1.5, 4);
    let c = mul(&g, &g);
    assert_eq!(c, vec![2.25, 3., 2., 0., 0.]);
}

#[test]
fn test_div_recip() {
    // y = 1/x at x = 2: derivatives (-1)^k k! / x^(k+1).
    let one = {
        let mut o = vec![0.; 4];
        o[0] = 1.;
        o
    };
    let g = seed(2., 3);
    let c = div(&one, &g);
    assert_eq!(c, vec![0.5, -0.25, 0.25, -0.375]);
}

#[test]
fn test_powf_matches_mul() {
    let g = seed(1.5, 4);
    let via_mul = mul(&g, &g);
    let via_pow = powf(&g, 2.);
    for (a, b) in via_mul.iter().zip(&via_pow) {
        assert!((a - b).abs() < 1e-12, "{via_mul:?} vs {via_pow:?}");
    }
}

#[test]
fn test_powf_negative_base() {
    // y = x^3 at x = -2 stays real where exp(3 ln x) would not.
    let g = seed(-2., 3);
    let c = powf(&g, 3.);
    assert!((c[0] + 8.).abs() < 1e-12);
    assert!((c[1] - 12.).abs() < 1e-12);
    assert!((c[2] + 12.).abs() < 1e-12);
    assert!((c[3] - 6.).abs() < 1e-12);
}

#[test]
fn test_exp_raw_derivatives() {
    // Every raw derivative of e^x equals e^x.
    let g = seed(0.7, 5);
    let c = exp(&g);
    let e = 0.7f64.exp();
    for v in c {
        assert!((v - e).abs() < 1e-12);
    }
}

#[test]
fn test_sin_cos_cycle() {
    let x = 0.9;
    let g = seed(x, 4);
    let (s, c) = sin_cos(&g);
    let expect_s = [x.sin(), x.cos(), -x.sin(), -x.cos(), x.sin()];
    for (v, e) in s.iter().zip(expect_s) {
        assert!((v - e).abs() < 1e-12);
    }
    let expect_c = [x.cos(), -x.sin(), -x.cos(), x.sin(), x.cos()];
    for (v, e) in c.iter().zip(expect_c) {
        assert!((v - e).abs() < 1e-12);
    }
}

#[test]
fn test_ln_raw_derivatives() {
    // ln x: derivatives (-1)^(k-1) (k-1)! / x^k.
    let x = 2.5;
    let g = seed(x, 4);
    let c = ln(&g);
    let expect = [x.ln(), 1. / x, -1. / (x * x), 2. / x.powi(3), -6. / x.powi(4)];
    for (v, e) in c.iter().zip(expect) {
        assert!((v - e).abs() < 1e-12);
    }
}

#[test]
fn test_sqrt_matches_powf() {
    let g = seed(3.1, 5);
    let a = sqrt(&g);
    let b = powf(&g, 0.5);
    for (x, y) in a.iter().zip(&b) {
        assert!((x - y).abs() < 1e-10, "{a:?} vs {b:?}");
    }
}

#[test]
fn test_tan_ratio() {
    // tan must agree with sin/cos computed through the quotient rule.
    let g = seed(0.6, 5);
    let (s, c) = sin_cos(&g);
    let ratio = div(&s, &c);
    let t = tan(&g);
    for (x, y) in t.iter().zip(&ratio) {
        assert!((x - y).abs() < 1e-10, "{t:?} vs {ratio:?}");
    }
}

#[test]
fn test_tanh_ratio() {
    let g = seed(0.4, 5);
    let (sh, ch) = sinh_cosh(&g);
    let ratio = div(&sh, &ch);
    let t = tanh(&g);
    for (x, y) in t.iter().zip(&ratio) {
        assert!((x - y).abs() < 1e-10, "{t:?} vs {ratio:?}");
    }
}

#[test]
fn test_asin_acos_atan_first_orders() {
    let x = 0.3;
    let g = seed(x, 2);
    let a = asin(&g);
    assert!((a[1] - 1. / (1. - x * x).sqrt()).abs() < 1e-12);
    assert!((a[2] - x / (1. - x * x).powf(1.5)).abs() < 1e-12);
    let b = acos(&g);
    assert!((b[0] - x.acos()).abs() < 1e-12);
    assert!((b[1] + a[1]).abs() < 1e-12);
    let t = atan(&g);
    assert!((t[1] - 1. / (1. + x * x)).abs() < 1e-12);
    assert!((t[2] + 2. * x / (1. + x * x).powi(2)).abs() < 1e-12);
}

#[test]
fn test_abs_branches() {
    let mut g = seed(-1.2, 2);
    g[2] = 0.5;
    assert_eq!(abs(&g), vec![1.2, -1., -0.5]);
    let g = seed(1.2, 1);
    assert_eq!(abs(&g), vec![1.2, 1.]);
}
