use crate::error::AdError;
use crate::recurrence;
use crate::rules::Rule;

/// A univariate AD value: the raw derivatives `f(x), f'(x), ...,
/// f^(N)(x)` of one expression at one point, with the order `N` fixed
/// at construction.
///
/// `coeffs[k]` is the plain k-th derivative, not divided by `k!`; for
/// `y = x*x` seeded at `x = 1.5`, `y.d(2)` is exactly `2.0`.
///
/// An order-0 value carries no derivative information and plays the
/// role of a real constant: it combines with a value of any order, as a
/// bare `f64` does. Two values of different nonzero orders never
/// combine; that raises [`AdError::OrderMismatch`] instead of silently
/// truncating to the smaller order.
#[derive(Clone, Debug)]
pub struct Adn {
    coeffs: Vec<f64>,
}

/// Seed the independent variable of a univariate session: value `v`,
/// first derivative 1, all higher derivatives 0.
pub fn adn(v: f64, order: usize) -> Adn {
    Adn::seed(v, order)
}

impl Adn {
    /// The independent variable itself, tracked to `order`.
    pub fn seed(v: f64, order: usize) -> Self {
        let mut coeffs = vec![0.; order + 1];
        coeffs[0] = v;
        if order >= 1 {
            coeffs[1] = 1.;
        }
        Self { coeffs }
    }

    /// A constant: every derivative entry is zero.
    pub fn constant(v: f64, order: usize) -> Self {
        let mut coeffs = vec![0.; order + 1];
        coeffs[0] = v;
        Self { coeffs }
    }

    /// Build a value from an explicit raw-derivative sequence
    /// (`coeffs[0]` is the nominal).
    pub fn from_derivatives(coeffs: Vec<f64>) -> Self {
        assert!(
            !coeffs.is_empty(),
            "a derivative sequence needs at least the order-0 entry"
        );
        Self { coeffs }
    }

    /// The nominal value.
    pub fn nom(&self) -> f64 {
        self.coeffs[0]
    }

    /// The k-th raw derivative, `0 <= k <= order`.
    pub fn d(&self, k: usize) -> f64 {
        self.coeffs[k]
    }

    /// The highest derivative tracked.
    pub fn order(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// The full raw-derivative sequence.
    pub fn derivatives(&self) -> &[f64] {
        &self.coeffs
    }

    /// Whether this value is a constant (order 0, the Real variant).
    pub fn is_real(&self) -> bool {
        self.coeffs.len() == 1
    }

    /// Align two operands, lifting an order-0 constant to the other
    /// operand's order. Distinct nonzero orders are an error.
    fn united_order(&self, rhs: &Self) -> Result<usize, AdError> {
        match (self.order(), rhs.order()) {
            (n, m) if n == m => Ok(n),
            (n, 0) => Ok(n),
            (0, m) => Ok(m),
            (n, m) => Err(AdError::OrderMismatch { left: n, right: m }),
        }
    }

    fn lifted(&self, order: usize) -> Self {
        if self.order() == order {
            self.clone()
        } else {
            Self::constant(self.coeffs[0], order)
        }
    }

    fn zip(
        &self,
        rhs: &Self,
        f: impl FnOnce(&[f64], &[f64]) -> Vec<f64>,
    ) -> Result<Self, AdError> {
        let order = self.united_order(rhs)?;
        let (a, b) = (self.lifted(order), rhs.lifted(order));
        Ok(Self {
            coeffs: f(&a.coeffs, &b.coeffs),
        })
    }

    pub fn try_add(&self, rhs: &Self) -> Result<Self, AdError> {
        self.zip(rhs, |a, b| a.iter().zip(b).map(|(x, y)| x + y).collect())
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self, AdError> {
        self.zip(rhs, |a, b| a.iter().zip(b).map(|(x, y)| x - y).collect())
    }

    pub fn try_mul(&self, rhs: &Self) -> Result<Self, AdError> {
        self.zip(rhs, |a, b| recurrence::mul(a, b))
    }

    pub fn try_div(&self, rhs: &Self) -> Result<Self, AdError> {
        self.zip(rhs, |a, b| recurrence::div(a, b))
    }

    /// Power with an AD-valued exponent, as the `exp(rhs * ln(self))`
    /// composition. For a plain real exponent prefer [`Adn::powf`],
    /// which also handles negative bases.
    pub fn try_pow(&self, rhs: &Self) -> Result<Self, AdError> {
        Ok((&rhs.try_mul(&self.ln())?).exp())
    }

    /// Panicking form of [`Adn::try_pow`].
    pub fn pow(&self, rhs: &Self) -> Self {
        checked(self.try_pow(rhs))
    }

    /// Power with a real exponent, by the order-by-order ODE recurrence.
    pub fn powf(&self, p: f64) -> Self {
        Self {
            coeffs: recurrence::powf(&self.coeffs, p),
        }
    }

    fn apply(&self, rule: Rule) -> Self {
        let g = &self.coeffs;
        let coeffs = match rule {
            Rule::Sin => recurrence::sin_cos(g).0,
            Rule::Cos => recurrence::sin_cos(g).1,
            Rule::Tan => recurrence::tan(g),
            Rule::Exp => recurrence::exp(g),
            Rule::Ln => recurrence::ln(g),
            Rule::Sqrt => recurrence::sqrt(g),
            Rule::Sinh => recurrence::sinh_cosh(g).0,
            Rule::Cosh => recurrence::sinh_cosh(g).1,
            Rule::Tanh => recurrence::tanh(g),
            Rule::Asin => recurrence::asin(g),
            Rule::Acos => recurrence::acos(g),
            Rule::Atan => recurrence::atan(g),
            Rule::Abs => recurrence::abs(g),
        };
        Self { coeffs }
    }

    pub fn sin(&self) -> Self {
        self.apply(Rule::Sin)
    }

    pub fn cos(&self) -> Self {
        self.apply(Rule::Cos)
    }

    pub fn tan(&self) -> Self {
        self.apply(Rule::Tan)
    }

    pub fn exp(&self) -> Self {
        self.apply(Rule::Exp)
    }

    pub fn ln(&self) -> Self {
        self.apply(Rule::Ln)
    }

    pub fn sqrt(&self) -> Self {
        self.apply(Rule::Sqrt)
    }

    pub fn sinh(&self) -> Self {
        self.apply(Rule::Sinh)
    }

    pub fn cosh(&self) -> Self {
        self.apply(Rule::Cosh)
    }

    pub fn tanh(&self) -> Self {
        self.apply(Rule::Tanh)
    }

    pub fn asin(&self) -> Self {
        self.apply(Rule::Asin)
    }

    pub fn acos(&self) -> Self {
        self.apply(Rule::Acos)
    }

    pub fn atan(&self) -> Self {
        self.apply(Rule::Atan)
    }

    pub fn abs(&self) -> Self {
        self.apply(Rule::Abs)
    }
}

/// Comparisons look at the nominal only, so an AD value orders the same
/// way the plain number it tracks would.
impl PartialEq for Adn {
    fn eq(&self, other: &Self) -> bool {
        self.nom() == other.nom()
    }
}

impl PartialOrd for Adn {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.nom().partial_cmp(&other.nom())
    }
}

impl PartialEq<f64> for Adn {
    fn eq(&self, other: &f64) -> bool {
        self.nom() == *other
    }
}

impl PartialOrd<f64> for Adn {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.nom().partial_cmp(other)
    }
}

fn checked(res: Result<Adn, AdError>) -> Adn {
    res.unwrap_or_else(|e| panic!("{e}"))
}

impl std::ops::Add for &Adn {
    type Output = Adn;
    fn add(self, rhs: &Adn) -> Self::Output {
        checked(self.try_add(rhs))
    }
}

impl std::ops::Sub for &Adn {
    type Output = Adn;
    fn sub(self, rhs: &Adn) -> Self::Output {
        checked(self.try_sub(rhs))
    }
}

impl std::ops::Mul for &Adn {
    type Output = Adn;
    fn mul(self, rhs: &Adn) -> Self::Output {
        checked(self.try_mul(rhs))
    }
}

impl std::ops::Div for &Adn {
    type Output = Adn;
    fn div(self, rhs: &Adn) -> Self::Output {
        checked(self.try_div(rhs))
    }
}

impl std::ops::Neg for &Adn {
    type Output = Adn;
    fn neg(self) -> Self::Output {
        Adn {
            coeffs: self.coeffs.iter().map(|&v| -v).collect(),
        }
    }
}

impl std::ops::Add for Adn {
    type Output = Adn;
    fn add(self, rhs: Adn) -> Self::Output {
        &self + &rhs
    }
}

impl std::ops::Sub for Adn {
    type Output = Adn;
    fn sub(self, rhs: Adn) -> Self::Output {
        &self - &rhs
    }
}

impl std::ops::Mul for Adn {
    type Output = Adn;
    fn mul(self, rhs: Adn) -> Self::Output {
        &self * &rhs
    }
}

impl std::ops::Div for Adn {
    type Output = Adn;
    fn div(self, rhs: Adn) -> Self::Output {
        &self / &rhs
    }
}

impl std::ops::Neg for Adn {
    type Output = Adn;
    fn neg(self) -> Self::Output {
        -&self
    }
}

impl std::ops::Add<f64> for &Adn {
    type Output = Adn;
    fn add(self, rhs: f64) -> Self::Output {
        self + &Adn::constant(rhs, 0)
    }
}

impl std::ops::Sub<f64> for &Adn {
    type Output = Adn;
    fn sub(self, rhs: f64) -> Self::Output {
        self - &Adn::constant(rhs, 0)
    }
}

impl std::ops::Mul<f64> for &Adn {
    type Output = Adn;
    fn mul(self, rhs: f64) -> Self::Output {
        self * &Adn::constant(rhs, 0)
    }
}

impl std::ops::Div<f64> for &Adn {
    type Output = Adn;
    fn div(self, rhs: f64) -> Self::Output {
        self / &Adn::constant(rhs, 0)
    }
}

impl std::ops::Add<&Adn> for f64 {
    type Output = Adn;
    fn add(self, rhs: &Adn) -> Self::Output {
        &Adn::constant(self, 0) + rhs
    }
}

impl std::ops::Sub<&Adn> for f64 {
    type Output = Adn;
    fn sub(self, rhs: &Adn) -> Self::Output {
        &Adn::constant(self, 0) - rhs
    }
}

impl std::ops::Mul<&Adn> for f64 {
    type Output = Adn;
    fn mul(self, rhs: &Adn) -> Self::Output {
        &Adn::constant(self, 0) * rhs
    }
}

impl std::ops::Div<&Adn> for f64 {
    type Output = Adn;
    fn div(self, rhs: &Adn) -> Self::Output {
        &Adn::constant(self, 0) / rhs
    }
}

impl std::fmt::Display for Adn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.coeffs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

#[test]
fn test_square_raw_derivatives() {
    let x = adn(1.5, 4);
    let y = &x * &x;
    assert_eq!(y.nom(), 2.25);
    assert_eq!(y.d(1), 3.);
    assert_eq!(y.d(2), 2.);
    assert_eq!(y.d(3), 0.);
    assert_eq!(y.d(4), 0.);
}

#[test]
fn test_constant_mixing() {
    let x = adn(2., 3);
    let y = &(&x * 3.) + 1.;
    assert_eq!(y.derivatives(), &[7., 3., 0., 0.]);
    let z = 1. / &x;
    assert_eq!(z.derivatives(), &[0.5, -0.25, 0.25, -0.375]);
}

#[test]
fn test_order_mismatch() {
    let a = adn(1., 2);
    let b = adn(1., 3);
    assert_eq!(
        a.try_add(&b),
        Err(AdError::OrderMismatch { left: 2, right: 3 })
    );
}

#[test]
#[should_panic(expected = "derivative order mismatch")]
fn test_order_mismatch_panics_in_operator() {
    let _ = &adn(1., 2) + &adn(1., 3);
}

#[test]
fn test_pow_ad_exponent() {
    // x^x at x = 2: value 4, derivative 4 (ln 2 + 1).
    let x = adn(2., 1);
    let y = x.try_pow(&x).unwrap();
    assert!((y.nom() - 4.).abs() < 1e-12);
    assert!((y.d(1) - 4. * (2f64.ln() + 1.)).abs() < 1e-12);
}

#[test]
fn test_comparisons_use_nominal() {
    let x = adn(1., 2);
    let c = Adn::constant(1., 2);
    assert_eq!(x, c);
    assert!(x < adn(2., 2));
    assert!(x > adn(0.5, 2));
}
