use crate::error::AdError;
use crate::grid::Grid;
use crate::rules::Rule;

/// A multivariate first-order AD value: a nominal grid of shape `S`
/// together with a partial grid of shape `(P,) + S`, where row `i`
/// holds the partial derivatives of every nominal element with respect
/// to the i-th independent variable.
///
/// `P` is fixed when the independent variables are seeded and must
/// agree between any two AD operands; mixing sessions raises
/// [`AdError::PartialCountMismatch`]. A constant (the Real variant)
/// carries an empty partial grid (`P = 0`) and combines with any
/// session. Propagation is the ordinary chain rule, evaluated
/// elementwise with trailing-dimension broadcasting of the partial
/// grid against the nominal grid.
#[derive(Clone, Debug)]
pub struct Ad {
    nom: Grid,
    partials: Grid,
}

/// Seed independent variables: one per nominal element, with the
/// identity partial matrix. A scalar seeds a one-variable session.
pub fn ad(value: impl Into<Grid>) -> Ad {
    Ad::seed(value.into())
}

/// Seed with explicit partial rows, for manual composition. `partials`
/// must have shape `(P,) + S` (a plain vector of length `P` for a
/// scalar nominal).
pub fn ad_with(value: impl Into<Grid>, partials: Grid) -> Result<Ad, AdError> {
    Ad::with_partials(value.into(), partials)
}

impl Ad {
    pub fn seed(nom: Grid) -> Self {
        let n = nom.len();
        let mut shape = vec![n];
        shape.extend_from_slice(nom.shape());
        let partials = Grid::from_shape_vec(shape, Grid::eye(n).as_slice().to_vec())
            .expect("identity partials match the nominal element count");
        Self { nom, partials }
    }

    pub fn with_partials(nom: Grid, partials: Grid) -> Result<Self, AdError> {
        if partials.rank() == 0 || partials.shape()[1..] != *nom.shape() {
            return Err(AdError::ShapeBroadcast {
                left: partials.shape().to_vec(),
                right: nom.shape().to_vec(),
            });
        }
        Ok(Self { nom, partials })
    }

    /// A constant: no partial rows, combines with any session.
    pub fn constant(nom: Grid) -> Self {
        let mut shape = vec![0];
        shape.extend_from_slice(nom.shape());
        Self {
            partials: Grid::zeros(&shape),
            nom,
        }
    }

    /// The nominal value.
    pub fn nom(&self) -> &Grid {
        &self.nom
    }

    /// Number of independent variables in this value's session
    /// (0 for a constant).
    pub fn partial_count(&self) -> usize {
        self.partials.shape()[0]
    }

    /// Whether this value is a constant (the Real variant).
    pub fn is_real(&self) -> bool {
        self.partial_count() == 0
    }

    /// The first-derivative information, arranged element-major: for a
    /// scalar nominal a vector of length `P`, for a grid nominal one
    /// row of `P` partials per element. This is the layout a Jacobian
    /// row (or the full Jacobian of [`unite`]) has.
    pub fn d1(&self) -> Grid {
        let p = self.partial_count();
        let slen = self.nom.len();
        if self.nom.rank() == 0 {
            return Grid::vector(self.partials.as_slice().to_vec());
        }
        let stored = self.partials.as_slice();
        let mut data = Vec::with_capacity(p * slen);
        for e in 0..slen {
            for i in 0..p {
                data.push(stored[i * slen + e]);
            }
        }
        let mut shape = self.nom.shape().to_vec();
        shape.push(p);
        Grid::from_shape_vec(shape, data).expect("element-major layout preserves the length")
    }

    /// Select nominal element `i` along the leading axis together with
    /// its full partial rows, keeping the independent-variable axis.
    pub fn at(&self, i: usize) -> Result<Self, AdError> {
        Ok(Self {
            nom: self.nom.index_axis(0, i)?,
            partials: self.partials.index_axis(1, i)?,
        })
    }

    fn united_count(&self, rhs: &Self) -> Result<usize, AdError> {
        match (self.partial_count(), rhs.partial_count()) {
            (p, q) if p == q => Ok(p),
            (p, 0) => Ok(p),
            (0, q) => Ok(q),
            (p, q) => Err(AdError::PartialCountMismatch { left: p, right: q }),
        }
    }

    /// The partial grid readied for combination with another operand:
    /// a constant's empty grid becomes `p` zero rows, and the nominal
    /// axes are padded with leading 1s to `nom_rank` so the partial
    /// axis always lines up one place left of the broadcast nominal.
    fn aligned_partials(&self, p: usize, nom_rank: usize) -> Grid {
        let mut shape = vec![p];
        shape.extend(std::iter::repeat(1).take(nom_rank - self.nom.rank()));
        shape.extend_from_slice(self.nom.shape());
        if self.partial_count() == p {
            self.partials
                .reshape(shape)
                .expect("padding with 1s keeps the element count")
        } else {
            Grid::zeros(&shape)
        }
    }

    fn operand_partials(&self, rhs: &Self) -> Result<(usize, Grid, Grid), AdError> {
        let p = self.united_count(rhs)?;
        let rank = self.nom.rank().max(rhs.nom.rank());
        Ok((
            p,
            self.aligned_partials(p, rank),
            rhs.aligned_partials(p, rank),
        ))
    }

    pub fn try_add(&self, rhs: &Self) -> Result<Self, AdError> {
        let (_, pa, pb) = self.operand_partials(rhs)?;
        Ok(Self {
            nom: self.nom.zip_with(&rhs.nom, |a, b| a + b)?,
            partials: pa.zip_with(&pb, |a, b| a + b)?,
        })
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self, AdError> {
        let (_, pa, pb) = self.operand_partials(rhs)?;
        Ok(Self {
            nom: self.nom.zip_with(&rhs.nom, |a, b| a - b)?,
            partials: pa.zip_with(&pb, |a, b| a - b)?,
        })
    }

    pub fn try_mul(&self, rhs: &Self) -> Result<Self, AdError> {
        let (_, pa, pb) = self.operand_partials(rhs)?;
        // (f g)' = f' g + f g', the partial axis broadcasting over S.
        let partials = pa
            .zip_with(&rhs.nom, |a, b| a * b)?
            .zip_with(&pb.zip_with(&self.nom, |a, b| a * b)?, |a, b| a + b)?;
        Ok(Self {
            nom: self.nom.zip_with(&rhs.nom, |a, b| a * b)?,
            partials,
        })
    }

    pub fn try_div(&self, rhs: &Self) -> Result<Self, AdError> {
        let (_, pa, pb) = self.operand_partials(rhs)?;
        // (f/g)' = f'/g - f g'/g^2
        let num = pa.zip_with(&rhs.nom, |a, b| a * b)?.zip_with(
            &pb.zip_with(&self.nom, |a, b| a * b)?,
            |a, b| a - b,
        )?;
        let den = rhs.nom.zip_with(&rhs.nom, |a, b| a * b)?;
        Ok(Self {
            nom: self.nom.zip_with(&rhs.nom, |a, b| a / b)?,
            partials: num.zip_with(&den, |a, b| a / b)?,
        })
    }

    /// Power with an AD-valued exponent:
    /// `(f^g)' = f^g (g' ln f + g f' / f)`.
    pub fn try_pow(&self, rhs: &Self) -> Result<Self, AdError> {
        let (_, pa, pb) = self.operand_partials(rhs)?;
        let nom = self.nom.zip_with(&rhs.nom, f64::powf)?;
        let ln_term = pb.zip_with(&self.nom.map(f64::ln), |a, b| a * b)?;
        let ratio = rhs.nom.zip_with(&self.nom, |a, b| a / b)?;
        let pow_term = pa.zip_with(&ratio, |a, b| a * b)?;
        let partials = ln_term
            .zip_with(&pow_term, |a, b| a + b)?
            .zip_with(&nom, |a, b| a * b)?;
        Ok(Self { nom, partials })
    }

    /// Panicking form of [`Ad::try_pow`].
    pub fn pow(&self, rhs: &Self) -> Self {
        checked(self.try_pow(rhs))
    }

    /// Power with a real exponent: `(f^p)' = p f^(p-1) f'`.
    pub fn powf(&self, p: f64) -> Self {
        self.chain(self.nom.map(|v| v.powf(p)), self.nom.map(|v| p * v.powf(p - 1.)))
    }

    /// Chain rule for a unary map: new nominal `f(g)` and partials
    /// `f'(g) * g'`, elementwise with the partial axis broadcasting.
    fn chain(&self, nom: Grid, grad: Grid) -> Self {
        let partials = self
            .partials
            .zip_with(&grad, |a, b| a * b)
            .unwrap_or_else(|e| panic!("{e}"));
        Self { nom, partials }
    }

    fn apply(&self, rule: Rule) -> Self {
        self.chain(self.nom.map(|v| rule.eval(v)), self.nom.map(|v| rule.grad(v)))
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

/// Combine several outputs of one session into a single vector-valued
/// AD value whose [`Ad::d1`] is the stacked Jacobian.
pub fn unite(outputs: &[Ad]) -> Result<Ad, AdError> {
    let p = session_count(outputs)?;
    let noms: Vec<Grid> = outputs.iter().map(|y| y.nom.clone()).collect();
    let nom = Grid::concat(&noms)?;
    let total = nom.len();
    // Assemble in (P, total) storage order so the composite keeps the
    // same layout invariant as every other value.
    let mut data = vec![0.; p * total];
    let mut offset = 0;
    for y in outputs {
        let slen = y.nom.len();
        if !y.is_real() {
            let stored = y.partials.as_slice();
            for i in 0..p {
                for e in 0..slen {
                    data[i * total + offset + e] = stored[i * slen + e];
                }
            }
        }
        offset += slen;
    }
    let partials = Grid::from_shape_vec(vec![p, total], data)
        .expect("stacked partials match the concatenated nominal length");
    Ok(Ad { nom, partials })
}

/// The `(#outputs, P)` Jacobian of several outputs of one session,
/// assembled directly without building the composite value. Produces
/// exactly the grid `unite(outputs)?.d1()` yields.
pub fn jacobian(outputs: &[Ad]) -> Result<Grid, AdError> {
    let p = session_count(outputs)?;
    let mut rows = Vec::new();
    for y in outputs {
        let slen = y.nom.len();
        for e in 0..slen {
            let row = if y.is_real() {
                vec![0.; p]
            } else {
                let stored = y.partials.as_slice();
                (0..p).map(|i| stored[i * slen + e]).collect()
            };
            rows.push(Grid::vector(row));
        }
    }
    Grid::vstack(&rows)
}

/// The common partial count of an output sequence; constants join any
/// session.
fn session_count(outputs: &[Ad]) -> Result<usize, AdError> {
    let mut p = match outputs.first() {
        Some(y) => y.partial_count(),
        None => return Err(AdError::EmptySequence),
    };
    for y in &outputs[1..] {
        let q = y.partial_count();
        if p == 0 {
            p = q;
        } else if q != 0 && q != p {
            return Err(AdError::PartialCountMismatch { left: p, right: q });
        }
    }
    Ok(p)
}

/// Comparisons look at the nominal only; ordering is defined for
/// scalar nominals.
impl PartialEq for Ad {
    fn eq(&self, other: &Self) -> bool {
        self.nom == other.nom
    }
}

impl PartialOrd for Ad {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self.nom.as_scalar(), other.nom.as_scalar()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        }
    }
}

fn checked(res: Result<Ad, AdError>) -> Ad {
    res.unwrap_or_else(|e| panic!("{e}"))
}

impl std::ops::Add for &Ad {
    type Output = Ad;
    fn add(self, rhs: &Ad) -> Self::Output {
        checked(self.try_add(rhs))
    }
}

impl std::ops::Sub for &Ad {
    type Output = Ad;
    fn sub(self, rhs: &Ad) -> Self::Output {
        checked(self.try_sub(rhs))
    }
}

impl std::ops::Mul for &Ad {
    type Output = Ad;
    fn mul(self, rhs: &Ad) -> Self::Output {
        checked(self.try_mul(rhs))
    }
}

impl std::ops::Div for &Ad {
    type Output = Ad;
    fn div(self, rhs: &Ad) -> Self::Output {
        checked(self.try_div(rhs))
    }
}

impl std::ops::Neg for &Ad {
    type Output = Ad;
    fn neg(self) -> Self::Output {
        Ad {
            nom: self.nom.map(|v| -v),
            partials: self.partials.map(|v| -v),
        }
    }
}

impl std::ops::Add for Ad {
    type Output = Ad;
    fn add(self, rhs: Ad) -> Self::Output {
        &self + &rhs
    }
}

impl std::ops::Sub for Ad {
    type Output = Ad;
    fn sub(self, rhs: Ad) -> Self::Output {
        &self - &rhs
    }
}

impl std::ops::Mul for Ad {
    type Output = Ad;
    fn mul(self, rhs: Ad) -> Self::Output {
        &self * &rhs
    }
}

impl std::ops::Div for Ad {
    type Output = Ad;
    fn div(self, rhs: Ad) -> Self::Output {
        &self / &rhs
    }
}

impl std::ops::Neg for Ad {
    type Output = Ad;
    fn neg(self) -> Self::Output {
        -&self
    }
}

impl std::ops::Add<f64> for &Ad {
    type Output = Ad;
    fn add(self, rhs: f64) -> Self::Output {
        self + &Ad::constant(Grid::scalar(rhs))
    }
}

impl std::ops::Sub<f64> for &Ad {
    type Output = Ad;
    fn sub(self, rhs: f64) -> Self::Output {
        self - &Ad::constant(Grid::scalar(rhs))
    }
}

impl std::ops::Mul<f64> for &Ad {
    type Output = Ad;
    fn mul(self, rhs: f64) -> Self::Output {
        self * &Ad::constant(Grid::scalar(rhs))
    }
}

impl std::ops::Div<f64> for &Ad {
    type Output = Ad;
    fn div(self, rhs: f64) -> Self::Output {
        self / &Ad::constant(Grid::scalar(rhs))
    }
}

impl std::ops::Add<&Ad> for f64 {
    type Output = Ad;
    fn add(self, rhs: &Ad) -> Self::Output {
        &Ad::constant(Grid::scalar(self)) + rhs
    }
}

impl std::ops::Sub<&Ad> for f64 {
    type Output = Ad;
    fn sub(self, rhs: &Ad) -> Self::Output {
        &Ad::constant(Grid::scalar(self)) - rhs
    }
}

impl std::ops::Mul<&Ad> for f64 {
    type Output = Ad;
    fn mul(self, rhs: &Ad) -> Self::Output {
        &Ad::constant(Grid::scalar(self)) * rhs
    }
}

impl std::ops::Div<&Ad> for f64 {
    type Output = Ad;
    fn div(self, rhs: &Ad) -> Self::Output {
        &Ad::constant(Grid::scalar(self)) / rhs
    }
}

impl std::fmt::Display for Ad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (d: {})", self.nom, self.d1())
    }
}

#[test]
fn test_identity_seeding() {
    let x = ad([1., 2., 3.]);
    assert_eq!(x.partial_count(), 3);
    for i in 0..3 {
        let xi = x.at(i).unwrap();
        assert_eq!(xi.nom().as_scalar(), Some((i + 1) as f64));
        let mut basis = vec![0.; 3];
        basis[i] = 1.;
        assert_eq!(xi.d1(), Grid::vector(basis));
    }
    assert!(x.at(3).is_err());
}

#[test]
fn test_scalar_session() {
    let x = ad(2.);
    let y = &(&x * &x) + 1.;
    assert_eq!(y.nom().as_scalar(), Some(5.));
    assert_eq!(y.d1(), Grid::vector(vec![4.]));
}

#[test]
fn test_at_needs_a_leading_axis() {
    // A scalar nominal has no element axis to index into.
    let x = ad(2.0);
    assert_eq!(x.at(0), Err(AdError::AxisRange { axis: 0, rank: 0 }));
}

#[test]
fn test_partial_count_mismatch() {
    let x = ad([1., 2.]);
    let z = ad([1., 2., 3.]);
    assert_eq!(
        x.at(0).unwrap().try_add(&z.at(0).unwrap()),
        Err(AdError::PartialCountMismatch { left: 2, right: 3 })
    );
}

#[test]
fn test_grid_chain_rule() {
    // y = sin(x) elementwise over a seeded vector: diagonal Jacobian.
    let x = ad([0.3, 1.1]);
    let y = x.sin();
    let j = jacobian(&[y]).unwrap();
    assert_eq!(j.shape(), &[2, 2]);
    assert!((j[0] - 0.3f64.cos()).abs() < 1e-12);
    assert_eq!(j[1], 0.);
    assert_eq!(j[2], 0.);
    assert!((j[3] - 1.1f64.cos()).abs() < 1e-12);
}

#[test]
fn test_unite_matches_jacobian_bitwise() {
    let x = ad([0.5, -1.25, 2.0]);
    let y0 = &x.at(0).unwrap() * &x.at(1).unwrap();
    let y1 = x.at(2).unwrap().exp();
    let y2 = &x.at(0).unwrap() + 3.;
    let outputs = [y0, y1, y2];
    let composite = unite(&outputs).unwrap();
    assert_eq!(composite.d1(), jacobian(&outputs).unwrap());
    assert_eq!(
        composite.nom().as_slice(),
        &[-0.625, 2f64.exp(), 3.5]
    );
}

#[test]
fn test_empty_sequence() {
    assert_eq!(jacobian(&[]), Err(AdError::EmptySequence));
}
