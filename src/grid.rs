use crate::error::AdError;

/// A numeric grid: a row-major buffer of `f64` with a shape.
///
/// Rank 0 is a scalar, rank 1 a vector, rank 2 a matrix and so on.
/// Binary operations broadcast with the standard trailing-dimension
/// alignment: comparing shapes from the right, each pair of dimensions
/// must be equal or one of them must be 1; a missing leading dimension
/// counts as 1. The broadcast contract is implemented here explicitly
/// so it can be tested, instead of being inherited from an array
/// library.
#[derive(Clone, PartialEq, Debug)]
pub struct Grid {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Grid {
    /// A rank-0 grid holding a single value.
    pub fn scalar(v: f64) -> Self {
        Self {
            shape: vec![],
            data: vec![v],
        }
    }

    /// A rank-1 grid from a buffer.
    pub fn vector(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// A grid of the given shape from a row-major buffer.
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, AdError> {
        if shape.iter().product::<usize>() != data.len() {
            return Err(AdError::ShapeData {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// A grid of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            data: vec![0.; shape.iter().product()],
        }
    }

    /// The `n`-by-`n` identity matrix.
    pub fn eye(n: usize) -> Self {
        let mut data = vec![0.; n * n];
        for i in 0..n {
            data[i * n + i] = 1.;
        }
        Self {
            shape: vec![n, n],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The row-major element buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The single element of a one-element grid, if it is one.
    pub fn as_scalar(&self) -> Option<f64> {
        if self.data.len() == 1 {
            Some(self.data[0])
        } else {
            None
        }
    }

    /// Reinterpret the buffer under a new shape with the same element
    /// count. Row-major order makes this a relabeling, not a copy of
    /// different elements.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Self, AdError> {
        if shape.iter().product::<usize>() != self.data.len() {
            return Err(AdError::ShapeData {
                shape,
                len: self.data.len(),
            });
        }
        Ok(Self {
            shape,
            data: self.data.clone(),
        })
    }

    /// Elementwise map.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            shape: self.shape.clone(),
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Elementwise combination with broadcasting.
    pub fn zip_with(&self, rhs: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, AdError> {
        let shape = broadcast_shape(&self.shape, &rhs.shape)?;
        let lstride = broadcast_strides(&self.shape, &shape);
        let rstride = broadcast_strides(&rhs.shape, &shape);
        let total: usize = shape.iter().product();
        let mut data = Vec::with_capacity(total);
        let mut index = vec![0usize; shape.len()];
        for _ in 0..total {
            let li: usize = index.iter().zip(&lstride).map(|(i, s)| i * s).sum();
            let ri: usize = index.iter().zip(&rstride).map(|(i, s)| i * s).sum();
            data.push(f(self.data[li], rhs.data[ri]));
            for axis in (0..shape.len()).rev() {
                index[axis] += 1;
                if index[axis] < shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }
        Ok(Self { shape, data })
    }

    /// Select slice `i` along `axis`, removing that axis.
    pub fn index_axis(&self, axis: usize, i: usize) -> Result<Self, AdError> {
        if axis >= self.shape.len() {
            return Err(AdError::AxisRange {
                axis,
                rank: self.shape.len(),
            });
        }
        let len = self.shape[axis];
        if i >= len {
            return Err(AdError::IndexRange { index: i, len });
        }
        let outer: usize = self.shape[..axis].iter().product();
        let inner: usize = self.shape[axis + 1..].iter().product();
        let mut data = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            let start = (o * len + i) * inner;
            data.extend_from_slice(&self.data[start..start + inner]);
        }
        let mut shape = self.shape.clone();
        shape.remove(axis);
        Ok(Self { shape, data })
    }

    /// Matrix transpose. Rank 0 and 1 are returned unchanged.
    pub fn transpose(&self) -> Result<Self, AdError> {
        match self.shape.len() {
            0 | 1 => Ok(self.clone()),
            2 => {
                let (rows, cols) = (self.shape[0], self.shape[1]);
                let mut data = Vec::with_capacity(self.data.len());
                for c in 0..cols {
                    for r in 0..rows {
                        data.push(self.data[r * cols + c]);
                    }
                }
                Ok(Self {
                    shape: vec![cols, rows],
                    data,
                })
            }
            rank => Err(AdError::RankUnsupported { rank, max: 2 }),
        }
    }

    /// Stack equal-length rank-1 rows into a rank-2 grid.
    pub fn vstack(rows: &[Self]) -> Result<Self, AdError> {
        let first = rows.first().ok_or(AdError::EmptySequence)?;
        let width = first.len();
        let mut data = Vec::with_capacity(rows.len() * width);
        for row in rows {
            if row.len() != width {
                return Err(AdError::ShapeBroadcast {
                    left: first.shape.clone(),
                    right: row.shape.clone(),
                });
            }
            data.extend_from_slice(&row.data);
        }
        Ok(Self {
            shape: vec![rows.len(), width],
            data,
        })
    }

    /// Concatenate the elements of several grids into one rank-1 grid.
    pub fn concat(grids: &[Self]) -> Result<Self, AdError> {
        if grids.is_empty() {
            return Err(AdError::EmptySequence);
        }
        let mut data = Vec::new();
        for g in grids {
            data.extend_from_slice(&g.data);
        }
        Ok(Self::vector(data))
    }
}

/// Align two shapes from their trailing dimensions.
pub(crate) fn broadcast_shape(left: &[usize], right: &[usize]) -> Result<Vec<usize>, AdError> {
    let rank = left.len().max(right.len());
    let mut shape = vec![0usize; rank];
    for axis in 0..rank {
        let l = dim_from_right(left, rank - 1 - axis);
        let r = dim_from_right(right, rank - 1 - axis);
        shape[axis] = if l == r || r == 1 {
            l
        } else if l == 1 {
            r
        } else {
            return Err(AdError::ShapeBroadcast {
                left: left.to_vec(),
                right: right.to_vec(),
            });
        };
    }
    Ok(shape)
}

fn dim_from_right(shape: &[usize], pos: usize) -> usize {
    if pos < shape.len() {
        shape[shape.len() - 1 - pos]
    } else {
        1
    }
}

/// Row-major strides of `shape` aligned to the broadcast result `out`,
/// with stride 0 on every axis the operand repeats along.
fn broadcast_strides(shape: &[usize], out: &[usize]) -> Vec<usize> {
    let mut strides = vec![0usize; out.len()];
    let mut stride = 1;
    for pos in 0..shape.len() {
        let axis = shape.len() - 1 - pos;
        if shape[axis] != 1 {
            strides[out.len() - 1 - pos] = stride;
        }
        stride *= shape[axis];
    }
    strides
}

impl From<f64> for Grid {
    fn from(v: f64) -> Self {
        Self::scalar(v)
    }
}

impl From<Vec<f64>> for Grid {
    fn from(v: Vec<f64>) -> Self {
        Self::vector(v)
    }
}

impl From<&[f64]> for Grid {
    fn from(v: &[f64]) -> Self {
        Self::vector(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Grid {
    fn from(v: [f64; N]) -> Self {
        Self::vector(v.to_vec())
    }
}

impl std::ops::Index<usize> for Grid {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

fn checked(res: Result<Grid, AdError>) -> Grid {
    res.unwrap_or_else(|e| panic!("{e}"))
}

impl std::ops::Add for &Grid {
    type Output = Grid;
    fn add(self, rhs: &Grid) -> Self::Output {
        checked(self.zip_with(rhs, |a, b| a + b))
    }
}

impl std::ops::Sub for &Grid {
    type Output = Grid;
    fn sub(self, rhs: &Grid) -> Self::Output {
        checked(self.zip_with(rhs, |a, b| a - b))
    }
}

impl std::ops::Mul for &Grid {
    type Output = Grid;
    fn mul(self, rhs: &Grid) -> Self::Output {
        checked(self.zip_with(rhs, |a, b| a * b))
    }
}

impl std::ops::Div for &Grid {
    type Output = Grid;
    fn div(self, rhs: &Grid) -> Self::Output {
        checked(self.zip_with(rhs, |a, b| a / b))
    }
}

impl std::ops::Neg for &Grid {
    type Output = Grid;
    fn neg(self) -> Self::Output {
        self.map(|v| -v)
    }
}

impl std::ops::Mul<f64> for &Grid {
    type Output = Grid;
    fn mul(self, rhs: f64) -> Self::Output {
        self.map(|v| v * rhs)
    }
}

impl std::ops::Add<f64> for &Grid {
    type Output = Grid;
    fn add(self, rhs: f64) -> Self::Output {
        self.map(|v| v + rhs)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn fmt_rec(
            f: &mut std::fmt::Formatter<'_>,
            shape: &[usize],
            data: &[f64],
        ) -> std::fmt::Result {
            match shape {
                [] => write!(f, "{}", data[0]),
                [n, rest @ ..] => {
                    let inner: usize = rest.iter().product();
                    write!(f, "[")?;
                    for i in 0..*n {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        fmt_rec(f, rest, &data[i * inner..(i + 1) * inner])?;
                    }
                    write!(f, "]")
                }
            }
        }
        fmt_rec(f, &self.shape, &self.data)
    }
}

#[test]
fn test_broadcast_shape() {
    assert_eq!(broadcast_shape(&[3], &[3]).unwrap(), vec![3]);
    assert_eq!(broadcast_shape(&[2, 3], &[3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[2, 1], &[3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[], &[4]).unwrap(), vec![4]);
    assert!(broadcast_shape(&[2], &[3]).is_err());
}

#[test]
fn test_zip_with_broadcast() {
    let m = Grid::from_shape_vec(vec![2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
    let v = Grid::vector(vec![10., 20., 30.]);
    let sum = m.zip_with(&v, |a, b| a + b).unwrap();
    assert_eq!(sum.shape(), &[2, 3]);
    assert_eq!(sum.as_slice(), &[11., 22., 33., 14., 25., 36.]);

    let s = Grid::scalar(100.);
    let shifted = v.zip_with(&s, |a, b| a + b).unwrap();
    assert_eq!(shifted.as_slice(), &[110., 120., 130.]);
}

#[test]
fn test_zip_with_mismatch() {
    let a = Grid::vector(vec![1., 2.]);
    let b = Grid::vector(vec![1., 2., 3.]);
    assert_eq!(
        a.zip_with(&b, |x, y| x + y),
        Err(AdError::ShapeBroadcast {
            left: vec![2],
            right: vec![3],
        })
    );
}

#[test]
fn test_index_axis() {
    let m = Grid::from_shape_vec(vec![2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
    assert_eq!(m.index_axis(0, 1).unwrap(), Grid::vector(vec![4., 5., 6.]));
    assert_eq!(m.index_axis(1, 2).unwrap(), Grid::vector(vec![3., 6.]));
    assert_eq!(
        m.index_axis(0, 2),
        Err(AdError::IndexRange { index: 2, len: 2 })
    );
    assert_eq!(
        m.index_axis(2, 0),
        Err(AdError::AxisRange { axis: 2, rank: 2 })
    );
}

#[test]
fn test_transpose_eye() {
    let m = Grid::from_shape_vec(vec![2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
    let t = m.transpose().unwrap();
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.as_slice(), &[1., 4., 2., 5., 3., 6.]);
    assert_eq!(Grid::eye(2).as_slice(), &[1., 0., 0., 1.]);
    assert_eq!(
        Grid::zeros(&[2, 2, 2]).transpose(),
        Err(AdError::RankUnsupported { rank: 3, max: 2 })
    );
}

#[test]
fn test_vstack() {
    let rows = [Grid::vector(vec![1., 2.]), Grid::vector(vec![3., 4.])];
    let m = Grid::vstack(&rows).unwrap();
    assert_eq!(m.shape(), &[2, 2]);
    assert_eq!(m.as_slice(), &[1., 2., 3., 4.]);
}
