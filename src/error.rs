use thiserror::Error;

/// Errors raised when incompatible values are combined or a grid is
/// constructed or indexed out of contract.
///
/// Domain edge cases of the elementary functions (square root of a
/// negative nominal, logarithm of zero, division by a zero nominal) are
/// deliberately *not* errors; they propagate as IEEE NaN/Inf through
/// both the nominal and the derivative computations, just like plain
/// `f64` arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdError {
    /// Two univariate AD values of different order were combined.
    /// There is no silent truncation to the smaller order.
    #[error("derivative order mismatch: {left} vs {right}")]
    OrderMismatch {
        /// Order of the left operand.
        left: usize,
        /// Order of the right operand.
        right: usize,
    },

    /// Two multivariate AD values seeded with different numbers of
    /// independent variables were combined.
    #[error("partial count mismatch: {left} vs {right} independent variables")]
    PartialCountMismatch {
        /// Partial count of the left operand.
        left: usize,
        /// Partial count of the right operand.
        right: usize,
    },

    /// Grid shapes cannot be aligned under trailing-dimension
    /// broadcasting.
    #[error("cannot broadcast shapes {left:?} and {right:?}")]
    ShapeBroadcast {
        /// Shape of the left operand.
        left: Vec<usize>,
        /// Shape of the right operand.
        right: Vec<usize>,
    },

    /// An index outside the valid range of a grid axis.
    #[error("index {index} out of range for axis of length {len}")]
    IndexRange {
        /// The offending index.
        index: usize,
        /// Length of the indexed axis.
        len: usize,
    },

    /// An operation addressed an axis a grid of this rank does not
    /// have.
    #[error("axis {axis} out of range for a rank-{rank} grid")]
    AxisRange {
        /// The requested axis.
        axis: usize,
        /// Rank of the grid.
        rank: usize,
    },

    /// A grid of higher rank than the operation supports.
    #[error("rank {rank} unsupported, expected at most {max}")]
    RankUnsupported {
        /// Rank of the grid.
        rank: usize,
        /// Highest rank the operation handles.
        max: usize,
    },

    /// A grid was constructed from a buffer whose length does not match
    /// the product of the requested shape.
    #[error("shape {shape:?} requires {} elements, got {len}", shape.iter().product::<usize>())]
    ShapeData {
        /// The requested shape.
        shape: Vec<usize>,
        /// Length of the provided buffer.
        len: usize,
    },

    /// `unite` or `jacobian` was called with no outputs, so there is no
    /// partial count to assemble against.
    #[error("cannot assemble a Jacobian from an empty output sequence")]
    EmptySequence,
}
