use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of independent variables a table may have
pub const MAX_TABLE_DIMENSIONS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Table must have between 1 and 3 dimensions, got {0}")]
    InvalidDimensions(usize),

    #[error("Breakpoints for dimension {0} are empty")]
    EmptyBreakpoints(usize),

    #[error("Breakpoints for dimension {0} must be finite and strictly increasing")]
    UnorderedBreakpoints(usize),

    #[error("Table expects {expected} values but {actual} were given")]
    ValueCountMismatch { expected: usize, actual: usize },

    #[error("Table contains a non-finite value at index {0}")]
    NonFiniteValue(usize),
}

/// Breakpoint table over one to three independent variables.
///
/// Values are stored row-major with the last independent variable varying
/// fastest. Lookups use multilinear interpolation and clamp every input to the
/// breakpoint domain, so queries outside the table return the boundary value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable", into = "RawTable")]
pub struct CoefficientTable {
    breakpoints: Vec<Vec<f64>>,
    values: Vec<f64>,
    strides: Vec<usize>,
}

/// Serialized table layouts. A bare list of `[x, y]` pairs is accepted for
/// one-dimensional tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTable {
    Grid {
        breakpoints: Vec<Vec<f64>>,
        values: Vec<f64>,
    },
    Pairs(Vec<(f64, f64)>),
}

impl TryFrom<RawTable> for CoefficientTable {
    type Error = TableError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        match raw {
            RawTable::Grid {
                breakpoints,
                values,
            } => Self::new(breakpoints, values),
            RawTable::Pairs(pairs) => {
                let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
                Self::new(vec![x], y)
            }
        }
    }
}

impl From<CoefficientTable> for RawTable {
    fn from(table: CoefficientTable) -> Self {
        RawTable::Grid {
            breakpoints: table.breakpoints,
            values: table.values,
        }
    }
}

impl CoefficientTable {
    pub fn new(breakpoints: Vec<Vec<f64>>, values: Vec<f64>) -> Result<Self, TableError> {
        let dims = breakpoints.len();
        if dims == 0 || dims > MAX_TABLE_DIMENSIONS {
            return Err(TableError::InvalidDimensions(dims));
        }

        for (dim, axis) in breakpoints.iter().enumerate() {
            if axis.is_empty() {
                return Err(TableError::EmptyBreakpoints(dim));
            }
            let ordered = axis.iter().all(|b| b.is_finite())
                && axis.windows(2).all(|pair| pair[1] > pair[0]);
            if !ordered {
                return Err(TableError::UnorderedBreakpoints(dim));
            }
        }

        let expected: usize = breakpoints.iter().map(Vec::len).product();
        if values.len() != expected {
            return Err(TableError::ValueCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(TableError::NonFiniteValue(index));
        }

        let mut strides = vec![1; dims];
        for dim in (0..dims.saturating_sub(1)).rev() {
            strides[dim] = strides[dim + 1] * breakpoints[dim + 1].len();
        }

        Ok(Self {
            breakpoints,
            values,
            strides,
        })
    }

    /// One-dimensional table from `(x, y)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, TableError> {
        let x = pairs.iter().map(|p| p.0).collect();
        let y = pairs.iter().map(|p| p.1).collect();
        Self::new(vec![x], y)
    }

    /// Two-dimensional table from row breakpoints, column breakpoints and rows of data
    pub fn from_rows(
        row_breakpoints: Vec<f64>,
        column_breakpoints: Vec<f64>,
        rows: &[Vec<f64>],
    ) -> Result<Self, TableError> {
        let values = rows.iter().flatten().copied().collect();
        Self::new(vec![row_breakpoints, column_breakpoints], values)
    }

    /// A table that returns the same value everywhere
    pub fn constant(value: f64) -> Result<Self, TableError> {
        Self::new(vec![vec![0.0]], vec![value])
    }

    pub fn dimensions(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn breakpoints(&self, dim: usize) -> Option<&[f64]> {
        self.breakpoints.get(dim).map(Vec::as_slice)
    }

    /// Interpolated value at `inputs`.
    ///
    /// Missing inputs are treated as the lower bound of their dimension and
    /// extra inputs are ignored. NaN inputs also map to the lower bound.
    pub fn lookup(&self, inputs: &[f64]) -> f64 {
        let dims = self.breakpoints.len();
        let mut lower = [0usize; MAX_TABLE_DIMENSIONS];
        let mut frac = [0.0f64; MAX_TABLE_DIMENSIONS];

        for (dim, axis) in self.breakpoints.iter().enumerate() {
            let x = inputs.get(dim).copied().unwrap_or(f64::NAN);
            let (index, fraction) = locate(axis, x);
            lower[dim] = index;
            frac[dim] = fraction;
        }

        let mut result = 0.0;
        for corner in 0..(1usize << dims) {
            let mut weight = 1.0;
            let mut offset = 0;
            for dim in 0..dims {
                let upper = (corner >> dim) & 1 == 1;
                let last = self.breakpoints[dim].len() - 1;
                let index = if upper {
                    (lower[dim] + 1).min(last)
                } else {
                    lower[dim]
                };
                weight *= if upper { frac[dim] } else { 1.0 - frac[dim] };
                offset += index * self.strides[dim];
            }
            if weight != 0.0 {
                result += weight * self.values[offset];
            }
        }
        result
    }

    pub fn lookup1(&self, x: f64) -> f64 {
        self.lookup(&[x])
    }

    pub fn lookup2(&self, x: f64, y: f64) -> f64 {
        self.lookup(&[x, y])
    }

    pub fn lookup3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.lookup(&[x, y, z])
    }
}

/// Lower bracketing index and interpolation fraction for `x`, clamped to the axis.
fn locate(axis: &[f64], x: f64) -> (usize, f64) {
    let n = axis.len();
    if n == 1 || x.is_nan() || x <= axis[0] {
        return (0, 0.0);
    }
    if x >= axis[n - 1] {
        return (n - 2, 1.0);
    }
    let upper = axis.partition_point(|&b| b <= x);
    let index = upper.saturating_sub(1).min(n - 2);
    let span = axis[index + 1] - axis[index];
    (index, ((x - axis[index]) / span).clamp(0.0, 1.0))
}
