use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;
use crate::filters::kernel::{Kernel, StructuringElement};

/// The four Laplacian kernels offered by the sharpening demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaplacianKernel {
    /// 8-neighbour, positive center
    #[default]
    One,
    /// 8-neighbour, negative center
    Two,
    /// 4-neighbour, positive center
    Three,
    /// 4-neighbour, negative center
    Four,
}

impl LaplacianKernel {
    pub const ALL: [LaplacianKernel; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    pub fn weights(self) -> [i32; 9] {
        match self {
            Self::One => [-1, -1, -1, -1, 8, -1, -1, -1, -1],
            Self::Two => [1, 1, 1, 1, -8, 1, 1, 1, 1],
            Self::Three => [0, -1, 0, -1, 4, -1, 0, -1, 0],
            Self::Four => [0, 1, 0, 1, -4, 1, 0, 1, 0],
        }
    }

    pub fn kernel(self) -> Kernel {
        Kernel::fixed_3x3(self.weights())
    }

    /// Numeric key as shown in the kernel selector
    pub fn key(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Rows of the matrix with weights separated by spaces
    pub fn matrix_rows(self) -> Vec<String> {
        format_matrix(&self.weights(), 3)
    }
}

impl fmt::Display for LaplacianKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for LaplacianKernel {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            "3" => Ok(Self::Three),
            "4" => Ok(Self::Four),
            other => Err(ProcessingError::UnknownKernel(other.to_string())),
        }
    }
}

/// High-pass kernel used to render edge maps in the morphology demo
pub fn edge_map_kernel() -> Kernel {
    LaplacianKernel::One.kernel()
}

/// Format a row-major square matrix, one string per row
pub fn format_matrix<T: fmt::Display>(values: &[T], size: usize) -> Vec<String> {
    values
        .chunks(size.max(1))
        .map(|row| {
            row.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Rows of a structuring element, for display
pub fn element_rows(element: &StructuringElement) -> Vec<String> {
    format_matrix(&element.flags(), element.size())
}
