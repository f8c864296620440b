use crate::error::{ProcessingError, Result};

/// Square, odd-sized convolution kernel stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    pub fn new(weights: Vec<f32>) -> Result<Self> {
        let size = square_side(weights.len())?;
        Ok(Self { size, weights })
    }

    /// Convenience constructor for integer weights
    pub fn from_ints(weights: &[i32]) -> Result<Self> {
        Self::new(weights.iter().map(|&w| w as f32).collect())
    }

    pub(crate) fn fixed_3x3(weights: [i32; 9]) -> Self {
        Self {
            size: 3,
            weights: weights.iter().map(|&w| w as f32).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.size + col]
    }
}

/// Binary mask selecting which neighbourhood offsets take part in a
/// morphology reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    size: usize,
    flags: Vec<bool>,
}

impl StructuringElement {
    pub fn new(flags: &[u8]) -> Result<Self> {
        let size = square_side(flags.len())?;
        let flags = flags
            .iter()
            .enumerate()
            .map(|(index, &value)| match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(ProcessingError::InvalidElementFlag { index, value }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { size, flags })
    }

    /// Center plus its four direct neighbours
    pub fn plus() -> Self {
        Self {
            size: 3,
            flags: [0, 1, 0, 1, 1, 1, 0, 1, 0].iter().map(|&f| f == 1).collect(),
        }
    }

    /// Full 3x3 block
    pub fn full_block() -> Self {
        Self {
            size: 3,
            flags: vec![true; 9],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Active offsets as (dx, dy) relative to the center
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        let radius = self.radius() as isize;
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .map(move |(i, _)| {
                let row = (i / self.size) as isize;
                let col = (i % self.size) as isize;
                (col - radius, row - radius)
            })
    }

    /// Flags as 0/1 bytes, row-major
    pub fn flags(&self) -> Vec<u8> {
        self.flags.iter().map(|&f| f as u8).collect()
    }
}

/// Side length of a square with `len` cells; must be odd.
fn square_side(len: usize) -> Result<usize> {
    if len == 0 {
        return Err(ProcessingError::EmptyKernel);
    }
    let side = len.isqrt();
    if side * side != len {
        return Err(ProcessingError::KernelNotSquare { len });
    }
    if side % 2 == 0 {
        return Err(ProcessingError::KernelEvenSize { size: side });
    }
    Ok(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_requires_perfect_square() {
        let err = Kernel::from_ints(&[1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(err, ProcessingError::KernelNotSquare { len: 5 }));
    }

    #[test]
    fn kernel_requires_odd_size() {
        let err = Kernel::from_ints(&[0; 16]).unwrap_err();
        assert!(matches!(err, ProcessingError::KernelEvenSize { size: 4 }));
    }

    #[test]
    fn empty_kernel_is_rejected() {
        assert!(matches!(Kernel::new(vec![]), Err(ProcessingError::EmptyKernel)));
    }

    #[test]
    fn five_by_five_kernel_is_accepted() {
        let kernel = Kernel::new(vec![0.0; 25]).unwrap();
        assert_eq!(kernel.size(), 5);
        assert_eq!(kernel.radius(), 2);
    }

    #[test]
    fn element_rejects_non_binary_flags() {
        let err = StructuringElement::new(&[0, 1, 0, 1, 2, 1, 0, 1, 0]).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::InvalidElementFlag { index: 4, value: 2 }
        ));
    }

    #[test]
    fn plus_offsets_are_center_and_four_neighbours() {
        let offsets: Vec<_> = StructuringElement::plus().offsets().collect();
        assert_eq!(offsets, vec![(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)]);
    }

    #[test]
    fn parsed_plus_matches_builtin() {
        let parsed = StructuringElement::new(&[0, 1, 0, 1, 1, 1, 0, 1, 0]).unwrap();
        assert_eq!(parsed, StructuringElement::plus());
        assert_eq!(StructuringElement::full_block().flags(), vec![1; 9]);
    }
}
