use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// InferenceTensor – normalized image grid fed to the network
// ---------------------------------------------------------------------------

/// A dense `f32` grid laid out as `[channels, height, width]` (row-major).
///
/// Backend-agnostic on purpose: the preprocessor produces it without knowing
/// anything about burn, and the model converts it at the inference boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceTensor {
    shape: [usize; 3],
    data: Vec<f32>,
}

impl InferenceTensor {
    /// Wrap `data` with the given `[channels, height, width]` shape.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the element count does not
    /// match the shape.
    pub fn new(shape: [usize; 3], data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                expected: format!("{expected} elements for shape {shape:?}"),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { shape, data })
    }

    /// All-zero tensor of the given shape.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.iter().product()],
        }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at channel `c`, row `y`, column `x`.
    pub fn get(&self, c: usize, y: usize, x: usize) -> Option<f32> {
        let [channels, height, width] = self.shape;
        if c >= channels || y >= height || x >= width {
            return None;
        }
        self.data.get((c * height + y) * width + x).copied()
    }

    /// Smallest and largest element, or `None` for an empty tensor.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        if self.data.is_empty() {
            return None;
        }
        let min = self.data.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_element_count() {
        let err = InferenceTensor::new([1, 4, 4], vec![0.0; 15]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_indexing_is_row_major() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let tensor = InferenceTensor::new([1, 3, 4], data).unwrap();

        assert_eq!(tensor.get(0, 0, 0), Some(0.0));
        assert_eq!(tensor.get(0, 1, 0), Some(4.0));
        assert_eq!(tensor.get(0, 2, 3), Some(11.0));
        assert_eq!(tensor.get(0, 3, 0), None);
        assert_eq!(tensor.get(1, 0, 0), None);
    }

    #[test]
    fn test_min_max() {
        let tensor = InferenceTensor::new([1, 1, 3], vec![0.5, -1.0, 2.0]).unwrap();
        assert_eq!(tensor.min_max(), Some((-1.0, 2.0)));
        assert_eq!(InferenceTensor::zeros([1, 0, 0]).min_max(), None);
    }
}
