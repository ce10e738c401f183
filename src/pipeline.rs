use std::fmt;

use crate::error::{Error, Result};
use crate::tensor::InferenceTensor;

// ---------------------------------------------------------------------------
// Regressor – the injected model service
// ---------------------------------------------------------------------------

/// Anything that can turn a preprocessed tensor and a layer thickness into a
/// critical-current estimate.
///
/// Implementations must not mutate themselves during inference.
pub trait Regressor {
    fn predict(&self, tensor: &InferenceTensor, thickness: f32) -> Result<f32>;
}

// ---------------------------------------------------------------------------
// Prediction – formatted output
// ---------------------------------------------------------------------------

/// Critical current in amperes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction(pub f32);

impl Prediction {
    /// Value shown to the user: truncated toward zero, not rounded.
    pub fn whole_amperes(&self) -> i64 {
        self.0.trunc() as i64
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicted Critical Current: {} A", self.whole_amperes())
    }
}

// ---------------------------------------------------------------------------
// Input handling
// ---------------------------------------------------------------------------

/// Parse the free-text thickness field (micrometres).
///
/// Surrounding whitespace is ignored. Anything that is not a finite `f32`
/// is rejected with [`Error::Validation`].
pub fn parse_thickness(text: &str) -> Result<f32> {
    let invalid = |reason: &str| Error::Validation {
        input: text.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid("thickness is empty"));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| invalid("thickness is not a number"))?;
    let value = value as f32;
    if !value.is_finite() {
        return Err(invalid("thickness must be a finite number"));
    }
    Ok(value)
}

/// Run the regressor on an already validated thickness.
pub fn predict(
    regressor: &dyn Regressor,
    tensor: &InferenceTensor,
    thickness: f32,
) -> Result<Prediction> {
    let value = regressor.predict(tensor, thickness)?;
    log::info!("Predicted {value:.3} A for thickness {thickness} µm");
    Ok(Prediction(value))
}
