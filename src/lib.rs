//! # hts-predictor
//!
//! Critical-current prediction for superconducting tapes from 10kx
//! micrographs and a layer thickness.
//!
//! The library is GUI-agnostic: it covers preprocessing, the regression
//! network, and the application state that the desktop shell renders.
//!
//! ## Example
//!
//! ```no_run
//! use hts_predictor::{
//!     model::{HtsModelConfig, HtsPredictor, InferenceBackend},
//!     pipeline, preprocess, DegeneratePolicy,
//! };
//!
//! # fn main() -> hts_predictor::Result<()> {
//! let predictor = HtsPredictor::<InferenceBackend>::load(
//!     "assets/10kx_weights.pth".as_ref(),
//!     HtsModelConfig::new(),
//!     &Default::default(),
//! )?;
//! let image = preprocess::preprocess("sample.tif", DegeneratePolicy::Reject)?;
//! let thickness = pipeline::parse_thickness("2.5")?;
//! let prediction = pipeline::predict(&predictor, &image.tensor, thickness)?;
//! println!("{prediction}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod resources;
pub mod state;
pub mod tensor;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use pipeline::{Prediction, Regressor};
pub use preprocess::{DegeneratePolicy, PreprocessedImage};
pub use state::{AppState, Notice};
pub use tensor::InferenceTensor;
