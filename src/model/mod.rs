//! Regression model: network topology and the loaded inference engine.
//!
//! Architecture:
//! ```text
//!   10kx_weights.bin
//!         │  BinFileRecorder + topology check
//!         ▼
//!   ┌──────────────┐      ┌───────────────┐
//!   │ HtsPredictor │ ───► │   HtsModel    │  conv/pool ×2 → fc1 ┐
//!   └──────────────┘      └───────────────┘  thickness → fc_t ──┴► fc2 → fc3
//!         ▲
//!         │  &InferenceTensor, thickness
//!   pipeline::Regressor
//! ```

pub mod network;
pub mod predictor;

pub use network::{HtsModel, HtsModelConfig};
pub use predictor::{HtsPredictor, InferenceBackend};
