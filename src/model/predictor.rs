use std::path::{Path, PathBuf};

use burn::{
    module::Module,
    record::{BinFileRecorder, FullPrecisionSettings},
    tensor::{backend::Backend, ElementConversion, Tensor, TensorData},
};
use burn_store::{ModuleSnapshot, PytorchStore};

use crate::error::{Error, Result};
use crate::pipeline::Regressor;
use crate::tensor::InferenceTensor;

use super::network::{HtsModel, HtsModelConfig};

/// Backend used by the application: plain CPU, no autodiff.
pub type InferenceBackend = burn::backend::NdArray<f32>;

type WeightsRecorder = BinFileRecorder<FullPrecisionSettings>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeightsFormat {
    Burn,
    PyTorch,
}

impl WeightsFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pth") || ext.eq_ignore_ascii_case("pt") => {
                Self::PyTorch
            }
            _ => Self::Burn,
        }
    }
}

/// Inference engine wrapping a loaded [`HtsModel`].
///
/// Built once at startup and shared read-only afterwards.
pub struct HtsPredictor<B: Backend = InferenceBackend> {
    model: HtsModel<B>,
    config: HtsModelConfig,
    device: B::Device,
}

impl<B: Backend> HtsPredictor<B> {
    /// Wrap an already-built model.
    pub fn new(model: HtsModel<B>, config: HtsModelConfig, device: B::Device) -> Self {
        Self {
            model,
            config,
            device,
        }
    }

    /// Load weights and check them against the fixed topology.
    ///
    /// The loader follows the file extension:
    ///
    /// * `.pth` / `.pt`: a PyTorch `state_dict` as written by `torch.save`.
    ///   Keys are matched by name and `Linear` weights are transposed from
    ///   `[out, in]` to burn's `[in, out]`.
    /// * anything else: a burn binary record, always read from `<path>.bin`.
    ///
    /// # Errors
    ///
    /// [`Error::ModelLoad`] if the file is missing, cannot be decoded, or any
    /// parameter has the wrong shape.
    pub fn load(path: &Path, config: HtsModelConfig, device: &B::Device) -> Result<Self> {
        let format = WeightsFormat::from_path(path);
        let path = match format {
            WeightsFormat::Burn => path.with_extension("bin"),
            WeightsFormat::PyTorch => path.to_path_buf(),
        };
        let load_err = |reason: String| Error::ModelLoad {
            path: path.clone(),
            reason,
        };

        if !path.is_file() {
            return Err(load_err("file not found".to_string()));
        }

        let model = match format {
            WeightsFormat::Burn => config
                .init::<B>(device)
                .load_file(path.clone(), &WeightsRecorder::new(), device)
                .map_err(|e| load_err(format!("{e:?}")))?,
            WeightsFormat::PyTorch => {
                let mut model = config.init::<B>(device);
                let mut store = PytorchStore::from_file(&path);
                let applied = model
                    .load_from(&mut store)
                    .map_err(|e| load_err(e.to_string()))?;
                if !applied.unused.is_empty() {
                    log::warn!("Ignoring unknown checkpoint entries: {:?}", applied.unused);
                }
                model
            }
        };

        verify_topology(&model, &config).map_err(load_err)?;

        log::info!(
            "Loaded {format:?} weights from {} ({} parameters)",
            path.display(),
            model.num_params()
        );

        Ok(Self::new(model, config, device.clone()))
    }

    /// Write the current weights as a burn binary record at `<path>.bin`.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        let path = path.with_extension("bin");
        self.model
            .clone()
            .save_file(path.clone(), &WeightsRecorder::new())
            .map_err(|e| Error::ModelLoad {
                path: path.clone(),
                reason: format!("could not write record: {e:?}"),
            })?;
        Ok(path)
    }

    fn expected_shape(&self) -> [usize; 3] {
        [1, self.config.image_size, self.config.image_size]
    }
}

impl<B: Backend> Regressor for HtsPredictor<B> {
    fn predict(&self, tensor: &InferenceTensor, thickness: f32) -> Result<f32> {
        let expected = self.expected_shape();
        if tensor.shape() != expected {
            return Err(Error::ShapeMismatch {
                expected: format!("{expected:?}"),
                actual: format!("{:?}", tensor.shape()),
            });
        }

        let [channels, height, width] = expected;
        let images = Tensor::<B, 4>::from_data(
            TensorData::new(tensor.as_slice().to_vec(), [1, channels, height, width]),
            &self.device,
        );
        let thickness = Tensor::<B, 2>::from_data(TensorData::new(vec![thickness], [1, 1]), &self.device);

        let value: f32 = self.model.forward(images, thickness).into_scalar().elem();
        if !value.is_finite() {
            return Err(Error::NonFinitePrediction(value));
        }
        Ok(value)
    }
}

fn verify_topology<B: Backend>(
    model: &HtsModel<B>,
    config: &HtsModelConfig,
) -> std::result::Result<(), String> {
    let mismatches: Vec<String> = config
        .parameter_shapes()
        .into_iter()
        .zip(model.parameter_shapes())
        .filter(|((_, expected), (_, actual))| expected != actual)
        .map(|((name, expected), (_, actual))| {
            format!("{name}: expected {expected:?}, found {actual:?}")
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(format!("incompatible topology ({})", mismatches.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: usize = 16;

    fn small_predictor() -> HtsPredictor<InferenceBackend> {
        let device = Default::default();
        let config = HtsModelConfig::new().with_image_size(SMALL);
        let model = config.init::<InferenceBackend>(&device);
        HtsPredictor::new(model, config, device)
    }

    /// `torch.save` state dict for a 4x4 input, written by
    /// `testdata/make_pth_fixture.py`. Its output is `0.5 - (36 + 10 * relu(t))`
    /// for an all-ones image.
    fn checkpoint() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join("hts_4px.pth")
    }

    fn ramp(size: usize) -> InferenceTensor {
        let data = (0..size * size).map(|i| (i % size) as f32 / size as f32).collect();
        InferenceTensor::new([1, size, size], data).unwrap()
    }

    #[test]
    fn test_rejects_wrong_spatial_size() {
        let predictor = small_predictor();
        let err = predictor.predict(&ramp(8), 1.0).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_rejects_extra_channels() {
        let predictor = small_predictor();
        let tensor = InferenceTensor::zeros([2, SMALL, SMALL]);
        let err = predictor.predict(&tensor, 1.0).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_reference_predictor_rejects_small_tensor() {
        let device = Default::default();
        let config = HtsModelConfig::new();
        let model = config.init::<InferenceBackend>(&device);
        let predictor = HtsPredictor::new(model, config, device);

        let err = predictor.predict(&ramp(128), 2.5).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_inference_is_deterministic() {
        let predictor = small_predictor();
        let tensor = ramp(SMALL);

        let first = predictor.predict(&tensor, 2.5).unwrap();
        let second = predictor.predict(&tensor, 2.5).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_save_and_load_preserve_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = small_predictor();
        let written = predictor.save(&dir.path().join("weights")).unwrap();
        assert_eq!(written.extension().and_then(|e| e.to_str()), Some("bin"));

        let config = HtsModelConfig::new().with_image_size(SMALL);
        let reloaded =
            HtsPredictor::<InferenceBackend>::load(&written, config, &Default::default()).unwrap();

        let tensor = ramp(SMALL);
        assert_eq!(
            predictor.predict(&tensor, 3.0).unwrap(),
            reloaded.predict(&tensor, 3.0).unwrap()
        );
    }

    #[test]
    fn test_load_rejects_other_topology() {
        let dir = tempfile::tempdir().unwrap();
        let written = small_predictor().save(&dir.path().join("weights")).unwrap();

        let config = HtsModelConfig::new().with_image_size(SMALL * 2);
        let err = HtsPredictor::<InferenceBackend>::load(&written, config, &Default::default())
            .err()
            .unwrap();
        match err {
            Error::ModelLoad { reason, .. } => assert!(reason.contains("fc1.weight"), "{reason}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = HtsPredictor::<InferenceBackend>::load(
            &dir.path().join("absent.bin"),
            HtsModelConfig::new(),
            &Default::default(),
        );
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }

    #[test]
    fn test_load_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.bin");
        std::fs::write(&path, b"definitely not a burn record").unwrap();

        let result = HtsPredictor::<InferenceBackend>::load(
            &path,
            HtsModelConfig::new().with_image_size(SMALL),
            &Default::default(),
        );
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(WeightsFormat::from_path(Path::new("10kx_weights.pth")), WeightsFormat::PyTorch);
        assert_eq!(WeightsFormat::from_path(Path::new("model.PT")), WeightsFormat::PyTorch);
        assert_eq!(WeightsFormat::from_path(Path::new("10kx_weights.bin")), WeightsFormat::Burn);
        assert_eq!(WeightsFormat::from_path(Path::new("weights")), WeightsFormat::Burn);
    }

    #[test]
    fn test_load_pytorch_checkpoint() {
        let config = HtsModelConfig::new().with_image_size(4);
        let predictor =
            HtsPredictor::<InferenceBackend>::load(&checkpoint(), config, &Default::default())
                .unwrap();

        let ones = InferenceTensor::new([1, 4, 4], vec![1.0; 16]).unwrap();
        assert_eq!(predictor.predict(&ones, 2.0).unwrap(), -55.5);
        assert_eq!(predictor.predict(&ones, -3.0).unwrap(), -35.5);
    }

    #[test]
    fn test_non_finite_output_is_an_error() {
        let config = HtsModelConfig::new().with_image_size(4);
        let predictor =
            HtsPredictor::<InferenceBackend>::load(&checkpoint(), config, &Default::default())
                .unwrap();

        // The thickness branch carries infinity straight to the output.
        let ones = InferenceTensor::new([1, 4, 4], vec![1.0; 16]).unwrap();
        let err = predictor.predict(&ones, f32::INFINITY).unwrap_err();
        assert!(matches!(err, Error::NonFinitePrediction(_)));
    }

    #[test]
    fn test_pytorch_checkpoint_with_other_topology() {
        let config = HtsModelConfig::new().with_image_size(8);
        let result = HtsPredictor::<InferenceBackend>::load(&checkpoint(), config, &Default::default());
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }

    #[test]
    fn test_missing_pytorch_checkpoint_keeps_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("10kx_weights.pth");
        let err = HtsPredictor::<InferenceBackend>::load(&path, HtsModelConfig::new(), &Default::default())
            .err()
            .unwrap();
        match err {
            Error::ModelLoad { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_garbage_pytorch_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.pth");
        std::fs::write(&path, b"not a torch archive").unwrap();

        let result = HtsPredictor::<InferenceBackend>::load(
            &path,
            HtsModelConfig::new().with_image_size(4),
            &Default::default(),
        );
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }
}
