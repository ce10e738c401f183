//! Regression network for the 10kx micrographs.
//!
//! Field names match the trained checkpoint so records load by name.

use burn::{
    config::Config,
    module::{Module, Param},
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// Output channels of the first convolution.
pub const CONV1_CHANNELS: usize = 32;
/// Output channels of the second convolution.
pub const CONV2_CHANNELS: usize = 64;
/// Width of the image-feature branch.
pub const IMAGE_FEATURES: usize = 128;
/// Width of the thickness branch.
pub const THICKNESS_FEATURES: usize = 16;
/// Width of the joint hidden layer.
pub const HIDDEN_FEATURES: usize = 64;

/// Network configuration.
///
/// Only the input side is configurable; every layer width is fixed by the
/// trained weights.
#[derive(Config, Debug)]
pub struct HtsModelConfig {
    /// Side of the square single-channel input.
    #[config(default = 256)]
    pub image_size: usize,
}

impl HtsModelConfig {
    /// Length of the flattened feature map after both conv/pool stages.
    pub fn flattened_features(&self) -> usize {
        let side = self.image_size / 4;
        CONV2_CHANNELS * side * side
    }

    /// Parameter shapes in burn's layout (linear weights are `[d_in, d_out]`).
    pub fn parameter_shapes(&self) -> Vec<(&'static str, Vec<usize>)> {
        vec![
            ("conv1.weight", vec![CONV1_CHANNELS, 1, 3, 3]),
            ("conv1.bias", vec![CONV1_CHANNELS]),
            ("conv2.weight", vec![CONV2_CHANNELS, CONV1_CHANNELS, 3, 3]),
            ("conv2.bias", vec![CONV2_CHANNELS]),
            ("fc1.weight", vec![self.flattened_features(), IMAGE_FEATURES]),
            ("fc1.bias", vec![IMAGE_FEATURES]),
            ("fc_thickness.weight", vec![1, THICKNESS_FEATURES]),
            ("fc_thickness.bias", vec![THICKNESS_FEATURES]),
            ("fc2.weight", vec![IMAGE_FEATURES + THICKNESS_FEATURES, HIDDEN_FEATURES]),
            ("fc2.bias", vec![HIDDEN_FEATURES]),
            ("fc3.weight", vec![HIDDEN_FEATURES, 1]),
            ("fc3.bias", vec![1]),
        ]
    }

    /// Build the network with freshly initialised parameters.
    pub fn init<B: Backend>(&self, device: &B::Device) -> HtsModel<B> {
        // 3x3 with `Same` padding is padding 1 on every side.
        HtsModel {
            conv1: Conv2dConfig::new([1, CONV1_CHANNELS], [3, 3])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            conv2: Conv2dConfig::new([CONV1_CHANNELS, CONV2_CHANNELS], [3, 3])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            fc1: LinearConfig::new(self.flattened_features(), IMAGE_FEATURES).init(device),
            fc_thickness: LinearConfig::new(1, THICKNESS_FEATURES).init(device),
            fc2: LinearConfig::new(IMAGE_FEATURES + THICKNESS_FEATURES, HIDDEN_FEATURES)
                .init(device),
            fc3: LinearConfig::new(HIDDEN_FEATURES, 1).init(device),
            activation: Relu::new(),
        }
    }
}

/// Two-branch CNN regressor.
///
/// # Architecture
/// - Conv 3x3 (1 → 32) + ReLU + MaxPool 2x2
/// - Conv 3x3 (32 → 64) + ReLU + MaxPool 2x2
/// - Flatten → FC (→ 128) + ReLU
/// - Thickness: FC (1 → 16) + ReLU
/// - Concat (144) → FC (→ 64) + ReLU → FC (→ 1)
#[derive(Module, Debug)]
pub struct HtsModel<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    pool: MaxPool2d,

    fc1: Linear<B>,
    fc_thickness: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,

    activation: Relu,
}

impl<B: Backend> HtsModel<B> {
    /// Forward pass.
    ///
    /// - `images`: `[batch, 1, size, size]`
    /// - `thickness`: `[batch, 1]`
    ///
    /// Returns `[batch, 1]`.
    pub fn forward(&self, images: Tensor<B, 4>, thickness: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.conv1.forward(images);
        let x = self.pool.forward(self.activation.forward(x));

        let x = self.conv2.forward(x);
        let x = self.pool.forward(self.activation.forward(x));

        let x: Tensor<B, 2> = x.flatten(1, 3);
        let x = self.activation.forward(self.fc1.forward(x));

        let t = self.activation.forward(self.fc_thickness.forward(thickness));

        let combined = Tensor::cat(vec![x, t], 1);
        let x = self.activation.forward(self.fc2.forward(combined));
        self.fc3.forward(x)
    }

    /// Actual parameter shapes, in the same order as
    /// [`HtsModelConfig::parameter_shapes`].
    pub fn parameter_shapes(&self) -> Vec<(&'static str, Vec<usize>)> {
        vec![
            ("conv1.weight", self.conv1.weight.val().dims().to_vec()),
            ("conv1.bias", bias_dims(&self.conv1.bias)),
            ("conv2.weight", self.conv2.weight.val().dims().to_vec()),
            ("conv2.bias", bias_dims(&self.conv2.bias)),
            ("fc1.weight", self.fc1.weight.val().dims().to_vec()),
            ("fc1.bias", bias_dims(&self.fc1.bias)),
            ("fc_thickness.weight", self.fc_thickness.weight.val().dims().to_vec()),
            ("fc_thickness.bias", bias_dims(&self.fc_thickness.bias)),
            ("fc2.weight", self.fc2.weight.val().dims().to_vec()),
            ("fc2.bias", bias_dims(&self.fc2.bias)),
            ("fc3.weight", self.fc3.weight.val().dims().to_vec()),
            ("fc3.bias", bias_dims(&self.fc3.bias)),
        ]
    }
}

fn bias_dims<B: Backend>(bias: &Option<Param<Tensor<B, 1>>>) -> Vec<usize> {
    bias.as_ref()
        .map(|b| b.val().dims().to_vec())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_reference_feature_width() {
        assert_eq!(HtsModelConfig::new().flattened_features(), 262_144);
    }

    #[test]
    fn test_init_matches_declared_shapes() {
        let config = HtsModelConfig::new().with_image_size(16);
        let model = config.init::<TestBackend>(&Default::default());
        assert_eq!(model.parameter_shapes(), config.parameter_shapes());
    }

    #[test]
    fn test_forward_output_shape() {
        let device = Default::default();
        let config = HtsModelConfig::new().with_image_size(16);
        let model = config.init::<TestBackend>(&device);

        let images = Tensor::<TestBackend, 4>::from_data(
            TensorData::new(vec![0.5f32; 2 * 16 * 16], [2, 1, 16, 16]),
            &device,
        );
        let thickness =
            Tensor::<TestBackend, 2>::from_data(TensorData::new(vec![1.0f32, 2.5], [2, 1]), &device);

        let out = model.forward(images, thickness);
        assert_eq!(out.dims(), [2, 1]);
    }

    fn param<const D: usize>(
        values: Vec<f32>,
        shape: [usize; D],
        device: &<TestBackend as Backend>::Device,
    ) -> Param<Tensor<TestBackend, D>> {
        Param::from_tensor(Tensor::from_data(TensorData::new(values, shape), device))
    }

    /// `len` zeros with `entries` set.
    fn sparse(len: usize, entries: &[(usize, f32)]) -> Vec<f32> {
        let mut values = vec![0.0; len];
        for &(index, value) in entries {
            values[index] = value;
        }
        values
    }

    /// 4x4-input network whose output is `0.5 - (36 + 10 * relu(t))` for an
    /// all-ones image. Linear weights are in burn's `[d_in, d_out]` layout.
    fn hand_weighted(device: &<TestBackend as Backend>::Device) -> HtsModel<TestBackend> {
        let config = HtsModelConfig::new().with_image_size(4);
        let features = config.flattened_features();
        let mut model = config.init::<TestBackend>(device);

        // Channel 0 sums its 3x3 neighbourhood: 9 inside, 6 on edges, 4 in corners.
        let ones: Vec<(usize, f32)> = (0..9).map(|i| (i, 1.0)).collect();
        model.conv1.weight = param(sparse(CONV1_CHANNELS * 9, &ones), [CONV1_CHANNELS, 1, 3, 3], device);
        model.conv1.bias = Some(param(vec![0.0; CONV1_CHANNELS], [CONV1_CHANNELS], device));

        // Channel 0 sums the pooled 2x2 map of 9s; channel 1 is a negative constant.
        model.conv2.weight = param(
            sparse(CONV2_CHANNELS * CONV1_CHANNELS * 9, &ones),
            [CONV2_CHANNELS, CONV1_CHANNELS, 3, 3],
            device,
        );
        model.conv2.bias = Some(param(sparse(CONV2_CHANNELS, &[(1, -7.0)]), [CONV2_CHANNELS], device));

        // Image feature 0 = flat[0] + flat[1].
        model.fc1.weight = param(
            sparse(features * IMAGE_FEATURES, &[(0, 1.0), (IMAGE_FEATURES, 1.0)]),
            [features, IMAGE_FEATURES],
            device,
        );
        model.fc1.bias = Some(param(vec![0.0; IMAGE_FEATURES], [IMAGE_FEATURES], device));

        model.fc_thickness.weight =
            param(sparse(THICKNESS_FEATURES, &[(0, 1.0)]), [1, THICKNESS_FEATURES], device);
        model.fc_thickness.bias =
            Some(param(vec![0.0; THICKNESS_FEATURES], [THICKNESS_FEATURES], device));

        // Hidden 0 = image[0] + 10 * thickness[0]; thickness follows the image features.
        let joint = IMAGE_FEATURES + THICKNESS_FEATURES;
        model.fc2.weight = param(
            sparse(
                joint * HIDDEN_FEATURES,
                &[(0, 1.0), (IMAGE_FEATURES * HIDDEN_FEATURES, 10.0)],
            ),
            [joint, HIDDEN_FEATURES],
            device,
        );
        model.fc2.bias = Some(param(vec![0.0; HIDDEN_FEATURES], [HIDDEN_FEATURES], device));

        model.fc3.weight = param(sparse(HIDDEN_FEATURES, &[(0, -1.0)]), [HIDDEN_FEATURES, 1], device);
        model.fc3.bias = Some(param(vec![0.5], [1], device));

        model
    }

    #[test]
    fn test_forward_with_hand_set_weights() {
        let device = Default::default();
        let model = hand_weighted(&device);

        let images = Tensor::<TestBackend, 4>::from_data(
            TensorData::new(vec![1.0f32; 2 * 16], [2, 1, 4, 4]),
            &device,
        );
        let thickness =
            Tensor::<TestBackend, 2>::from_data(TensorData::new(vec![2.0f32, -3.0], [2, 1]), &device);

        let out: Vec<f32> = model.forward(images, thickness).into_data().to_vec().unwrap();
        // 0.5 - (36 + 10 * 2) and 0.5 - (36 + 10 * relu(-3)); the output layer
        // stays negative because it has no activation.
        assert_eq!(out, vec![-55.5, -35.5]);
    }

    #[test]
    fn test_forward_depends_on_image() {
        let device = Default::default();
        let model = hand_weighted(&device);

        // A single lit pixel in the corner: conv1 gives 1 in the top-left
        // quadrant only, conv2 then sees one 1 in every window.
        let mut pixels = vec![0.0f32; 16];
        pixels[0] = 1.0;
        let images =
            Tensor::<TestBackend, 4>::from_data(TensorData::new(pixels, [1, 1, 4, 4]), &device);
        let thickness = Tensor::<TestBackend, 2>::from_data(TensorData::new(vec![0.0f32], [1, 1]), &device);

        let out: Vec<f32> = model.forward(images, thickness).into_data().to_vec().unwrap();
        assert_eq!(out, vec![-0.5]);
    }
}
