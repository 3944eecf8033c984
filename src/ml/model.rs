use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::{log_softmax, relu, softmax},
};
use serde::{Deserialize, Serialize};

/// Which convolutional stack to build. All variants share the
/// 28×28×1 input, the dense-512 head and the softmax output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierVariant {
    /// conv32 → conv64 (valid) → pool → dropout .25
    Shallow,
    /// three [conv → pool] blocks with 32, 64, 128 filters (same)
    ThreeBlock,
    /// two [conv → conv → pool → dropout .25] blocks with 32, 64 filters (same)
    FourConv,
}

struct BlockLayout {
    channels:     &'static [usize],
    same_padding: bool,
    dropout:      f64,
}

const SHALLOW: [BlockLayout; 1] = [
    BlockLayout { channels: &[32, 64], same_padding: false, dropout: 0.25 },
];

const THREE_BLOCK: [BlockLayout; 3] = [
    BlockLayout { channels: &[32], same_padding: true, dropout: 0.0 },
    BlockLayout { channels: &[64], same_padding: true, dropout: 0.0 },
    BlockLayout { channels: &[128], same_padding: true, dropout: 0.0 },
];

const FOUR_CONV: [BlockLayout; 2] = [
    BlockLayout { channels: &[32, 32], same_padding: true, dropout: 0.25 },
    BlockLayout { channels: &[64, 64], same_padding: true, dropout: 0.25 },
];

impl ClassifierVariant {
    fn layout(self) -> &'static [BlockLayout] {
        match self {
            ClassifierVariant::Shallow    => &SHALLOW,
            ClassifierVariant::ThreeBlock => &THREE_BLOCK,
            ClassifierVariant::FourConv   => &FOUR_CONV,
        }
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct GlyphCnnConfig {
    pub num_classes: usize,
    pub variant:     ClassifierVariant,
    #[config(default = 28)]
    pub input_side:  usize,
    #[config(default = 512)]
    pub hidden:      usize,
    #[config(default = 0.5)]
    pub dropout:     f64,
}

impl GlyphCnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> GlyphCnn<B> {
        let mut in_channels = 1;
        let mut side        = self.input_side;
        let mut blocks      = Vec::new();

        for layout in self.variant.layout() {
            let padding = if layout.same_padding { PaddingConfig2d::Same } else { PaddingConfig2d::Valid };
            let mut convs = Vec::with_capacity(layout.channels.len());
            for &out_channels in layout.channels {
                convs.push(
                    Conv2dConfig::new([in_channels, out_channels], [3, 3])
                        .with_padding(padding.clone())
                        .init(device),
                );
                in_channels = out_channels;
                if !layout.same_padding {
                    side -= 2;
                }
            }
            side /= 2;
            blocks.push(ConvBlock {
                convs,
                pool:    MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
                dropout: DropoutConfig::new(layout.dropout).init(),
            });
        }

        let flattened = in_channels * side * side;
        GlyphCnn {
            blocks,
            fc1:          LinearConfig::new(flattened, self.hidden).init(device),
            head_dropout: DropoutConfig::new(self.dropout).init(),
            fc2:          LinearConfig::new(self.hidden, self.num_classes).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    pub convs:   Vec<Conv2d<B>>,
    pub pool:    MaxPool2d,
    pub dropout: Dropout,
}

impl<B: Backend> ConvBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = x;
        for conv in &self.convs {
            x = relu(conv.forward(x));
        }
        self.dropout.forward(self.pool.forward(x))
    }
}

#[derive(Module, Debug)]
pub struct GlyphCnn<B: Backend> {
    pub blocks:       Vec<ConvBlock<B>>,
    pub fc1:          Linear<B>,
    pub head_dropout: Dropout,
    pub fc2:          Linear<B>,
}

impl<B: Backend> GlyphCnn<B> {
    /// images: [batch, 1, side, side] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = images;
        for block in &self.blocks {
            x = block.forward(x);
        }
        let x = x.flatten::<2>(1, 3);
        let x = self.head_dropout.forward(relu(self.fc1.forward(x)));
        self.fc2.forward(x)
    }

    /// Softmax over the class axis
    pub fn forward_probs(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        softmax(self.forward(images), 1)
    }

    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let loss   = categorical_cross_entropy(logits.clone(), targets);
        (loss, logits)
    }
}

/// Mean over the batch of `-Σ target · log softmax(logits)`.
pub fn categorical_cross_entropy<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    (log_softmax(logits, 1) * targets).sum_dim(1).mean().neg()
}

/// Number of rows whose argmax equals the integer label.
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns [batch, 1] — flatten to [batch] before comparing
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted.equal(labels).int().sum().into_scalar().elem::<i64>();
    correct as usize
}
