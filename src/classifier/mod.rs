// Classifier module
// Loading and subscribing to the pretrained sound classifier

pub mod backend;
pub mod bridge;
pub mod remote;

pub use backend::{
    frame_channel, AudioClassifier, ClassifierError, ClassifierLoader, FrameSink, ListenOptions,
};
pub use bridge::{BridgedClassifier, FixedLabelsLoader, FrameBridge};
pub use remote::{HttpModelLoader, ModelDescriptor, ModelMetadata};
