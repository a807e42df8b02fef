pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod train;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::matrix::Matrix;
pub use math::init::Initializer;
pub use activation::activation::Activation;
pub use network::network::{Activations, Network};
pub use network::spec::{LayerSpec, NetworkSpec};
pub use train::dataset::Dataset;
pub use train::loop_fn::train_loop;
