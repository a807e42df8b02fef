pub mod activation;

pub use activation::{Activation, LEAKY_SLOPE};
