pub mod init;
pub mod matrix;

pub use init::Initializer;
pub use matrix::Matrix;
