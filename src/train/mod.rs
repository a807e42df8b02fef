pub mod backprop;
pub mod cost;
pub mod dataset;
pub mod epoch_stats;
pub mod finite_diff;
pub mod loop_fn;
pub mod rate_control;
pub mod train_config;
pub mod trainer;

pub use dataset::Dataset;
pub use epoch_stats::EpochStats;
pub use loop_fn::train_loop;
pub use rate_control::{ConstantRate, RateControl, RateSchedule, VolatilityRate};
pub use train_config::TrainConfig;
pub use trainer::train_epoch;
