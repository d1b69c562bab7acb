//! Configuration system for iopredict.
//! TOML-based, 3-layer resolution: env > config file > defaults.

pub mod model_config;
pub mod output_config;
pub mod predict_config;
pub mod settings;

pub use model_config::ModelConfig;
pub use output_config::OutputConfig;
pub use predict_config::PredictConfig;
pub use settings::ModelSettings;
