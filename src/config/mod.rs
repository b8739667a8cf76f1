//! 示例程序配置

mod sample_config;

pub use sample_config::{ConfigError, ConfigSource, SampleConfig, WaitMode, DEFAULT_CONFIG_FILE};
