//! 配置管理模块
//!
//! 提供注册层配置（环境变量 / YAML）以及端点清单文件的加载。

mod types;
mod yaml;

pub use types::{
    parse_flag, RegistryConfig, DEFAULT_URL_ROOT, ENV_DEBUG, ENV_LOG_LEVEL, ENV_URL_ROOT,
};
pub use yaml::{
    load_config, load_manifest, parse_config_yaml, parse_manifest_json, parse_manifest_yaml,
    ConfigError,
};
