use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ffi::define::{InputPreset, ScreencapMethod, MAA_TASK_PARAM_EMPTY};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "maa-sample.toml";

/// 配置来源，日志系统就绪后再输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// 配置文件不存在，使用默认值
    Defaults(PathBuf),
}

/// 等待任务完成的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WaitMode {
    /// 固定间隔轮询 MaaTaskStatus
    #[default]
    Polling,
    /// 直接调用 MaaWaitTask 阻塞等待
    Blocking,
}

/// 示例程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// 原生库根目录，实际加载 `<library_root>/<平台目录>` 下的库文件
    pub library_root: PathBuf,

    /// 资源包目录
    pub resource_dir: PathBuf,

    /// 工具库的用户目录，MaaToolkitInitOptionConfig 在此生成配置
    pub user_path: PathBuf,

    /// 设备端代理程序目录（MaaAgentBinary）
    pub agent_path: PathBuf,

    /// 日志目录，同时作为原生库的日志目录
    pub log_dir: PathBuf,

    /// 是否开启原生库调试模式
    pub debug_mode: bool,

    /// 使用第几个设备
    pub device_index: usize,

    /// 任务入口
    pub task_entry: String,

    /// 任务参数（JSON）
    pub task_param: String,

    /// 任务执行次数
    pub task_count: u32,

    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,

    /// 最大轮询次数，0 表示不限制
    pub max_poll_rounds: u32,

    pub wait_mode: WaitMode,

    /// 覆盖设备默认的输入方式
    pub input_preset: Option<InputPreset>,

    /// 覆盖设备默认的截图方式
    pub screencap: Option<ScreencapMethod>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from("bin"),
            resource_dir: PathBuf::from("resource"),
            user_path: PathBuf::from("./"),
            agent_path: PathBuf::from("share/MaaAgentBinary"),
            log_dir: PathBuf::from("debug"),
            debug_mode: false,
            device_index: 0,
            task_entry: "MyTask".to_string(),
            task_param: MAA_TASK_PARAM_EMPTY.to_string(),
            task_count: 2,
            poll_interval_ms: 100,
            max_poll_rounds: 0,
            wait_mode: WaitMode::Polling,
            input_preset: None,
            screencap: None,
        }
    }
}

impl SampleConfig {
    /// 从 TOML 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SampleConfig = toml::from_str(content)?;

        config.validate()?;
        Ok(config)
    }

    /// 加载配置：文件不存在时使用默认值，最后用环境变量覆盖
    ///
    /// 此时日志系统还没初始化，来源交给调用方记录。
    pub fn load<P: AsRef<Path>>(path: P) -> Result<(Self, ConfigSource), ConfigError> {
        let path = path.as_ref();
        let (mut config, source) = if path.exists() {
            (Self::from_file(path)?, ConfigSource::File(path.to_path_buf()))
        } else {
            (Self::default(), ConfigSource::Defaults(path.to_path_buf()))
        };

        config.apply_env();
        config.validate()?;
        Ok((config, source))
    }

    /// 使用环境变量覆盖路径配置
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("MAA_LIB_PATH") {
            self.library_root = PathBuf::from(root);
        }

        if let Some(resource) = lookup("MAA_RESOURCE_PATH") {
            self.resource_dir = PathBuf::from(resource);
        }

        if let Some(log_dir) = lookup("MAA_LOG_DIR") {
            self.log_dir = PathBuf::from(log_dir);
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.task_entry.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "task_entry",
                reason: "不能为空".to_string(),
            });
        }

        serde_json::from_str::<serde_json::Value>(&self.task_param).map_err(|e| ConfigError::Invalid {
            field: "task_param",
            reason: format!("不是合法 JSON: {}", e),
        })?;

        Ok(())
    }

    /// 写出当前配置，可作为配置模板
    pub fn write_template<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 配置错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件 {} 失败: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("写入配置文件 {} 失败: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("配置格式错误: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("配置序列化失败: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("配置项 {field} 无效: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SampleConfig::default();
        assert_eq!(config.task_count, 2);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.task_param, "{}");
        assert_eq!(config.wait_mode, WaitMode::Polling);
        assert_eq!(config.user_path, PathBuf::from("./"));
        assert_eq!(config.agent_path, PathBuf::from("share/MaaAgentBinary"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = SampleConfig::from_toml_str(
            r#"
            task_entry = "Wake"
            task_count = 5
            wait_mode = "blocking"
            input_preset = "maatouch"
            user_path = "/data/maa"
            agent_path = "/opt/maa/share/MaaAgentBinary"
            "#,
        )
        .unwrap();

        assert_eq!(config.task_entry, "Wake");
        assert_eq!(config.task_count, 5);
        assert_eq!(config.wait_mode, WaitMode::Blocking);
        assert_eq!(config.input_preset, Some(InputPreset::Maatouch));
        assert_eq!(config.resource_dir, PathBuf::from("resource"));
        assert_eq!(config.user_path, PathBuf::from("/data/maa"));
        assert_eq!(config.agent_path, PathBuf::from("/opt/maa/share/MaaAgentBinary"));
    }

    #[test]
    fn test_invalid_task_param() {
        let result = SampleConfig::from_toml_str(r#"task_param = "{not json""#);
        assert!(matches!(result, Err(ConfigError::Invalid { field: "task_param", .. })));
    }

    #[test]
    fn test_empty_entry() {
        let result = SampleConfig::from_toml_str(r#"task_entry = "  ""#);
        assert!(matches!(result, Err(ConfigError::Invalid { field: "task_entry", .. })));
    }

    #[test]
    fn test_parse_error() {
        let result = SampleConfig::from_toml_str("task_count = \"two\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_read_error_keeps_path() {
        let path = std::env::temp_dir().join(format!("maa-sample-missing-{}", std::process::id()));
        match SampleConfig::from_file(&path) {
            Err(ConfigError::Read { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file_reports_defaults() {
        let path = std::env::temp_dir().join(format!("maa-sample-absent-{}.toml", std::process::id()));

        let (config, source) = SampleConfig::load(&path).unwrap();

        assert_eq!(source, ConfigSource::Defaults(path));
        assert_eq!(config.task_count, 2);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SampleConfig::default();
        config.apply_overrides(|key| match key {
            "MAA_LIB_PATH" => Some("/opt/maa".to_string()),
            "MAA_LOG_DIR" => Some("/tmp/maa-log".to_string()),
            _ => None,
        });

        assert_eq!(config.library_root, PathBuf::from("/opt/maa"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/maa-log"));
        assert_eq!(config.resource_dir, PathBuf::from("resource"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("maa-sample-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(DEFAULT_CONFIG_FILE);

        let mut config = SampleConfig::default();
        config.task_count = 3;
        config.screencap = Some(ScreencapMethod::Encode);
        config.write_template(&path).unwrap();

        let loaded = SampleConfig::from_file(&path).unwrap();
        assert_eq!(loaded.task_count, 3);
        assert_eq!(loaded.screencap, Some(ScreencapMethod::Encode));

        let (_, source) = SampleConfig::load(&path).unwrap();
        assert_eq!(source, ConfigSource::File(path.clone()));

        fs::remove_dir_all(&dir).ok();
    }
}
