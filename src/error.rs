use thiserror::Error;

use crate::config::ConfigError;

/// 应用程序统一错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 原生库加载失败
    #[error("加载原生库失败 {path}: {source}")]
    LibraryLoad {
        path: String,
        #[source]
        source: libloading::Error,
    },

    /// 导出符号解析失败
    #[error("解析符号失败 {symbol}: {source}")]
    SymbolResolve {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },

    /// 字符串中包含 NUL，无法传给 C 接口
    #[error("无效字符串参数: {0}")]
    InvalidString(#[from] std::ffi::NulError),

    /// 原生接口返回了空句柄
    #[error("创建 {0} 失败: 返回空句柄")]
    NullHandle(&'static str),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON 错误
    #[error("JSON 错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// AppError 的 Result 类型别名
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// 转换为进程退出码
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::LibraryLoad { .. } | AppError::SymbolResolve { .. } => 2,
            AppError::Config(_) | AppError::InvalidString(_) => 3,
            AppError::NullHandle(_) => 4,
            AppError::IoError(_) | AppError::JsonError(_) => 1,
        }
    }
}
