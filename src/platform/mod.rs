//! 原生库路径解析

mod paths;

pub use paths::PlatformPaths;
