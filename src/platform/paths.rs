use std::env::consts::{ARCH, OS};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 框架库名（不含前后缀）
pub const FRAMEWORK_LIBRARY: &str = "MaaFramework";

/// 工具库名（不含前后缀）
pub const TOOLKIT_LIBRARY: &str = "MaaToolkit";

/// 根据操作系统和架构得到平台目录名，例如 `win-x64`、`linux-arm64`
pub fn platform_dir_name(os: &str, arch: &str) -> Option<String> {
    let os = match os {
        "windows" => "win",
        "linux" | "android" => "linux",
        "macos" => "osx",
        _ => return None,
    };

    let arch = match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        _ => return None,
    };

    Some(format!("{}-{}", os, arch))
}

/// 根据操作系统拼出动态库文件名
pub fn library_file_name(os: &str, name: &str) -> String {
    match os {
        "windows" => format!("{}.dll", name),
        "macos" => format!("lib{}.dylib", name),
        _ => format!("lib{}.so", name),
    }
}

/// 当前平台下原生库所在目录及文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPaths {
    dir: PathBuf,
    os: String,
}

impl PlatformPaths {
    /// 按当前平台解析 `root` 下的库目录
    pub fn resolve<P: AsRef<Path>>(root: P) -> Self {
        Self::resolve_for(root, OS, ARCH)
    }

    /// 按指定平台解析，平台目录不存在时退回 `root` 本身
    pub fn resolve_for<P: AsRef<Path>>(root: P, os: &str, arch: &str) -> Self {
        let root = root.as_ref();

        let dir = match platform_dir_name(os, arch) {
            Some(name) => {
                let candidate = root.join(&name);
                if candidate.is_dir() {
                    candidate
                } else {
                    debug!("平台目录 {} 不存在，使用 {}", candidate.display(), root.display());
                    root.to_path_buf()
                }
            }
            None => {
                warn!("不支持的平台 {}-{}，直接使用 {}", os, arch, root.display());
                root.to_path_buf()
            }
        };

        Self {
            dir,
            os: os.to_string(),
        }
    }

    /// 库目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn framework_library(&self) -> PathBuf {
        self.dir.join(library_file_name(&self.os, FRAMEWORK_LIBRARY))
    }

    pub fn toolkit_library(&self) -> PathBuf {
        self.dir.join(library_file_name(&self.os, TOOLKIT_LIBRARY))
    }
}
