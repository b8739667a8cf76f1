//! 原生库使用的基础类型与常量

use serde::{Deserialize, Serialize};
use std::ffi::{c_char, c_void};
use std::fmt;

#[repr(C)]
pub struct MaaResourceAPI {
    _private: [u8; 0],
}

#[repr(C)]
pub struct MaaControllerAPI {
    _private: [u8; 0],
}

#[repr(C)]
pub struct MaaInstanceAPI {
    _private: [u8; 0],
}

pub type MaaResourceHandle = *mut MaaResourceAPI;
pub type MaaControllerHandle = *mut MaaControllerAPI;
pub type MaaInstanceHandle = *mut MaaInstanceAPI;

pub type MaaBool = u8;
pub type MaaSize = u64;
pub type MaaString = *const c_char;

pub type MaaId = i64;
pub type MaaCtrlId = MaaId;
pub type MaaResId = MaaId;
pub type MaaTaskId = MaaId;

pub type MaaOption = i32;
pub type MaaOptionValue = *mut c_void;
pub type MaaOptionValueSize = u64;
pub type MaaGlobalOption = MaaOption;

pub type MaaCallbackTransparentArg = *mut c_void;

/// 原生库回调：消息名、详情 JSON、透传参数
pub type MaaAPICallback =
    Option<unsafe extern "C" fn(msg: MaaString, details_json: MaaString, arg: MaaCallbackTransparentArg)>;

pub const MAA_INVALID_ID: MaaId = 0;
pub const MAA_TASK_PARAM_EMPTY: &str = "{}";

pub const MAA_GLOBAL_OPTION_LOGGING: MaaGlobalOption = 1;
pub const MAA_GLOBAL_OPTION_DEBUG_MODE: MaaGlobalOption = 2;

/// 全局选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalOption {
    /// 日志目录
    Logging(String),
    DebugMode(bool),
}

impl GlobalOption {
    pub fn key(&self) -> MaaGlobalOption {
        match self {
            GlobalOption::Logging(_) => MAA_GLOBAL_OPTION_LOGGING,
            GlobalOption::DebugMode(_) => MAA_GLOBAL_OPTION_DEBUG_MODE,
        }
    }
}

/// 异步操作状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaaStatus {
    Invalid,
    Pending,
    Running,
    Success,
    Failed,
}

impl MaaStatus {
    /// 已结束（成功或失败）
    pub fn is_done(self) -> bool {
        matches!(self, MaaStatus::Success | MaaStatus::Failed)
    }

    /// 仍在排队或执行
    pub fn is_busy(self) -> bool {
        matches!(self, MaaStatus::Pending | MaaStatus::Running)
    }

    pub fn as_raw(self) -> i32 {
        match self {
            MaaStatus::Invalid => 0,
            MaaStatus::Pending => 1000,
            MaaStatus::Running => 2000,
            MaaStatus::Success => 3000,
            MaaStatus::Failed => 4000,
        }
    }
}

impl From<i32> for MaaStatus {
    fn from(raw: i32) -> Self {
        match raw {
            1000 => MaaStatus::Pending,
            2000 => MaaStatus::Running,
            3000 => MaaStatus::Success,
            4000 => MaaStatus::Failed,
            _ => MaaStatus::Invalid,
        }
    }
}

impl fmt::Display for MaaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaaStatus::Invalid => write!(f, "无效"),
            MaaStatus::Pending => write!(f, "等待中"),
            MaaStatus::Running => write!(f, "运行中"),
            MaaStatus::Success => write!(f, "成功"),
            MaaStatus::Failed => write!(f, "失败"),
        }
    }
}

const TOUCH_MASK: i32 = 0xFF;
const KEY_MASK: i32 = 0xFF00;
const SCREENCAP_MASK: i32 = 0xFF0000;

const TOUCH_ADB: i32 = 1;
const TOUCH_MINITOUCH: i32 = 2;
const TOUCH_MAATOUCH: i32 = 3;
const KEY_ADB: i32 = 1 << 8;
const KEY_MAATOUCH: i32 = 2 << 8;

/// 输入方式预设（触控 + 按键）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPreset {
    Adb,
    Minitouch,
    Maatouch,
}

impl InputPreset {
    pub fn bits(self) -> i32 {
        match self {
            InputPreset::Adb => TOUCH_ADB | KEY_ADB,
            InputPreset::Minitouch => TOUCH_MINITOUCH | KEY_ADB,
            InputPreset::Maatouch => TOUCH_MAATOUCH | KEY_MAATOUCH,
        }
    }
}

/// 截图方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreencapMethod {
    FastestWay,
    RawByNetcat,
    RawWithGzip,
    Encode,
    EncodeToFile,
    MinicapDirect,
    MinicapStream,
}

impl ScreencapMethod {
    pub fn bits(self) -> i32 {
        let index = match self {
            ScreencapMethod::FastestWay => 1,
            ScreencapMethod::RawByNetcat => 2,
            ScreencapMethod::RawWithGzip => 3,
            ScreencapMethod::Encode => 4,
            ScreencapMethod::EncodeToFile => 5,
            ScreencapMethod::MinicapDirect => 6,
            ScreencapMethod::MinicapStream => 7,
        };
        index << 16
    }
}

/// ADB 控制器类型，按位拼接触控、按键与截图方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdbControllerType(pub i32);

impl AdbControllerType {
    pub fn new(input: InputPreset, screencap: ScreencapMethod) -> Self {
        Self(input.bits() | screencap.bits())
    }

    pub fn touch(self) -> i32 {
        self.0 & TOUCH_MASK
    }

    pub fn key(self) -> i32 {
        self.0 & KEY_MASK
    }

    pub fn screencap(self) -> i32 {
        self.0 & SCREENCAP_MASK
    }

    /// 替换输入方式，保留截图方式
    pub fn with_input(self, input: InputPreset) -> Self {
        Self((self.0 & !(TOUCH_MASK | KEY_MASK)) | input.bits())
    }

    /// 替换截图方式，保留输入方式
    pub fn with_screencap(self, screencap: ScreencapMethod) -> Self {
        Self((self.0 & !SCREENCAP_MASK) | screencap.bits())
    }
}

impl Default for AdbControllerType {
    fn default() -> Self {
        Self::new(InputPreset::Adb, ScreencapMethod::FastestWay)
    }
}

impl fmt::Display for AdbControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08x}", self.0)
    }
}

/// 工具库发现的 ADB 设备
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdbDevice {
    pub name: String,
    pub adb_path: String,
    pub address: String,
    pub controller_type: AdbControllerType,
    /// 设备的 ADB 配置（JSON 字符串，原样传给控制器）
    pub config: String,
}
