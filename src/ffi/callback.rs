use std::ffi::{c_void, CStr};
use tracing::{debug, warn};

use crate::ffi::define::{MaaCallbackTransparentArg, MaaString};

/// 回调透传参数，标记消息来源
pub const SOURCE_RESOURCE: &CStr = c"resource";
pub const SOURCE_CONTROLLER: &CStr = c"controller";
pub const SOURCE_INSTANCE: &CStr = c"instance";

/// 把来源标记转换成回调透传参数
pub fn source_arg(source: &'static CStr) -> MaaCallbackTransparentArg {
    source.as_ptr() as *mut c_void
}

/// 读取原生库传来的 C 字符串，空指针返回 None
///
/// # Safety
/// `ptr` 为空或指向以 NUL 结尾的有效字符串。
pub unsafe fn read_c_str(ptr: MaaString) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// 原生库通知回调，转发到 tracing
///
/// # Safety
/// 由原生库调用，参数须为有效的 C 字符串或空指针；`arg` 为 [`source_arg`] 生成的值或空指针。
pub unsafe extern "C" fn notification_callback(
    msg: MaaString,
    details_json: MaaString,
    arg: MaaCallbackTransparentArg,
) {
    let msg = unsafe { read_c_str(msg) }.unwrap_or_default();
    let details = unsafe { read_c_str(details_json) }.unwrap_or_default();
    let source = unsafe { read_c_str(arg as MaaString) }.unwrap_or_else(|| "unknown".to_string());

    log_notification(&source, &msg, &details);
}

/// 记录一条通知，details 非法 JSON 时原样输出
pub fn log_notification(source: &str, msg: &str, details: &str) {
    match parse_details(details) {
        Ok(value) => debug!(source, msg, details = %value, "原生库通知"),
        Err(e) => warn!(source, msg, details, "通知详情不是合法 JSON: {}", e),
    }
}

fn parse_details(details: &str) -> Result<serde_json::Value, serde_json::Error> {
    if details.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(details)
}
