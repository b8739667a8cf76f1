//! 原生句柄的所有权守卫，离开作用域时调用对应的 Destroy

use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::ffi::define::{MaaControllerAPI, MaaInstanceAPI, MaaResourceAPI};
use crate::ffi::MaaApi;

/// 持有一个原生句柄，drop 时销毁且只销毁一次
pub struct OwnedHandle<'a, T> {
    api: &'a dyn MaaApi,
    raw: *mut T,
    kind: &'static str,
    destroy: fn(&dyn MaaApi, *mut T),
}

impl<'a, T> OwnedHandle<'a, T> {
    fn new(api: &'a dyn MaaApi, raw: *mut T, kind: &'static str, destroy: fn(&dyn MaaApi, *mut T)) -> Result<Self> {
        if raw.is_null() {
            return Err(AppError::NullHandle(kind));
        }
        debug!("创建 {} 句柄: {:p}", kind, raw);
        Ok(Self { api, raw, kind, destroy })
    }

    pub fn raw(&self) -> *mut T {
        self.raw
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<T> Drop for OwnedHandle<'_, T> {
    fn drop(&mut self) {
        debug!("销毁 {} 句柄: {:p}", self.kind, self.raw);
        (self.destroy)(self.api, self.raw);
    }
}

pub type ControllerHandle<'a> = OwnedHandle<'a, MaaControllerAPI>;
pub type ResourceHandle<'a> = OwnedHandle<'a, MaaResourceAPI>;
pub type InstanceHandle<'a> = OwnedHandle<'a, MaaInstanceAPI>;

fn destroy_controller(api: &dyn MaaApi, raw: *mut MaaControllerAPI) {
    api.controller_destroy(raw);
}

fn destroy_resource(api: &dyn MaaApi, raw: *mut MaaResourceAPI) {
    api.resource_destroy(raw);
}

fn destroy_instance(api: &dyn MaaApi, raw: *mut MaaInstanceAPI) {
    api.destroy(raw);
}

pub fn controller<'a>(api: &'a dyn MaaApi, raw: *mut MaaControllerAPI) -> Result<ControllerHandle<'a>> {
    OwnedHandle::new(api, raw, "controller", destroy_controller)
}

pub fn resource<'a>(api: &'a dyn MaaApi, raw: *mut MaaResourceAPI) -> Result<ResourceHandle<'a>> {
    OwnedHandle::new(api, raw, "resource", destroy_resource)
}

pub fn instance<'a>(api: &'a dyn MaaApi, raw: *mut MaaInstanceAPI) -> Result<InstanceHandle<'a>> {
    OwnedHandle::new(api, raw, "instance", destroy_instance)
}

/// 工具库初始化守卫，drop 时反初始化
pub struct ToolkitGuard<'a> {
    api: &'a dyn MaaApi,
}

impl<'a> ToolkitGuard<'a> {
    pub fn init(api: &'a dyn MaaApi) -> Self {
        if !api.toolkit_init() {
            warn!("MaaToolkitInit 返回 false");
        }
        Self { api }
    }
}

impl Drop for ToolkitGuard<'_> {
    fn drop(&mut self) {
        if !self.api.toolkit_uninit() {
            warn!("MaaToolkitUninit 返回 false");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::mock::MockApi;
    use std::ptr;

    #[test]
    fn test_null_handle_rejected() {
        let api = MockApi::default();
        let result = controller(&api, ptr::null_mut());
        assert!(matches!(result, Err(AppError::NullHandle("controller"))));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_drop_destroys_once() {
        let api = MockApi::default();
        {
            let raw = api.resource_create();
            let handle = resource(&api, raw).unwrap();
            assert_eq!(handle.kind(), "resource");
            assert_eq!(handle.raw(), raw);
        }
        assert_eq!(api.count("MaaResourceDestroy"), 1);
    }

    #[test]
    fn test_drop_order() {
        let api = MockApi::default();
        {
            let _toolkit = ToolkitGuard::init(&api);
            let _ctrl = controller(&api, api.adb_controller_create("adb", "127.0.0.1:5555", Default::default(), "{}", "share/MaaAgentBinary").unwrap()).unwrap();
            let _res = resource(&api, api.resource_create()).unwrap();
            let _inst = instance(&api, api.create()).unwrap();
        }

        let calls = api.calls();
        let tail: Vec<&str> = calls.iter().rev().take(4).rev().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec!["MaaDestroy", "MaaResourceDestroy", "MaaControllerDestroy", "MaaToolkitUninit"]
        );
    }
}
