use std::ffi::{c_void, CString};
use tracing::debug;

use crate::error::Result;
use crate::ffi::callback::{
    notification_callback, read_c_str, source_arg, SOURCE_CONTROLLER, SOURCE_INSTANCE, SOURCE_RESOURCE,
};
use crate::ffi::define::*;
use crate::ffi::library::MaaLibrary;

/// 示例流程用到的原生接口
///
/// 每个方法对应一个导出函数，不附加任何逻辑；哨兵值（0、false、空句柄）原样返回给调用方。
pub trait MaaApi {
    /// MaaVersion
    fn version(&self) -> Option<String>;
    /// MaaSetGlobalOption
    fn set_global_option(&self, option: &GlobalOption) -> Result<bool>;

    /// MaaToolkitInit
    fn toolkit_init(&self) -> bool;
    /// MaaToolkitUninit
    fn toolkit_uninit(&self) -> bool;
    /// MaaToolkitInitOptionConfig，`user_path` 下生成默认配置
    fn init_option_config(&self, user_path: &str, default_json: &str) -> Result<bool>;
    /// MaaToolkitPostFindDevice
    fn post_find_device(&self) -> bool;
    /// MaaToolkitWaitForFindDeviceToComplete，返回找到的设备数
    fn wait_for_find_device(&self) -> MaaSize;
    /// MaaToolkitGetDevice* 系列，读取第 index 个设备
    fn device(&self, index: MaaSize) -> AdbDevice;

    fn resource_create(&self) -> MaaResourceHandle;
    fn resource_destroy(&self, res: MaaResourceHandle);
    fn resource_post_path(&self, res: MaaResourceHandle, path: &str) -> Result<MaaResId>;
    fn resource_status(&self, res: MaaResourceHandle, id: MaaResId) -> MaaStatus;
    fn resource_wait(&self, res: MaaResourceHandle, id: MaaResId) -> MaaStatus;
    fn resource_loaded(&self, res: MaaResourceHandle) -> bool;

    fn adb_controller_create(
        &self,
        adb_path: &str,
        address: &str,
        controller_type: AdbControllerType,
        config: &str,
        agent_path: &str,
    ) -> Result<MaaControllerHandle>;
    fn controller_destroy(&self, ctrl: MaaControllerHandle);
    fn controller_post_connection(&self, ctrl: MaaControllerHandle) -> MaaCtrlId;
    fn controller_status(&self, ctrl: MaaControllerHandle, id: MaaCtrlId) -> MaaStatus;
    fn controller_wait(&self, ctrl: MaaControllerHandle, id: MaaCtrlId) -> MaaStatus;
    fn controller_connected(&self, ctrl: MaaControllerHandle) -> bool;

    fn create(&self) -> MaaInstanceHandle;
    fn destroy(&self, inst: MaaInstanceHandle);
    fn bind_resource(&self, inst: MaaInstanceHandle, res: MaaResourceHandle) -> bool;
    fn bind_controller(&self, inst: MaaInstanceHandle, ctrl: MaaControllerHandle) -> bool;
    fn inited(&self, inst: MaaInstanceHandle) -> bool;
    fn post_task(&self, inst: MaaInstanceHandle, entry: &str, param: &str) -> Result<MaaTaskId>;
    fn task_status(&self, inst: MaaInstanceHandle, id: MaaTaskId) -> MaaStatus;
    fn wait_task(&self, inst: MaaInstanceHandle, id: MaaTaskId) -> MaaStatus;
    fn task_all_finished(&self, inst: MaaInstanceHandle) -> bool;
    /// MaaPostStop，返回是否成功投递停止请求
    fn post_stop(&self, inst: MaaInstanceHandle) -> bool;
}

/// 基于已加载原生库的实现
pub struct NativeApi {
    lib: MaaLibrary,
}

impl NativeApi {
    pub fn new(lib: MaaLibrary) -> Self {
        Self { lib }
    }
}

// 所有 unsafe 调用的前提：函数表由 MaaLibrary 按头文件签名解析，库在 self 存活期间不卸载；
// 传入的字符串都是本地 CString，调用期间有效；句柄来自同一个库。
impl MaaApi for NativeApi {
    fn version(&self) -> Option<String> {
        unsafe { read_c_str((self.lib.framework.version)()) }
    }

    fn set_global_option(&self, option: &GlobalOption) -> Result<bool> {
        let ret = match option {
            GlobalOption::Logging(dir) => {
                let value = CString::new(dir.as_str())?;
                let size = value.as_bytes().len() as MaaOptionValueSize;
                unsafe { (self.lib.framework.set_global_option)(option.key(), value.as_ptr() as *mut c_void, size) }
            }
            GlobalOption::DebugMode(enabled) => {
                let mut value = *enabled;
                let size = std::mem::size_of::<bool>() as MaaOptionValueSize;
                unsafe {
                    (self.lib.framework.set_global_option)(
                        option.key(),
                        &mut value as *mut bool as *mut c_void,
                        size,
                    )
                }
            }
        };
        Ok(ret != 0)
    }

    fn toolkit_init(&self) -> bool {
        unsafe { (self.lib.toolkit.init)() != 0 }
    }

    fn toolkit_uninit(&self) -> bool {
        unsafe { (self.lib.toolkit.uninit)() != 0 }
    }

    fn init_option_config(&self, user_path: &str, default_json: &str) -> Result<bool> {
        let user_path = CString::new(user_path)?;
        let default_json = CString::new(default_json)?;
        Ok(unsafe { (self.lib.toolkit.init_option_config)(user_path.as_ptr(), default_json.as_ptr()) != 0 })
    }

    fn post_find_device(&self) -> bool {
        unsafe { (self.lib.toolkit.post_find_device)() != 0 }
    }

    fn wait_for_find_device(&self) -> MaaSize {
        unsafe { (self.lib.toolkit.wait_for_find_device)() }
    }

    fn device(&self, index: MaaSize) -> AdbDevice {
        let toolkit = &self.lib.toolkit;
        unsafe {
            AdbDevice {
                name: read_c_str((toolkit.device_name)(index)).unwrap_or_default(),
                adb_path: read_c_str((toolkit.device_adb_path)(index)).unwrap_or_default(),
                address: read_c_str((toolkit.device_adb_serial)(index)).unwrap_or_default(),
                controller_type: AdbControllerType((toolkit.device_adb_controller_type)(index)),
                config: read_c_str((toolkit.device_adb_config)(index)).unwrap_or_default(),
            }
        }
    }

    fn resource_create(&self) -> MaaResourceHandle {
        unsafe { (self.lib.framework.resource_create)(Some(notification_callback), source_arg(SOURCE_RESOURCE)) }
    }

    fn resource_destroy(&self, res: MaaResourceHandle) {
        unsafe { (self.lib.framework.resource_destroy)(res) }
    }

    fn resource_post_path(&self, res: MaaResourceHandle, path: &str) -> Result<MaaResId> {
        let path = CString::new(path)?;
        Ok(unsafe { (self.lib.framework.resource_post_path)(res, path.as_ptr()) })
    }

    fn resource_status(&self, res: MaaResourceHandle, id: MaaResId) -> MaaStatus {
        MaaStatus::from(unsafe { (self.lib.framework.resource_status)(res, id) })
    }

    fn resource_wait(&self, res: MaaResourceHandle, id: MaaResId) -> MaaStatus {
        MaaStatus::from(unsafe { (self.lib.framework.resource_wait)(res, id) })
    }

    fn resource_loaded(&self, res: MaaResourceHandle) -> bool {
        unsafe { (self.lib.framework.resource_loaded)(res) != 0 }
    }

    fn adb_controller_create(
        &self,
        adb_path: &str,
        address: &str,
        controller_type: AdbControllerType,
        config: &str,
        agent_path: &str,
    ) -> Result<MaaControllerHandle> {
        let adb_path = CString::new(adb_path)?;
        let address = CString::new(address)?;
        let config = CString::new(config)?;
        let agent_path = CString::new(agent_path)?;

        debug!("MaaAdbControllerCreateV2 type={}", controller_type);
        Ok(unsafe {
            (self.lib.framework.adb_controller_create)(
                adb_path.as_ptr(),
                address.as_ptr(),
                controller_type.0,
                config.as_ptr(),
                agent_path.as_ptr(),
                Some(notification_callback),
                source_arg(SOURCE_CONTROLLER),
            )
        })
    }

    fn controller_destroy(&self, ctrl: MaaControllerHandle) {
        unsafe { (self.lib.framework.controller_destroy)(ctrl) }
    }

    fn controller_post_connection(&self, ctrl: MaaControllerHandle) -> MaaCtrlId {
        unsafe { (self.lib.framework.controller_post_connection)(ctrl) }
    }

    fn controller_status(&self, ctrl: MaaControllerHandle, id: MaaCtrlId) -> MaaStatus {
        MaaStatus::from(unsafe { (self.lib.framework.controller_status)(ctrl, id) })
    }

    fn controller_wait(&self, ctrl: MaaControllerHandle, id: MaaCtrlId) -> MaaStatus {
        MaaStatus::from(unsafe { (self.lib.framework.controller_wait)(ctrl, id) })
    }

    fn controller_connected(&self, ctrl: MaaControllerHandle) -> bool {
        unsafe { (self.lib.framework.controller_connected)(ctrl) != 0 }
    }

    fn create(&self) -> MaaInstanceHandle {
        unsafe { (self.lib.framework.create)(Some(notification_callback), source_arg(SOURCE_INSTANCE)) }
    }

    fn destroy(&self, inst: MaaInstanceHandle) {
        unsafe { (self.lib.framework.destroy)(inst) }
    }

    fn bind_resource(&self, inst: MaaInstanceHandle, res: MaaResourceHandle) -> bool {
        unsafe { (self.lib.framework.bind_resource)(inst, res) != 0 }
    }

    fn bind_controller(&self, inst: MaaInstanceHandle, ctrl: MaaControllerHandle) -> bool {
        unsafe { (self.lib.framework.bind_controller)(inst, ctrl) != 0 }
    }

    fn inited(&self, inst: MaaInstanceHandle) -> bool {
        unsafe { (self.lib.framework.inited)(inst) != 0 }
    }

    fn post_task(&self, inst: MaaInstanceHandle, entry: &str, param: &str) -> Result<MaaTaskId> {
        let entry = CString::new(entry)?;
        let param = CString::new(param)?;
        Ok(unsafe { (self.lib.framework.post_task)(inst, entry.as_ptr(), param.as_ptr()) })
    }

    fn task_status(&self, inst: MaaInstanceHandle, id: MaaTaskId) -> MaaStatus {
        MaaStatus::from(unsafe { (self.lib.framework.task_status)(inst, id) })
    }

    fn wait_task(&self, inst: MaaInstanceHandle, id: MaaTaskId) -> MaaStatus {
        MaaStatus::from(unsafe { (self.lib.framework.wait_task)(inst, id) })
    }

    fn task_all_finished(&self, inst: MaaInstanceHandle) -> bool {
        unsafe { (self.lib.framework.task_all_finished)(inst) != 0 }
    }

    fn post_stop(&self, inst: MaaInstanceHandle) -> bool {
        unsafe { (self.lib.framework.post_stop)(inst) != 0 }
    }
}
