//! 运行时加载 MaaFramework / MaaToolkit，并一次性解析所有用到的导出函数

use libloading::{Library, Symbol};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::ffi::define::*;
use crate::platform::PlatformPaths;

macro_rules! native_table {
    (
        $(#[$meta:meta])*
        $table:ident {
            $( $field:ident => $symbol:ident ( $($arg:ty),* ) $(-> $ret:ty)? ; )*
        }
    ) => {
        $(#[$meta])*
        pub struct $table {
            $( pub $field: unsafe extern "C" fn($($arg),*) $(-> $ret)?, )*
        }

        impl $table {
            /// 从已加载的库中解析全部符号
            ///
            /// # Safety
            /// 调用方需保证 `lib` 导出的符号签名与声明一致，并且 `lib` 比返回值活得更久。
            unsafe fn load(lib: &Library) -> Result<Self> {
                Ok(Self {
                    $(
                        $field: {
                            let name = concat!(stringify!($symbol), "\0");
                            let sym: Symbol<unsafe extern "C" fn($($arg),*) $(-> $ret)?> =
                                unsafe { lib.get(name.as_bytes()) }.map_err(|source| {
                                    AppError::SymbolResolve {
                                        symbol: stringify!($symbol),
                                        source,
                                    }
                                })?;
                            *sym
                        },
                    )*
                })
            }
        }
    };
}

native_table! {
    /// MaaFramework 导出函数
    FrameworkFns {
        version => MaaVersion() -> MaaString;
        set_global_option => MaaSetGlobalOption(MaaGlobalOption, MaaOptionValue, MaaOptionValueSize) -> MaaBool;

        resource_create => MaaResourceCreate(MaaAPICallback, MaaCallbackTransparentArg) -> MaaResourceHandle;
        resource_destroy => MaaResourceDestroy(MaaResourceHandle);
        resource_post_path => MaaResourcePostPath(MaaResourceHandle, MaaString) -> MaaResId;
        resource_status => MaaResourceStatus(MaaResourceHandle, MaaResId) -> i32;
        resource_wait => MaaResourceWait(MaaResourceHandle, MaaResId) -> i32;
        resource_loaded => MaaResourceLoaded(MaaResourceHandle) -> MaaBool;

        // adb_path, address, type, config, agent_path
        adb_controller_create => MaaAdbControllerCreateV2(
            MaaString, MaaString, i32, MaaString, MaaString, MaaAPICallback, MaaCallbackTransparentArg
        ) -> MaaControllerHandle;
        controller_destroy => MaaControllerDestroy(MaaControllerHandle);
        controller_post_connection => MaaControllerPostConnection(MaaControllerHandle) -> MaaCtrlId;
        controller_status => MaaControllerStatus(MaaControllerHandle, MaaCtrlId) -> i32;
        controller_wait => MaaControllerWait(MaaControllerHandle, MaaCtrlId) -> i32;
        controller_connected => MaaControllerConnected(MaaControllerHandle) -> MaaBool;

        create => MaaCreate(MaaAPICallback, MaaCallbackTransparentArg) -> MaaInstanceHandle;
        destroy => MaaDestroy(MaaInstanceHandle);
        bind_resource => MaaBindResource(MaaInstanceHandle, MaaResourceHandle) -> MaaBool;
        bind_controller => MaaBindController(MaaInstanceHandle, MaaControllerHandle) -> MaaBool;
        inited => MaaInited(MaaInstanceHandle) -> MaaBool;
        post_task => MaaPostTask(MaaInstanceHandle, MaaString, MaaString) -> MaaTaskId;
        task_status => MaaTaskStatus(MaaInstanceHandle, MaaTaskId) -> i32;
        wait_task => MaaWaitTask(MaaInstanceHandle, MaaTaskId) -> i32;
        task_all_finished => MaaTaskAllFinished(MaaInstanceHandle) -> MaaBool;
        post_stop => MaaPostStop(MaaInstanceHandle) -> MaaBool;
    }
}

native_table! {
    /// MaaToolkit 导出函数
    ToolkitFns {
        init => MaaToolkitInit() -> MaaBool;
        uninit => MaaToolkitUninit() -> MaaBool;
        init_option_config => MaaToolkitInitOptionConfig(MaaString, MaaString) -> MaaBool;
        post_find_device => MaaToolkitPostFindDevice() -> MaaBool;
        wait_for_find_device => MaaToolkitWaitForFindDeviceToComplete() -> MaaSize;
        device_name => MaaToolkitGetDeviceName(MaaSize) -> MaaString;
        device_adb_path => MaaToolkitGetDeviceAdbPath(MaaSize) -> MaaString;
        device_adb_serial => MaaToolkitGetDeviceAdbSerial(MaaSize) -> MaaString;
        device_adb_controller_type => MaaToolkitGetDeviceAdbControllerType(MaaSize) -> i32;
        device_adb_config => MaaToolkitGetDeviceAdbConfig(MaaSize) -> MaaString;
    }
}

/// 已加载的两个原生库
///
/// 函数表中的指针只在对应 `Library` 存活期间有效，两者一起持有。
pub struct MaaLibrary {
    pub framework: FrameworkFns,
    pub toolkit: ToolkitFns,
    _framework_lib: Library,
    _toolkit_lib: Library,
}

impl MaaLibrary {
    /// 按平台路径加载框架库和工具库
    pub fn load(paths: &PlatformPaths) -> Result<Self> {
        Self::load_from(&paths.framework_library(), &paths.toolkit_library())
    }

    /// 从指定文件加载
    pub fn load_from(framework_path: &Path, toolkit_path: &Path) -> Result<Self> {
        // 工具库依赖框架库，先加载框架库
        let framework_lib = open_library(framework_path)?;
        let toolkit_lib = open_library(toolkit_path)?;

        let framework = unsafe { FrameworkFns::load(&framework_lib)? };
        let toolkit = unsafe { ToolkitFns::load(&toolkit_lib)? };

        info!("原生库加载完成: {}", framework_path.display());

        Ok(Self {
            framework,
            toolkit,
            _framework_lib: framework_lib,
            _toolkit_lib: toolkit_lib,
        })
    }
}

fn open_library(path: &Path) -> Result<Library> {
    debug!("加载原生库: {}", path.display());

    unsafe { Library::new(path) }.map_err(|source| AppError::LibraryLoad {
        path: path.display().to_string(),
        source,
    })
}
