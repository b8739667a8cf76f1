//! 测试用的原生接口替身，记录调用顺序并返回固定的哨兵值

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ptr::{self, NonNull};

use crate::error::Result;
use crate::ffi::define::*;
use crate::ffi::MaaApi;

pub struct MockApi {
    device_count: MaaSize,
    inited: bool,
    null_controller: bool,
    invalid_task_id: bool,
    calls: RefCell<Vec<String>>,
    options: RefCell<Vec<GlobalOption>>,
    user_paths: RefCell<Vec<String>>,
    agent_paths: RefCell<Vec<String>>,
    task_statuses: RefCell<VecDeque<MaaStatus>>,
    next_id: Cell<MaaId>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            device_count: 1,
            inited: true,
            null_controller: false,
            invalid_task_id: false,
            calls: RefCell::new(Vec::new()),
            options: RefCell::new(Vec::new()),
            user_paths: RefCell::new(Vec::new()),
            agent_paths: RefCell::new(Vec::new()),
            task_statuses: RefCell::new(VecDeque::new()),
            next_id: Cell::new(1),
        }
    }
}

impl MockApi {
    /// MaaToolkitWaitForFindDeviceToComplete 返回的设备数
    pub fn with_device_count(mut self, count: MaaSize) -> Self {
        self.device_count = count;
        self
    }

    /// MaaInited 返回 false
    pub fn not_inited(mut self) -> Self {
        self.inited = false;
        self
    }

    /// MaaAdbControllerCreateV2 返回空句柄
    pub fn with_null_controller(mut self) -> Self {
        self.null_controller = true;
        self
    }

    /// MaaPostTask 返回无效 ID
    pub fn with_invalid_task_id(mut self) -> Self {
        self.invalid_task_id = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == name).count()
    }

    pub fn global_options(&self) -> Vec<GlobalOption> {
        self.options.borrow().clone()
    }

    pub fn user_paths(&self) -> Vec<String> {
        self.user_paths.borrow().clone()
    }

    pub fn agent_paths(&self) -> Vec<String> {
        self.agent_paths.borrow().clone()
    }

    /// 依次作为 MaaTaskStatus 的返回值，用完后返回 Success
    pub fn push_task_statuses(&self, statuses: &[MaaStatus]) {
        self.task_statuses.borrow_mut().extend(statuses.iter().copied());
    }

    fn record(&self, name: &str) {
        self.calls.borrow_mut().push(name.to_string());
    }

    fn next_id(&self) -> MaaId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl MaaApi for MockApi {
    fn version(&self) -> Option<String> {
        self.record("MaaVersion");
        Some("v0.0.0-mock".to_string())
    }

    fn set_global_option(&self, option: &GlobalOption) -> Result<bool> {
        self.record("MaaSetGlobalOption");
        self.options.borrow_mut().push(option.clone());
        Ok(true)
    }

    fn toolkit_init(&self) -> bool {
        self.record("MaaToolkitInit");
        true
    }

    fn toolkit_uninit(&self) -> bool {
        self.record("MaaToolkitUninit");
        true
    }

    fn init_option_config(&self, user_path: &str, _default_json: &str) -> Result<bool> {
        self.record("MaaToolkitInitOptionConfig");
        self.user_paths.borrow_mut().push(user_path.to_string());
        Ok(true)
    }

    fn post_find_device(&self) -> bool {
        self.record("MaaToolkitPostFindDevice");
        true
    }

    fn wait_for_find_device(&self) -> MaaSize {
        self.record("MaaToolkitWaitForFindDeviceToComplete");
        self.device_count
    }

    fn device(&self, index: MaaSize) -> AdbDevice {
        AdbDevice {
            name: format!("emulator-{}", index),
            adb_path: "adb".to_string(),
            address: format!("127.0.0.1:{}", 5555 + index * 2),
            controller_type: AdbControllerType::default(),
            config: "{}".to_string(),
        }
    }

    fn resource_create(&self) -> MaaResourceHandle {
        self.record("MaaResourceCreate");
        NonNull::dangling().as_ptr()
    }

    fn resource_destroy(&self, _res: MaaResourceHandle) {
        self.record("MaaResourceDestroy");
    }

    fn resource_post_path(&self, _res: MaaResourceHandle, _path: &str) -> Result<MaaResId> {
        self.record("MaaResourcePostPath");
        Ok(self.next_id())
    }

    fn resource_status(&self, _res: MaaResourceHandle, _id: MaaResId) -> MaaStatus {
        self.record("MaaResourceStatus");
        MaaStatus::Success
    }

    fn resource_wait(&self, _res: MaaResourceHandle, _id: MaaResId) -> MaaStatus {
        self.record("MaaResourceWait");
        MaaStatus::Success
    }

    fn resource_loaded(&self, _res: MaaResourceHandle) -> bool {
        true
    }

    fn adb_controller_create(
        &self,
        _adb_path: &str,
        _address: &str,
        _controller_type: AdbControllerType,
        _config: &str,
        agent_path: &str,
    ) -> Result<MaaControllerHandle> {
        self.record("MaaAdbControllerCreateV2");
        self.agent_paths.borrow_mut().push(agent_path.to_string());
        if self.null_controller {
            return Ok(ptr::null_mut());
        }
        Ok(NonNull::dangling().as_ptr())
    }

    fn controller_destroy(&self, _ctrl: MaaControllerHandle) {
        self.record("MaaControllerDestroy");
    }

    fn controller_post_connection(&self, _ctrl: MaaControllerHandle) -> MaaCtrlId {
        self.record("MaaControllerPostConnection");
        self.next_id()
    }

    fn controller_status(&self, _ctrl: MaaControllerHandle, _id: MaaCtrlId) -> MaaStatus {
        self.record("MaaControllerStatus");
        MaaStatus::Success
    }

    fn controller_wait(&self, _ctrl: MaaControllerHandle, _id: MaaCtrlId) -> MaaStatus {
        self.record("MaaControllerWait");
        MaaStatus::Success
    }

    fn controller_connected(&self, _ctrl: MaaControllerHandle) -> bool {
        true
    }

    fn create(&self) -> MaaInstanceHandle {
        self.record("MaaCreate");
        NonNull::dangling().as_ptr()
    }

    fn destroy(&self, _inst: MaaInstanceHandle) {
        self.record("MaaDestroy");
    }

    fn bind_resource(&self, _inst: MaaInstanceHandle, _res: MaaResourceHandle) -> bool {
        self.record("MaaBindResource");
        true
    }

    fn bind_controller(&self, _inst: MaaInstanceHandle, _ctrl: MaaControllerHandle) -> bool {
        self.record("MaaBindController");
        true
    }

    fn inited(&self, _inst: MaaInstanceHandle) -> bool {
        self.record("MaaInited");
        self.inited
    }

    fn post_task(&self, _inst: MaaInstanceHandle, _entry: &str, _param: &str) -> Result<MaaTaskId> {
        self.record("MaaPostTask");
        if self.invalid_task_id {
            return Ok(MAA_INVALID_ID);
        }
        Ok(self.next_id())
    }

    fn task_status(&self, _inst: MaaInstanceHandle, _id: MaaTaskId) -> MaaStatus {
        self.record("MaaTaskStatus");
        self.task_statuses.borrow_mut().pop_front().unwrap_or(MaaStatus::Success)
    }

    fn wait_task(&self, _inst: MaaInstanceHandle, _id: MaaTaskId) -> MaaStatus {
        self.record("MaaWaitTask");
        MaaStatus::Success
    }

    fn task_all_finished(&self, _inst: MaaInstanceHandle) -> bool {
        self.record("MaaTaskAllFinished");
        true
    }

    fn post_stop(&self, _inst: MaaInstanceHandle) -> bool {
        self.record("MaaPostStop");
        true
    }
}
