use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::{SampleConfig, WaitMode};
use crate::error::Result;
use crate::ffi::define::{
    AdbControllerType, AdbDevice, GlobalOption, MaaStatus, MAA_INVALID_ID, MAA_TASK_PARAM_EMPTY,
};
use crate::ffi::MaaApi;
use crate::sample::report::{DemoOutcome, DemoReport, TaskResult};
use crate::sample::session::{self, ControllerHandle, InstanceHandle, ResourceHandle, ToolkitGuard};

/// 轮询结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub status: MaaStatus,
    pub polls: u32,
    pub timed_out: bool,
}

/// 固定顺序的示例流程
pub struct Demo<'a> {
    api: &'a dyn MaaApi,
    config: &'a SampleConfig,
}

impl<'a> Demo<'a> {
    pub fn new(api: &'a dyn MaaApi, config: &'a SampleConfig) -> Self {
        Self { api, config }
    }

    /// 执行完整流程：发现设备 → 控制器 → 资源 → 实例 → 任务 → 停止 → 销毁
    pub async fn run(&self) -> Result<DemoReport> {
        let mut report = DemoReport::new(self.api.version());
        info!("MaaFramework 版本: {}", report.version.as_deref().unwrap_or("未知"));

        self.apply_global_options();

        let _toolkit = ToolkitGuard::init(self.api);
        self.init_toolkit_options();

        let devices = self.discover_devices();
        let Some(device) = self.select_device(&devices) else {
            info!("未找到任何设备");
            return Ok(report.finish(DemoOutcome::NoDevice));
        };
        report.device = Some(device.clone());

        let controller = self.create_controller(device).await?;
        let resource = self.create_resource().await?;
        let instance = self.create_instance(&resource, &controller)?;

        if !self.api.inited(instance.raw()) {
            error!("MAA 初始化失败");
            drop(instance);
            drop(resource);
            drop(controller);
            return Ok(report.finish(DemoOutcome::InitFailed));
        }

        report.tasks = self.run_tasks(&instance).await?;
        if !report.tasks.iter().any(|t| t.timed_out) {
            self.wait_all_finished(&instance).await;
        }
        self.stop_instance(&instance);

        Ok(report.finish(DemoOutcome::Completed))
    }

    /// 设置原生库日志目录与调试模式，失败只记录
    pub fn apply_global_options(&self) {
        let options = [
            GlobalOption::Logging(self.config.log_dir.to_string_lossy().into_owned()),
            GlobalOption::DebugMode(self.config.debug_mode),
        ];

        for option in &options {
            match self.api.set_global_option(option) {
                Ok(true) => {}
                Ok(false) => warn!("MaaSetGlobalOption {:?} 返回 false", option),
                Err(e) => warn!("MaaSetGlobalOption {:?} 失败: {}", option, e),
            }
        }
    }

    /// 在 user_path 下初始化工具库配置，失败只记录
    pub fn init_toolkit_options(&self) {
        let user_path = self.config.user_path.to_string_lossy();
        match self.api.init_option_config(&user_path, MAA_TASK_PARAM_EMPTY) {
            Ok(true) => {}
            Ok(false) => warn!("MaaToolkitInitOptionConfig({}) 返回 false", user_path),
            Err(e) => warn!("MaaToolkitInitOptionConfig({}) 失败: {}", user_path, e),
        }
    }

    /// 投递设备搜索并等待完成，读取全部设备信息
    pub fn discover_devices(&self) -> Vec<AdbDevice> {
        info!("正在搜索 ADB 设备...");
        if !self.api.post_find_device() {
            warn!("MaaToolkitPostFindDevice 返回 false");
        }
        let count = self.api.wait_for_find_device();
        info!("找到 {} 个设备", count);

        (0..count)
            .map(|index| {
                let device = self.api.device(index);
                info!("  [{}] {} {} {}", index, device.name, device.address, device.adb_path);
                device
            })
            .collect()
    }

    /// 按配置选择设备，越界时退回第一个
    pub fn select_device<'d>(&self, devices: &'d [AdbDevice]) -> Option<&'d AdbDevice> {
        let index = self.config.device_index;
        devices.get(index).or_else(|| {
            if !devices.is_empty() {
                warn!("device_index {} 越界（共 {} 个），使用第一个设备", index, devices.len());
            }
            devices.first()
        })
    }

    /// 设备类型叠加配置中的输入/截图覆盖
    pub fn controller_type(&self, device: &AdbDevice) -> AdbControllerType {
        let mut ty = device.controller_type;
        if let Some(input) = self.config.input_preset {
            ty = ty.with_input(input);
        }
        if let Some(screencap) = self.config.screencap {
            ty = ty.with_screencap(screencap);
        }
        ty
    }

    /// 创建 ADB 控制器并等待连接
    pub async fn create_controller(&self, device: &AdbDevice) -> Result<ControllerHandle<'a>> {
        info!("使用设备: {} ({})", device.name, device.address);

        let raw = self.api.adb_controller_create(
            &device.adb_path,
            &device.address,
            self.controller_type(device),
            &device.config,
            &self.config.agent_path.to_string_lossy(),
        )?;
        let controller = session::controller(self.api, raw)?;

        let id = self.api.controller_post_connection(controller.raw());
        if id == MAA_INVALID_ID {
            warn!("MaaControllerPostConnection 返回无效 ID");
            return Ok(controller);
        }

        let status = match self.config.wait_mode {
            WaitMode::Blocking => self.api.controller_wait(controller.raw(), id),
            WaitMode::Polling => {
                let api = self.api;
                let raw = controller.raw();
                self.poll_status(|| api.controller_status(raw, id)).await.status
            }
        };
        info!("连接状态: {}, connected={}", status, self.api.controller_connected(controller.raw()));

        Ok(controller)
    }

    /// 创建资源并加载资源目录
    pub async fn create_resource(&self) -> Result<ResourceHandle<'a>> {
        let resource = session::resource(self.api, self.api.resource_create())?;

        let path = self.config.resource_dir.to_string_lossy();
        info!("加载资源: {}", path);
        let id = self.api.resource_post_path(resource.raw(), &path)?;
        if id == MAA_INVALID_ID {
            warn!("MaaResourcePostPath 返回无效 ID");
            return Ok(resource);
        }

        let status = match self.config.wait_mode {
            WaitMode::Blocking => self.api.resource_wait(resource.raw(), id),
            WaitMode::Polling => {
                let api = self.api;
                let raw = resource.raw();
                self.poll_status(|| api.resource_status(raw, id)).await.status
            }
        };
        info!("资源状态: {}, loaded={}", status, self.api.resource_loaded(resource.raw()));

        Ok(resource)
    }

    /// 创建实例并绑定资源与控制器
    pub fn create_instance(
        &self,
        resource: &ResourceHandle<'_>,
        controller: &ControllerHandle<'_>,
    ) -> Result<InstanceHandle<'a>> {
        let instance = session::instance(self.api, self.api.create())?;

        if !self.api.bind_resource(instance.raw(), resource.raw()) {
            warn!("MaaBindResource 返回 false");
        }
        if !self.api.bind_controller(instance.raw(), controller.raw()) {
            warn!("MaaBindController 返回 false");
        }

        Ok(instance)
    }

    /// 按固定次数投递任务，逐个等待完成
    ///
    /// 某个任务轮询超过上限后不再投递后续任务。
    pub async fn run_tasks(&self, instance: &InstanceHandle<'_>) -> Result<Vec<TaskResult>> {
        let api = self.api;
        let raw = instance.raw();
        let mut results = Vec::new();

        for index in 0..self.config.task_count {
            let id = api.post_task(raw, &self.config.task_entry, &self.config.task_param)?;
            info!("投递任务 #{} {}: id={}", index, self.config.task_entry, id);

            let outcome = if id == MAA_INVALID_ID {
                warn!("MaaPostTask 返回无效 ID");
                PollOutcome { status: MaaStatus::Invalid, polls: 0, timed_out: false }
            } else {
                match self.config.wait_mode {
                    WaitMode::Blocking => PollOutcome {
                        status: api.wait_task(raw, id),
                        polls: 0,
                        timed_out: false,
                    },
                    WaitMode::Polling => self.poll_status(|| api.task_status(raw, id)).await,
                }
            };

            info!("任务 #{} 状态: {}", index, outcome.status);
            results.push(TaskResult {
                index,
                id,
                status: outcome.status,
                polls: outcome.polls,
                timed_out: outcome.timed_out,
            });

            if outcome.timed_out {
                warn!("任务 #{} 轮询 {} 次仍未结束，放弃剩余任务", index, outcome.polls);
                break;
            }
        }

        Ok(results)
    }

    async fn wait_all_finished(&self, instance: &InstanceHandle<'_>) {
        let mut rounds = 0;
        while !self.api.task_all_finished(instance.raw()) {
            rounds += 1;
            if self.config.max_poll_rounds > 0 && rounds >= self.config.max_poll_rounds {
                warn!("等待全部任务结束超时");
                return;
            }
            tokio::time::sleep(self.poll_interval()).await;
        }
    }

    /// 销毁前停止实例上仍在运行的任务
    pub fn stop_instance(&self, instance: &InstanceHandle<'_>) {
        if !self.api.post_stop(instance.raw()) {
            warn!("MaaPostStop 返回 false");
        }
    }

    /// 固定间隔轮询状态，直到不再处于等待/运行中
    pub async fn poll_status<F>(&self, mut status: F) -> PollOutcome
    where
        F: FnMut() -> MaaStatus,
    {
        let max_rounds = self.config.max_poll_rounds;
        let mut polls = 0;

        loop {
            let current = status();
            polls += 1;

            if !current.is_busy() {
                return PollOutcome { status: current, polls, timed_out: false };
            }
            if max_rounds > 0 && polls >= max_rounds {
                return PollOutcome { status: current, polls, timed_out: true };
            }

            tokio::time::sleep(self.poll_interval()).await;
        }
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms)
    }
}
