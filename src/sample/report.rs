use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ffi::define::{AdbDevice, MaaStatus, MaaTaskId};

/// 示例流程的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoOutcome {
    /// 全部任务已执行
    Completed,
    /// 没有找到设备，提前退出
    NoDevice,
    /// 实例初始化失败，销毁后退出
    InitFailed,
}

/// 单个任务的执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub index: u32,
    pub id: MaaTaskId,
    pub status: MaaStatus,
    /// 轮询次数（阻塞等待时为 0）
    pub polls: u32,
    pub timed_out: bool,
}

/// 一次示例运行的汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoReport {
    pub version: Option<String>,
    pub outcome: DemoOutcome,
    pub device: Option<AdbDevice>,
    pub tasks: Vec<TaskResult>,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
}

impl DemoReport {
    pub fn new(version: Option<String>) -> Self {
        Self {
            version,
            outcome: DemoOutcome::Completed,
            device: None,
            tasks: Vec::new(),
            started_at: Local::now(),
            finished_at: None,
        }
    }

    /// 标记结束
    pub fn finish(mut self, outcome: DemoOutcome) -> Self {
        self.outcome = outcome;
        self.finished_at = Some(Local::now());
        self
    }

    /// 成功的任务数
    pub fn succeeded(&self) -> usize {
        self.tasks.iter().filter(|t| t.status == MaaStatus::Success).count()
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MaaFramework 版本: {}", self.version.as_deref().unwrap_or("未知"))?;

        match self.outcome {
            DemoOutcome::NoDevice => return write!(f, "未找到任何设备"),
            DemoOutcome::InitFailed => {
                if let Some(device) = &self.device {
                    writeln!(f, "设备: {} ({})", device.name, device.address)?;
                }
                return write!(f, "初始化失败");
            }
            DemoOutcome::Completed => {}
        }

        if let Some(device) = &self.device {
            writeln!(f, "设备: {} ({})", device.name, device.address)?;
        }
        for task in &self.tasks {
            write!(f, "任务 #{} id={} 状态: {}", task.index, task.id, task.status)?;
            if task.timed_out {
                write!(f, " (超时)")?;
            }
            writeln!(f)?;
        }
        write!(f, "完成 {}/{}", self.succeeded(), self.tasks.len())
    }
}
