//! 示例流程：找设备、建控制器、绑定资源、跑任务、销毁

mod driver;
pub mod report;
mod session;

#[cfg(test)]
mod mock;

pub use driver::Demo;
