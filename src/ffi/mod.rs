//! MaaFramework / MaaToolkit 外部函数声明
//!
//! 只做声明与转发，所有行为都在原生库内部。

pub mod api;
pub mod callback;
pub mod define;
pub mod library;

pub use api::{MaaApi, NativeApi};
pub use library::MaaLibrary;
