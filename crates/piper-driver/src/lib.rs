//! 驱动层模块
//!
//! 遥操作控制层只通过 [`HardwareDriver`] 能力接口访问机械臂：
//! 复位、读/写关节角、读夹爪状态、写夹爪目标。
//!
//! 本 crate 提供两个实现：
//! - [`PiperDriver`]：基于 [`piper_can::CanAdapter`] 的真实 CAN 适配器
//! - [`MockDriver`]：内存中的模拟机械臂，用于测试和 `--mock` 模式

mod builder;
mod error;
mod hardware;
pub mod mock;
mod piper;
mod types;

pub use builder::PiperDriverBuilder;
pub use error::DriverError;
pub use hardware::HardwareDriver;
pub use mock::{DriverCall, FailOn, MockDriver};
pub use piper::{PiperDriver, PiperDriverConfig};
pub use types::{GripperReading, JOINT_COUNT, JointVector, round_decimals};
