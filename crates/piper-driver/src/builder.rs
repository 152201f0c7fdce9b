//! Builder 模式实现
//!
//! 提供链式构造 [`PiperDriver`] 的便捷方式。

use crate::error::DriverError;
use crate::piper::{PiperDriver, PiperDriverConfig};
use piper_can::CanAdapter;
use std::time::Duration;

/// Piper 驱动 Builder
///
/// ```no_run
/// use piper_driver::PiperDriverBuilder;
/// use std::time::Duration;
///
/// let driver = PiperDriverBuilder::new()
///     .interface("can0")
///     .speed_percent(30)
///     .feedback_timeout(Duration::from_millis(200))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PiperDriverBuilder {
    interface: String,
    config: PiperDriverConfig,
}

impl PiperDriverBuilder {
    pub fn new() -> Self {
        Self {
            interface: "can0".to_string(),
            config: PiperDriverConfig::default(),
        }
    }

    /// 设置 CAN 接口（默认 "can0"）
    pub fn interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = interface.into();
        self
    }

    /// 设置 MOVE J 速度百分比
    pub fn speed_percent(mut self, speed_percent: u8) -> Self {
        self.config.speed_percent = speed_percent;
        self
    }

    /// 设置夹爪力矩（N·m）
    pub fn gripper_effort(mut self, effort: f64) -> Self {
        self.config.gripper_effort = effort;
        self
    }

    /// 设置反馈等待超时
    pub fn feedback_timeout(mut self, timeout: Duration) -> Self {
        self.config.feedback_timeout = timeout;
        self
    }

    pub fn config(&self) -> &PiperDriverConfig {
        &self.config
    }

    /// 使用给定的 CAN 适配器构建（忽略 interface）
    pub fn build_with_adapter<A: CanAdapter>(self, adapter: A) -> PiperDriver<A> {
        PiperDriver::new(adapter, self.config)
    }

    /// 打开 SocketCAN 接口并构建
    #[cfg(target_os = "linux")]
    pub fn build(self) -> Result<PiperDriver<piper_can::SocketCanAdapter>, DriverError> {
        let adapter = piper_can::SocketCanAdapter::new(self.interface.as_str())?;
        Ok(PiperDriver::new(adapter, self.config))
    }

    #[cfg(not(target_os = "linux"))]
    pub fn build(self) -> Result<PiperDriver<Box<dyn CanAdapter>>, DriverError> {
        Err(DriverError::Can(piper_can::CanError::Device(format!(
            "SocketCAN interface '{}' is only available on Linux",
            self.interface
        ))))
    }
}

impl Default for PiperDriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
