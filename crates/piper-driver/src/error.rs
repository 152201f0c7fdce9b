//! 驱动层错误类型定义

use piper_can::CanError;
use piper_protocol::ProtocolError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// CAN 驱动错误
    #[error("CAN driver error: {0}")]
    Can(#[from] CanError),

    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 等待反馈帧超时
    #[error("Timed out waiting for {waiting_for}")]
    Timeout { waiting_for: &'static str },

    /// 硬件报告的故障（模拟驱动的故障注入也走这里）
    #[error("Hardware fault: {0}")]
    Hardware(String),

    /// 无效输入（如非有限的关节角）
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
