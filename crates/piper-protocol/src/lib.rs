//! # Piper Protocol
//!
//! 遥操作所需的 Piper CAN 协议子集（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: CAN ID 常量定义
//! - `control`: 控制帧构建（控制模式、关节、夹爪、使能、恢复）
//! - `feedback`: 反馈帧解析（关节角度、夹爪）
//!
//! ## 字节序
//!
//! 协议使用 Motorola (MSB) 高位在前（大端字节序）。

pub mod control;
pub mod feedback;
pub mod ids;

pub use control::*;
pub use feedback::*;
pub use ids::*;

use thiserror::Error;

/// CAN 2.0 标准帧的统一抽象
///
/// 协议层与 CAN 适配层之间的中间类型：协议层只负责把结构体编码为
/// `PiperFrame` 或从 `PiperFrame` 解析，收发由 `piper-can` 完成。
///
/// ```rust
/// use piper_protocol::PiperFrame;
///
/// let frame = PiperFrame::new_standard(0x155, &[1, 2, 3, 4]);
/// assert_eq!(frame.id(), 0x155);
/// assert_eq!(frame.data_slice(), &[1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiperFrame {
    /// CAN ID（标准帧或扩展帧）
    pub id: u32,

    /// 帧数据（固定 8 字节，未使用部分为 0）
    pub data: [u8; 8],

    /// 有效数据长度 (0-8)
    pub len: u8,

    /// 是否为扩展帧（29-bit ID）
    pub is_extended: bool,
}

impl PiperFrame {
    /// 创建标准帧
    pub fn new_standard(id: u16, data: &[u8]) -> Self {
        let mut fixed_data = [0u8; 8];
        let len = data.len().min(8);
        fixed_data[..len].copy_from_slice(&data[..len]);

        Self {
            id: id as u32,
            data: fixed_data,
            len: len as u8,
            is_extended: false,
        }
    }

    /// 获取数据切片（只包含有效数据）
    pub fn data_slice(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// 获取 CAN ID
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 校验帧长度不小于 `expected`
    pub(crate) fn require_len(&self, expected: usize) -> Result<(), ProtocolError> {
        if (self.len as usize) < expected {
            return Err(ProtocolError::InvalidLength {
                expected,
                actual: self.len as usize,
            });
        }
        Ok(())
    }
}

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid CAN ID: 0x{id:X}")]
    InvalidCanId { id: u32 },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u8 },
}

/// 大端字节序转 i32
pub fn bytes_to_i32_be(bytes: [u8; 4]) -> i32 {
    i32::from_be_bytes(bytes)
}

/// 大端字节序转 i16
pub fn bytes_to_i16_be(bytes: [u8; 2]) -> i16 {
    i16::from_be_bytes(bytes)
}

/// i32 转大端字节序
pub fn i32_to_bytes_be(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

/// i16 转大端字节序
pub fn i16_to_bytes_be(value: i16) -> [u8; 2] {
    value.to_be_bytes()
}
