//! 反馈帧结构体定义
//!
//! 关节角度反馈 (0x2A5~0x2A7) 和夹爪反馈 (0x2A8) 的解析。

use crate::control::{JointPair, millideg_to_rad};
use crate::{PiperFrame, ProtocolError, bytes_to_i16_be, bytes_to_i32_be, ids::*};
use bilge::prelude::*;

/// 关节角度反馈 (0x2A5 / 0x2A6 / 0x2A7)
///
/// 单位：0.001°（原始值），可通过方法转换为弧度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointFeedback {
    pub pair: JointPair,
    pub first_mdeg: i32,  // Byte 0-3
    pub second_mdeg: i32, // Byte 4-7
}

impl JointFeedback {
    /// 前一个关节角度（弧度）
    pub fn first_rad(&self) -> f64 {
        millideg_to_rad(self.first_mdeg)
    }

    /// 后一个关节角度（弧度）
    pub fn second_rad(&self) -> f64 {
        millideg_to_rad(self.second_mdeg)
    }
}

impl TryFrom<PiperFrame> for JointFeedback {
    type Error = ProtocolError;

    fn try_from(frame: PiperFrame) -> Result<Self, Self::Error> {
        let pair = JointPair::from_feedback_id(frame.id)
            .ok_or(ProtocolError::InvalidCanId { id: frame.id })?;
        frame.require_len(8)?;

        let first_mdeg =
            bytes_to_i32_be([frame.data[0], frame.data[1], frame.data[2], frame.data[3]]);
        let second_mdeg =
            bytes_to_i32_be([frame.data[4], frame.data[5], frame.data[6], frame.data[7]]);

        Ok(Self {
            pair,
            first_mdeg,
            second_mdeg,
        })
    }
}

/// 夹爪状态位域（Byte 6: 8 位）
///
/// Bit 6 为使能状态，**1：使能 0：失能**。
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default)]
pub struct GripperStatus {
    pub voltage_low: bool,
    pub motor_over_temp: bool,
    pub driver_over_current: bool,
    pub driver_over_temp: bool,
    pub sensor_error: bool,
    pub driver_error: bool,
    pub enabled: bool,
    pub homed: bool,
}

/// 夹爪反馈指令 (0x2A8)
///
/// - 行程单位：0.001mm（原始值）
/// - 扭矩单位：0.001N·m（原始值）
#[derive(Debug, Clone, Copy, Default)]
pub struct GripperFeedback {
    pub travel_um: i32,        // Byte 0-3
    pub torque_mnm: i16,       // Byte 4-5
    pub status: GripperStatus, // Byte 6
}

impl GripperFeedback {
    /// 获取行程（mm）
    pub fn travel_mm(&self) -> f64 {
        self.travel_um as f64 / 1000.0
    }

    /// 获取扭矩（N·m）
    pub fn torque_nm(&self) -> f64 {
        self.torque_mnm as f64 / 1000.0
    }
}

impl TryFrom<PiperFrame> for GripperFeedback {
    type Error = ProtocolError;

    fn try_from(frame: PiperFrame) -> Result<Self, Self::Error> {
        if frame.id != ID_GRIPPER_FEEDBACK {
            return Err(ProtocolError::InvalidCanId { id: frame.id });
        }
        frame.require_len(7)?;

        let travel_um =
            bytes_to_i32_be([frame.data[0], frame.data[1], frame.data[2], frame.data[3]]);
        let torque_mnm = bytes_to_i16_be([frame.data[4], frame.data[5]]);
        let status = GripperStatus::from(u8::new(frame.data[6]));

        Ok(Self {
            travel_um,
            torque_mnm,
            status,
        })
    }
}
