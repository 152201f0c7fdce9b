//! 控制帧结构体定义
//!
//! 遥操作用到的控制指令：控制模式 (0x151)、关节目标 (0x155~0x157)、
//! 夹爪 (0x159)、急停恢复 (0x150) 和电机使能 (0x471)。

use crate::{PiperFrame, ProtocolError, i16_to_bytes_be, i32_to_bytes_be, ids::*};
use bilge::prelude::*;

// ============================================================================
// 控制模式指令相关枚举
// ============================================================================

/// 控制模式（控制指令版本，0x151）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlModeCommand {
    /// 待机模式
    #[default]
    Standby = 0x00,
    /// CAN指令控制模式
    CanControl = 0x01,
    /// 示教模式
    Teach = 0x02,
}

impl TryFrom<u8> for ControlModeCommand {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(ControlModeCommand::Standby),
            0x01 => Ok(ControlModeCommand::CanControl),
            0x02 => Ok(ControlModeCommand::Teach),
            _ => Err(ProtocolError::InvalidValue {
                field: "ControlModeCommand".to_string(),
                value,
            }),
        }
    }
}

/// MOVE 模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    /// MOVE P - 点位模式（末端位姿控制）
    #[default]
    MoveP = 0x00,
    /// MOVE J - 关节模式
    MoveJ = 0x01,
    /// MOVE L - 直线运动
    MoveL = 0x02,
}

/// 控制模式指令 (0x151)
///
/// 关节位置控制前必须先切到 CAN 控制 + MOVE J，`speed_percent` 为 0~100。
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlModeCommandFrame {
    pub control_mode: ControlModeCommand, // Byte 0
    pub move_mode: MoveMode,              // Byte 1
    pub speed_percent: u8,                // Byte 2 (0-100)
                                          // Byte 3-7: MIT 模式/停留时间/安装位置，遥操作填 0
}

impl ControlModeCommandFrame {
    /// CAN 控制 + 关节模式
    pub fn joint_position(speed_percent: u8) -> Self {
        Self {
            control_mode: ControlModeCommand::CanControl,
            move_mode: MoveMode::MoveJ,
            speed_percent: speed_percent.min(100),
        }
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> PiperFrame {
        let mut data = [0u8; 8];
        data[0] = self.control_mode as u8;
        data[1] = self.move_mode as u8;
        data[2] = self.speed_percent;

        PiperFrame::new_standard(ID_CONTROL_MODE as u16, &data)
    }
}

// ============================================================================
// 关节控制指令
// ============================================================================

/// 关节控制/反馈帧的关节对
///
/// 协议把 6 个关节拆成 3 帧，每帧携带两个关节。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointPair {
    J12,
    J34,
    J56,
}

impl JointPair {
    pub const ALL: [JointPair; 3] = [JointPair::J12, JointPair::J34, JointPair::J56];

    /// 该帧第一个关节在 6 维数组中的下标
    pub const fn first_index(self) -> usize {
        match self {
            JointPair::J12 => 0,
            JointPair::J34 => 2,
            JointPair::J56 => 4,
        }
    }

    pub const fn control_id(self) -> u32 {
        match self {
            JointPair::J12 => ID_JOINT_CONTROL_12,
            JointPair::J34 => ID_JOINT_CONTROL_34,
            JointPair::J56 => ID_JOINT_CONTROL_56,
        }
    }

    pub const fn feedback_id(self) -> u32 {
        match self {
            JointPair::J12 => ID_JOINT_FEEDBACK_12,
            JointPair::J34 => ID_JOINT_FEEDBACK_34,
            JointPair::J56 => ID_JOINT_FEEDBACK_56,
        }
    }

    pub fn from_feedback_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|pair| pair.feedback_id() == id)
    }
}

/// 弧度转协议原始值（0.001°）
pub fn rad_to_millideg(rad: f64) -> i32 {
    (rad.to_degrees() * 1000.0).round() as i32
}

/// 协议原始值（0.001°）转弧度
pub fn millideg_to_rad(raw: i32) -> f64 {
    (raw as f64 / 1000.0).to_radians()
}

/// 关节控制指令 (0x155 / 0x156 / 0x157)
///
/// 单位：0.001°（原始值），Byte 0-3 为前一个关节，Byte 4-7 为后一个关节。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointControlCommand {
    pub pair: JointPair,
    pub first_mdeg: i32,
    pub second_mdeg: i32,
}

impl JointControlCommand {
    /// 从弧度创建关节控制指令
    pub fn from_radians(pair: JointPair, first: f64, second: f64) -> Self {
        Self {
            pair,
            first_mdeg: rad_to_millideg(first),
            second_mdeg: rad_to_millideg(second),
        }
    }

    /// 6 个关节目标（弧度）拆成 3 帧指令
    pub fn split_all(joints: &[f64; 6]) -> [Self; 3] {
        JointPair::ALL.map(|pair| {
            let i = pair.first_index();
            Self::from_radians(pair, joints[i], joints[i + 1])
        })
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> PiperFrame {
        let mut data = [0u8; 8];
        data[0..4].copy_from_slice(&i32_to_bytes_be(self.first_mdeg));
        data[4..8].copy_from_slice(&i32_to_bytes_be(self.second_mdeg));

        PiperFrame::new_standard(self.pair.control_id() as u16, &data)
    }
}

// ============================================================================
// 急停/恢复 与 电机使能
// ============================================================================

/// 快速急停动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmergencyStopAction {
    /// 无效
    #[default]
    Invalid = 0x00,
    /// 快速急停
    EmergencyStop = 0x01,
    /// 恢复
    Resume = 0x02,
}

/// 快速急停指令 (0x150)
///
/// 遥操作只使用 Byte 0，轨迹与示教字段全部填 0。
#[derive(Debug, Clone, Copy, Default)]
pub struct EmergencyStopCommand {
    pub action: EmergencyStopAction,
}

impl EmergencyStopCommand {
    /// 创建恢复指令
    pub fn resume() -> Self {
        Self {
            action: EmergencyStopAction::Resume,
        }
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> PiperFrame {
        let mut data = [0u8; 8];
        data[0] = self.action as u8;
        PiperFrame::new_standard(ID_EMERGENCY_STOP as u16, &data)
    }
}

/// 电机使能/失能设置指令 (0x471)
#[derive(Debug, Clone, Copy)]
pub struct MotorEnableCommand {
    pub joint_index: u8, // Byte 0: 1-6 代表关节驱动器序号，7 代表全部关节电机
    pub enable: bool,    // Byte 1: true = 使能 (0x02), false = 失能 (0x01)
}

impl MotorEnableCommand {
    /// 使能全部关节电机
    pub fn enable_all() -> Self {
        Self {
            joint_index: 7,
            enable: true,
        }
    }

    /// 失能全部关节电机
    pub fn disable_all() -> Self {
        Self {
            joint_index: 7,
            enable: false,
        }
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> PiperFrame {
        let mut data = [0u8; 8];
        data[0] = self.joint_index;
        data[1] = if self.enable { 0x02 } else { 0x01 };

        PiperFrame::new_standard(ID_MOTOR_ENABLE as u16, &data)
    }
}

// ============================================================================
// 夹爪控制指令
// ============================================================================

/// 夹爪控制标志位域（Byte 6: 8 位）
///
/// - Bit 0: 置1使能，0失能
/// - Bit 1: 置1清除错误
/// - Bit 2-7: 保留
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default)]
pub struct GripperControlFlags {
    pub enable: bool,
    pub clear_error: bool,
    pub reserved: u6,
}

/// 夹爪控制指令 (0x159)
///
/// - 行程单位：0.001mm（原始值），0值表示完全闭合
/// - 扭矩单位：0.001N·m（原始值）
#[derive(Debug, Clone, Copy)]
pub struct GripperControlCommand {
    pub travel_um: i32, // Byte 0-3
    pub torque_mnm: i16, // Byte 4-5
    pub control_flags: GripperControlFlags, // Byte 6
                        // Byte 7: 零点设置，遥操作固定 0x00
}

impl GripperControlCommand {
    /// 从物理量创建夹爪控制指令
    ///
    /// `travel_mm` 为毫米，`torque_nm` 为 N·m。
    pub fn new(travel_mm: f64, torque_nm: f64, enable: bool) -> Self {
        let mut flags = GripperControlFlags::from(u8::new(0));
        flags.set_enable(enable);
        Self {
            travel_um: (travel_mm * 1000.0).round() as i32,
            torque_mnm: (torque_nm * 1000.0).round() as i16,
            control_flags: flags,
        }
    }

    /// 清除错误
    pub fn clear_error(mut self) -> Self {
        self.control_flags.set_clear_error(true);
        self
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> PiperFrame {
        let mut data = [0u8; 8];
        data[0..4].copy_from_slice(&i32_to_bytes_be(self.travel_um));
        data[4..6].copy_from_slice(&i16_to_bytes_be(self.torque_mnm));
        data[6] = u8::from(self.control_flags).value();

        PiperFrame::new_standard(ID_GRIPPER_CONTROL as u16, &data)
    }
}
