//! CAN ID 常量定义
//!
//! 只包含遥操作会收发的帧。

// ============================================================================
// 反馈帧 ID 常量
// ============================================================================

/// 机械臂关节反馈
pub const ID_JOINT_FEEDBACK_12: u32 = 0x2A5;
pub const ID_JOINT_FEEDBACK_34: u32 = 0x2A6;
pub const ID_JOINT_FEEDBACK_56: u32 = 0x2A7;

/// 夹爪反馈
pub const ID_GRIPPER_FEEDBACK: u32 = 0x2A8;

// ============================================================================
// 控制帧 ID 常量
// ============================================================================

/// 快速急停/恢复指令
pub const ID_EMERGENCY_STOP: u32 = 0x150;

/// 控制模式指令
pub const ID_CONTROL_MODE: u32 = 0x151;

/// 关节控制指令
pub const ID_JOINT_CONTROL_12: u32 = 0x155;
pub const ID_JOINT_CONTROL_34: u32 = 0x156;
pub const ID_JOINT_CONTROL_56: u32 = 0x157;

/// 夹爪控制指令
pub const ID_GRIPPER_CONTROL: u32 = 0x159;

/// 电机使能/失能设置指令
pub const ID_MOTOR_ENABLE: u32 = 0x471;

/// 是否为关节角度反馈帧
pub fn is_joint_feedback(id: u32) -> bool {
    (ID_JOINT_FEEDBACK_12..=ID_JOINT_FEEDBACK_56).contains(&id)
}
