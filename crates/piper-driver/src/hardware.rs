//! 硬件能力接口

use crate::error::DriverError;
use crate::types::{GripperReading, JointVector};

/// 机械臂硬件驱动能力
///
/// 控制层只依赖这 5 个调用，不关心底层传输介质。
/// 关节单位为弧度，夹爪位置单位为米（0.07 为完全张开）。
pub trait HardwareDriver {
    /// 复位机械臂（清除急停、使能电机、切换到关节位置模式）
    fn reset(&mut self) -> Result<(), DriverError>;

    /// 读取当前关节角
    fn get_joint_positions(&mut self) -> Result<JointVector, DriverError>;

    /// 下发关节目标
    fn set_joint_positions(&mut self, positions: JointVector) -> Result<(), DriverError>;

    /// 读取夹爪位置与力矩
    fn get_gripper_state(&mut self) -> Result<GripperReading, DriverError>;

    /// 下发夹爪目标位置（米）
    fn set_gripper_ctrl(&mut self, position: f64) -> Result<(), DriverError>;
}

impl<D: HardwareDriver + ?Sized> HardwareDriver for Box<D> {
    fn reset(&mut self) -> Result<(), DriverError> {
        (**self).reset()
    }

    fn get_joint_positions(&mut self) -> Result<JointVector, DriverError> {
        (**self).get_joint_positions()
    }

    fn set_joint_positions(&mut self, positions: JointVector) -> Result<(), DriverError> {
        (**self).set_joint_positions(positions)
    }

    fn get_gripper_state(&mut self) -> Result<GripperReading, DriverError> {
        (**self).get_gripper_state()
    }

    fn set_gripper_ctrl(&mut self, position: f64) -> Result<(), DriverError> {
        (**self).set_gripper_ctrl(position)
    }
}
