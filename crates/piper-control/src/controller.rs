//! 机械臂控制器
//!
//! 组合关节坐标换算、夹爪模型与 [`HardwareDriver`]，持有"当前下发的关节目标"。
//!
//! 每个 `set_*` 调用恰好产生一次硬件写，每个 `get_*` 调用恰好产生一次硬件读，
//! 读结果从不缓存。

use crate::frame::{self, RADIAN_DECIMALS};
use crate::gripper::GripperModel;
use piper_driver::{DriverError, HardwareDriver, JointVector};
use tracing::{debug, info};

/// 机械臂控制器
pub struct ArmController<D: HardwareDriver> {
    driver: D,
    start_pose: JointVector,
    gripper: GripperModel,
    current_command: JointVector,
}

impl<D: HardwareDriver> ArmController<D> {
    /// 创建控制器，当前目标初始化为起始位姿
    pub fn new(driver: D, start_pose: JointVector, gripper: GripperModel) -> Self {
        Self {
            driver,
            start_pose,
            gripper,
            current_command: start_pose,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn start_pose(&self) -> JointVector {
        self.start_pose
    }

    pub fn gripper_model(&self) -> &GripperModel {
        &self.gripper
    }

    /// 最近一次成功下发的关节目标
    pub fn current_command(&self) -> JointVector {
        self.current_command
    }

    /// 复位硬件，并把当前目标重置为起始位姿
    ///
    /// 复位失败是致命错误，不会自动重试。
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        info!("Resetting arm");
        self.driver.reset()?;
        self.current_command = self.start_pose;
        Ok(())
    }

    /// 下发绝对关节目标（舍入到 3 位小数）
    ///
    /// 硬件写失败时当前目标保持不变。
    pub fn set_absolute(&mut self, angles: JointVector) -> Result<(), DriverError> {
        let target = angles.round_to(RADIAN_DECIMALS);
        debug!("Commanding joints {}", target);
        self.driver.set_joint_positions(target)?;
        self.current_command = target;
        Ok(())
    }

    /// 下发相对起始位姿的关节目标
    ///
    /// 相对量总是相对起始位姿，重复下发同样的偏移不会累加。
    pub fn set_relative(&mut self, deltas: JointVector) -> Result<(), DriverError> {
        self.set_absolute(frame::to_absolute(deltas, self.start_pose))
    }

    /// 回到起始位姿
    pub fn set_start_position(&mut self) -> Result<(), DriverError> {
        info!("Moving to start pose {}", self.start_pose);
        self.set_absolute(self.start_pose)
    }

    /// 所有关节回零
    pub fn reset_to_zero(&mut self) -> Result<(), DriverError> {
        info!("Moving to zero pose");
        self.set_absolute(JointVector::ZERO)
    }

    /// 读取实际关节角（弧度，3 位小数）
    pub fn get_absolute(&mut self) -> Result<JointVector, DriverError> {
        Ok(self.driver.get_joint_positions()?.round_to(RADIAN_DECIMALS))
    }

    /// 读取实际关节角（角度，1 位小数）
    pub fn get_absolute_degrees(&mut self) -> Result<JointVector, DriverError> {
        Ok(frame::radians_to_degrees(self.get_absolute()?))
    }

    /// 读取相对起始位姿的关节角（弧度，3 位小数）
    pub fn get_relative(&mut self) -> Result<JointVector, DriverError> {
        Ok(frame::to_relative(self.get_absolute()?, self.start_pose))
    }

    /// 读取相对起始位姿的关节角（角度，1 位小数）
    pub fn get_relative_degrees(&mut self) -> Result<JointVector, DriverError> {
        Ok(frame::radians_to_degrees(self.get_relative()?))
    }

    /// 读取归一化夹爪开口
    pub fn get_gripper(&mut self) -> Result<f64, DriverError> {
        let reading = self.driver.get_gripper_state()?;
        Ok(self.gripper.normalize(reading.position))
    }

    /// 设置归一化夹爪开口（截断到 [0, 1]）
    pub fn set_gripper(&mut self, t: f64) -> Result<(), DriverError> {
        let width = self.gripper.denormalize(t);
        debug!("Commanding gripper {:.3} -> {:.4} m", t, width);
        self.driver.set_gripper_ctrl(width)
    }
}
