//! 内存中的模拟机械臂
//!
//! 记录每一次硬件调用，并支持故障注入。下发的关节/夹爪目标立即生效，
//! 也可以用 [`MockDriver::set_reported_joints`] 模拟尚未到位的机械臂。

use crate::error::DriverError;
use crate::hardware::HardwareDriver;
use crate::types::{GripperReading, JointVector};
use std::collections::VecDeque;
use tracing::debug;

/// 一次硬件调用
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverCall {
    Reset,
    GetJointPositions,
    SetJointPositions(JointVector),
    GetGripperState,
    SetGripperCtrl(f64),
}

impl DriverCall {
    /// 是否为写调用
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            DriverCall::Reset | DriverCall::SetJointPositions(_) | DriverCall::SetGripperCtrl(_)
        )
    }
}

/// 故障注入目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Reset,
    GetJointPositions,
    SetJointPositions,
    GetGripperState,
    SetGripperCtrl,
    /// 下一次任意调用
    Any,
}

impl FailOn {
    fn matches(self, call: &DriverCall) -> bool {
        match self {
            FailOn::Any => true,
            FailOn::Reset => matches!(call, DriverCall::Reset),
            FailOn::GetJointPositions => matches!(call, DriverCall::GetJointPositions),
            FailOn::SetJointPositions => matches!(call, DriverCall::SetJointPositions(_)),
            FailOn::GetGripperState => matches!(call, DriverCall::GetGripperState),
            FailOn::SetGripperCtrl => matches!(call, DriverCall::SetGripperCtrl(_)),
        }
    }
}

/// 模拟驱动
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    joints: JointVector,
    gripper: GripperReading,
    calls: Vec<DriverCall>,
    failures: VecDeque<FailOn>,
    /// 下发关节目标后是否立即反映到读数
    hold_reported_joints: bool,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置初始关节读数
    pub fn with_joints(mut self, joints: JointVector) -> Self {
        self.joints = joints;
        self
    }

    /// 设置初始夹爪开口（米）
    pub fn with_gripper(mut self, position: f64) -> Self {
        self.gripper.position = position;
        self
    }

    /// 固定关节读数，后续 `set_joint_positions` 不再改变读数
    ///
    /// 用于模拟机械臂尚未到达目标的情况。
    pub fn set_reported_joints(&mut self, joints: JointVector) {
        self.joints = joints;
        self.hold_reported_joints = true;
    }

    /// 让下一次匹配的调用失败（可排队多个）
    pub fn fail_next(&mut self, on: FailOn) {
        self.failures.push_back(on);
    }

    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// 写调用次数
    pub fn write_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_write()).count()
    }

    /// 读调用次数
    pub fn read_count(&self) -> usize {
        self.calls.len() - self.write_count()
    }

    /// 最近一次关节写入的目标
    pub fn last_joint_command(&self) -> Option<JointVector> {
        self.calls.iter().rev().find_map(|c| match c {
            DriverCall::SetJointPositions(v) => Some(*v),
            _ => None,
        })
    }

    /// 最近一次夹爪写入的目标（米）
    pub fn last_gripper_command(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|c| match c {
            DriverCall::SetGripperCtrl(p) => Some(*p),
            _ => None,
        })
    }

    pub fn joints(&self) -> JointVector {
        self.joints
    }

    pub fn gripper_position(&self) -> f64 {
        self.gripper.position
    }

    /// 记录调用并检查故障注入
    fn record(&mut self, call: DriverCall) -> Result<(), DriverError> {
        debug!("MockDriver call: {:?}", call);
        self.calls.push(call);

        if let Some(pos) = self.failures.iter().position(|f| f.matches(&call)) {
            self.failures.remove(pos);
            return Err(DriverError::Hardware(format!("injected failure on {:?}", call)));
        }
        Ok(())
    }
}

impl HardwareDriver for MockDriver {
    fn reset(&mut self) -> Result<(), DriverError> {
        self.record(DriverCall::Reset)
    }

    fn get_joint_positions(&mut self) -> Result<JointVector, DriverError> {
        self.record(DriverCall::GetJointPositions)?;
        Ok(self.joints)
    }

    fn set_joint_positions(&mut self, positions: JointVector) -> Result<(), DriverError> {
        self.record(DriverCall::SetJointPositions(positions))?;
        if !self.hold_reported_joints {
            self.joints = positions;
        }
        Ok(())
    }

    fn get_gripper_state(&mut self) -> Result<GripperReading, DriverError> {
        self.record(DriverCall::GetGripperState)?;
        Ok(self.gripper)
    }

    fn set_gripper_ctrl(&mut self, position: f64) -> Result<(), DriverError> {
        self.record(DriverCall::SetGripperCtrl(position))?;
        self.gripper.position = position;
        Ok(())
    }
}
