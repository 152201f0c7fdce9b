//! 集成测试公共工具

#![allow(dead_code)]

use piper_control::{ArmController, GripperModel, InteractiveSession, ScriptedInput};
use piper_driver::{JointVector, MockDriver};
use proptest::prelude::*;

/// 起始位姿（弧度）
pub const START: JointVector = JointVector::new([-1.593, 0.634, -0.286, 0.0, 0.385, -1.85]);

/// 创建一个关节读数位于起始位姿、尚未复位的控制器
pub fn mock_arm() -> ArmController<MockDriver> {
    ArmController::new(
        MockDriver::new().with_joints(START),
        START,
        GripperModel::default(),
    )
}

/// 用给定输入跑完一个会话，返回全部输出
pub fn run_session(arm: &mut ArmController<MockDriver>, lines: &[&str]) -> String {
    let mut session = InteractiveSession::new(arm, ScriptedInput::new(lines.to_vec()), Vec::new());
    session.run().expect("session should end cleanly");
    String::from_utf8(session.into_output()).expect("output is UTF-8")
}

/// 3 位小数精度的关节向量
pub fn millirad_vector(range: std::ops::Range<i32>) -> impl Strategy<Value = JointVector> {
    prop::array::uniform6(range).prop_map(|m| JointVector::new(m.map(|v| v as f64 / 1000.0)))
}

/// 格式化为空格分隔的输入行
pub fn to_input_line(values: &JointVector) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
