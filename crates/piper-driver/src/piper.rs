//! Piper CAN 驱动
//!
//! 把 [`HardwareDriver`] 的 5 个调用翻译成 Piper 协议帧：
//!
//! | 调用 | 发送 | 等待 |
//! |---|---|---|
//! | `reset` | 0x150 恢复, 0x471 全部使能, 0x151 CAN/MOVE J | - |
//! | `set_joint_positions` | 0x151 + 0x155/0x156/0x157 | - |
//! | `get_joint_positions` | - | 0x2A5/0x2A6/0x2A7 各一帧 |
//! | `set_gripper_ctrl` | 0x159 | - |
//! | `get_gripper_state` | - | 0x2A8 |

use crate::error::DriverError;
use crate::hardware::HardwareDriver;
use crate::types::{GripperReading, JointVector};
use piper_can::{CanAdapter, CanError, PiperFrame};
use piper_protocol::{
    ControlModeCommandFrame, EmergencyStopCommand, GripperControlCommand, GripperFeedback,
    ID_GRIPPER_FEEDBACK, JointControlCommand, JointFeedback, MotorEnableCommand, is_joint_feedback,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// 取整后的原始值能否无损写入 `[min, max]` 范围的整数字段
fn fits_wire(raw: f64, min: f64, max: f64) -> bool {
    (min..=max).contains(&raw.round())
}

/// Piper 驱动配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiperDriverConfig {
    /// MOVE J 运动速度百分比（1~100）
    pub speed_percent: u8,
    /// 夹爪力矩（N·m）
    pub gripper_effort: f64,
    /// 等待反馈帧的最长时间
    pub feedback_timeout: Duration,
}

impl Default for PiperDriverConfig {
    fn default() -> Self {
        Self {
            speed_percent: 50,
            gripper_effort: 1.0,
            feedback_timeout: Duration::from_millis(100),
        }
    }
}

/// 基于 CAN 适配器的 Piper 驱动
pub struct PiperDriver<A: CanAdapter> {
    adapter: A,
    config: PiperDriverConfig,
}

impl<A: CanAdapter> PiperDriver<A> {
    pub fn new(adapter: A, config: PiperDriverConfig) -> Self {
        Self { adapter, config }
    }

    pub fn config(&self) -> &PiperDriverConfig {
        &self.config
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    fn send(&mut self, frame: PiperFrame) -> Result<(), DriverError> {
        trace!("TX 0x{:03X} {:02X?}", frame.id, frame.data_slice());
        self.adapter.send(frame)?;
        Ok(())
    }

    /// 持续接收直到 `accept` 返回 `Some`，或超过反馈超时
    ///
    /// 无关的帧直接丢弃；适配器的单次读超时不算错误，只看总截止时间。
    fn wait_for<T>(
        &mut self,
        waiting_for: &'static str,
        mut accept: impl FnMut(PiperFrame) -> Result<Option<T>, DriverError>,
    ) -> Result<T, DriverError> {
        let deadline = Instant::now() + self.config.feedback_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(DriverError::Timeout { waiting_for });
            }
            match self.adapter.receive_timeout(remaining) {
                Ok(frame) => {
                    if let Some(value) = accept(frame)? {
                        return Ok(value);
                    }
                },
                Err(CanError::Timeout) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<A: CanAdapter> HardwareDriver for PiperDriver<A> {
    fn reset(&mut self) -> Result<(), DriverError> {
        info!("Resetting arm (resume, enable motors, joint position mode)");
        self.send(EmergencyStopCommand::resume().to_frame())?;
        self.send(MotorEnableCommand::enable_all().to_frame())?;
        self.send(ControlModeCommandFrame::joint_position(self.config.speed_percent).to_frame())?;
        Ok(())
    }

    fn get_joint_positions(&mut self) -> Result<JointVector, DriverError> {
        let mut joints = JointVector::ZERO;
        let mut seen = [false; 3];

        let positions = self.wait_for("joint feedback", |frame| {
            if !is_joint_feedback(frame.id) {
                return Ok(None);
            }
            // 损坏的反馈帧只丢弃，继续等待下一帧
            let feedback = match JointFeedback::try_from(frame) {
                Ok(feedback) => feedback,
                Err(e) => {
                    warn!("Malformed joint feedback 0x{:03X}: {}, ignoring", frame.id, e);
                    return Ok(None);
                },
            };
            let i = feedback.pair.first_index();
            joints[i] = feedback.first_rad();
            joints[i + 1] = feedback.second_rad();
            seen[i / 2] = true;
            Ok(seen.iter().all(|s| *s).then_some(joints))
        })?;

        debug!("Joint feedback: {}", positions);
        Ok(positions)
    }

    fn set_joint_positions(&mut self, positions: JointVector) -> Result<(), DriverError> {
        if !positions.is_finite() {
            return Err(DriverError::InvalidInput(format!(
                "non-finite joint target {}",
                positions
            )));
        }
        if let Some(rad) = positions
            .iter()
            .find(|v| !fits_wire(v.to_degrees() * 1000.0, i32::MIN as f64, i32::MAX as f64))
        {
            return Err(DriverError::InvalidInput(format!(
                "joint target {} rad exceeds the 0.001° i32 range",
                rad
            )));
        }

        debug!("Joint command: {}", positions);
        self.send(ControlModeCommandFrame::joint_position(self.config.speed_percent).to_frame())?;
        for cmd in JointControlCommand::split_all(positions.as_array()) {
            self.send(cmd.to_frame())?;
        }
        Ok(())
    }

    fn get_gripper_state(&mut self) -> Result<GripperReading, DriverError> {
        let feedback = self.wait_for("gripper feedback", |frame| {
            if frame.id != ID_GRIPPER_FEEDBACK {
                return Ok(None);
            }
            match GripperFeedback::try_from(frame) {
                Ok(feedback) => Ok(Some(feedback)),
                Err(e) => {
                    warn!("Malformed gripper feedback: {}, ignoring", e);
                    Ok(None)
                },
            }
        })?;

        let reading = GripperReading {
            position: feedback.travel_mm() / 1000.0,
            effort: feedback.torque_nm(),
        };
        debug!("Gripper feedback: {:?}", reading);
        Ok(reading)
    }

    fn set_gripper_ctrl(&mut self, position: f64) -> Result<(), DriverError> {
        if !position.is_finite() {
            return Err(DriverError::InvalidInput(format!(
                "non-finite gripper target {}",
                position
            )));
        }
        // 行程 0.001mm 为 i32，力矩 0.001N·m 为 i16
        if !fits_wire(position * 1_000_000.0, i32::MIN as f64, i32::MAX as f64) {
            return Err(DriverError::InvalidInput(format!(
                "gripper target {} m exceeds the 0.001mm i32 range",
                position
            )));
        }
        let effort = self.config.gripper_effort;
        if !effort.is_finite() || !fits_wire(effort * 1000.0, i16::MIN as f64, i16::MAX as f64) {
            return Err(DriverError::InvalidInput(format!(
                "gripper effort {} N·m exceeds the 0.001N·m i16 range",
                effort
            )));
        }

        debug!("Gripper command: {:.4} m", position);
        let cmd = GripperControlCommand::new(position * 1000.0, self.config.gripper_effort, true);
        self.send(cmd.to_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piper_protocol::{
        ID_CONTROL_MODE, ID_EMERGENCY_STOP, ID_GRIPPER_CONTROL, ID_JOINT_CONTROL_12,
        ID_JOINT_CONTROL_56, ID_JOINT_FEEDBACK_12, ID_JOINT_FEEDBACK_34, ID_JOINT_FEEDBACK_56,
        ID_MOTOR_ENABLE,
    };
    use std::collections::VecDeque;

    /// 内存 CAN 总线：`rx` 预置反馈帧，`tx` 记录发出的帧
    #[derive(Default)]
    struct FakeBus {
        rx: VecDeque<PiperFrame>,
        tx: Vec<PiperFrame>,
        fail_send: bool,
    }

    impl CanAdapter for FakeBus {
        fn send(&mut self, frame: PiperFrame) -> Result<(), CanError> {
            if self.fail_send {
                return Err(CanError::BusOff);
            }
            self.tx.push(frame);
            Ok(())
        }

        fn receive(&mut self) -> Result<PiperFrame, CanError> {
            self.rx.pop_front().ok_or(CanError::Timeout)
        }
    }

    fn joint_frame(id: u32, a_mdeg: i32, b_mdeg: i32) -> PiperFrame {
        let mut data = [0u8; 8];
        data[0..4].copy_from_slice(&a_mdeg.to_be_bytes());
        data[4..8].copy_from_slice(&b_mdeg.to_be_bytes());
        PiperFrame::new_standard(id as u16, &data)
    }

    fn gripper_frame(travel_um: i32, torque_mnm: i16) -> PiperFrame {
        let mut data = [0u8; 8];
        data[0..4].copy_from_slice(&travel_um.to_be_bytes());
        data[4..6].copy_from_slice(&torque_mnm.to_be_bytes());
        PiperFrame::new_standard(ID_GRIPPER_FEEDBACK as u16, &data)
    }

    fn driver(bus: FakeBus) -> PiperDriver<FakeBus> {
        PiperDriver::new(
            bus,
            PiperDriverConfig {
                feedback_timeout: Duration::from_millis(5),
                ..PiperDriverConfig::default()
            },
        )
    }

    #[test]
    fn test_reset_sequence() {
        let mut driver = driver(FakeBus::default());
        driver.reset().unwrap();

        let ids: Vec<u32> = driver.adapter().tx.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![ID_EMERGENCY_STOP, ID_MOTOR_ENABLE, ID_CONTROL_MODE]);
    }

    #[test]
    fn test_set_joint_positions_frames() {
        let mut driver = driver(FakeBus::default());
        let target = JointVector::new([std::f64::consts::FRAC_PI_2, 0.0, 0.0, 0.0, 0.0, -1.0]);
        driver.set_joint_positions(target).unwrap();

        let tx = &driver.adapter().tx;
        assert_eq!(tx.len(), 4);
        assert_eq!(tx[0].id, ID_CONTROL_MODE);
        assert_eq!(tx[1].id, ID_JOINT_CONTROL_12);
        assert_eq!(&tx[1].data[0..4], &90_000i32.to_be_bytes());
        assert_eq!(tx[3].id, ID_JOINT_CONTROL_56);
        assert_eq!(&tx[3].data[4..8], &(-57_296i32).to_be_bytes());
    }

    #[test]
    fn test_set_joint_positions_rejects_nan() {
        let mut driver = driver(FakeBus::default());
        let mut target = JointVector::ZERO;
        target[3] = f64::NAN;
        assert!(matches!(
            driver.set_joint_positions(target),
            Err(DriverError::InvalidInput(_))
        ));
        assert!(driver.adapter().tx.is_empty());
    }

    #[test]
    fn test_set_joint_positions_rejects_out_of_wire_range() {
        let mut driver = driver(FakeBus::default());
        let mut target = JointVector::ZERO;
        target[0] = 1.0e7;
        assert!(matches!(
            driver.set_joint_positions(target),
            Err(DriverError::InvalidInput(_))
        ));
        assert!(driver.adapter().tx.is_empty());

        // 约 ±37480 rad 以内仍然可以下发
        target[0] = -30_000.0;
        driver.set_joint_positions(target).unwrap();
        assert_eq!(driver.adapter().tx.len(), 4);
    }

    #[test]
    fn test_get_joint_positions_collects_three_frames() {
        let mut bus = FakeBus::default();
        bus.rx.push_back(joint_frame(ID_JOINT_FEEDBACK_34, 10_000, 20_000));
        bus.rx.push_back(gripper_frame(1_000, 0));
        bus.rx.push_back(joint_frame(ID_JOINT_FEEDBACK_12, 90_000, -90_000));
        bus.rx.push_back(joint_frame(ID_JOINT_FEEDBACK_56, 0, 180_000));

        let mut driver = driver(bus);
        let joints = driver.get_joint_positions().unwrap();
        assert!((joints[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((joints[1] + std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((joints[2] - 10f64.to_radians()).abs() < 1e-9);
        assert!((joints[5] - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_get_joint_positions_skips_short_frame() {
        let mut bus = FakeBus::default();
        bus.rx.push_back(PiperFrame::new_standard(ID_JOINT_FEEDBACK_12 as u16, &[0, 1, 2]));
        bus.rx.push_back(joint_frame(ID_JOINT_FEEDBACK_12, 90_000, 0));
        bus.rx.push_back(joint_frame(ID_JOINT_FEEDBACK_34, 0, 0));
        bus.rx.push_back(joint_frame(ID_JOINT_FEEDBACK_56, 0, 0));

        let mut driver = driver(bus);
        let joints = driver.get_joint_positions().unwrap();
        assert!((joints[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_get_gripper_state_skips_short_frame() {
        let mut bus = FakeBus::default();
        bus.rx.push_back(PiperFrame::new_standard(ID_GRIPPER_FEEDBACK as u16, &[0, 0]));
        bus.rx.push_back(gripper_frame(70_000, 0));

        let mut driver = driver(bus);
        let reading = driver.get_gripper_state().unwrap();
        assert!((reading.position - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_get_joint_positions_timeout_on_partial_feedback() {
        let mut bus = FakeBus::default();
        bus.rx.push_back(joint_frame(ID_JOINT_FEEDBACK_12, 0, 0));

        let mut driver = driver(bus);
        assert!(matches!(
            driver.get_joint_positions(),
            Err(DriverError::Timeout {
                waiting_for: "joint feedback"
            })
        ));
    }

    #[test]
    fn test_get_gripper_state_converts_units() {
        let mut bus = FakeBus::default();
        bus.rx.push_back(joint_frame(ID_JOINT_FEEDBACK_12, 0, 0));
        bus.rx.push_back(gripper_frame(35_000, 500));

        let mut driver = driver(bus);
        let reading = driver.get_gripper_state().unwrap();
        assert!((reading.position - 0.035).abs() < 1e-12);
        assert!((reading.effort - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_set_gripper_ctrl_frame() {
        let mut driver = driver(FakeBus::default());
        driver.set_gripper_ctrl(0.035).unwrap();

        let frame = driver.adapter().tx[0];
        assert_eq!(frame.id, ID_GRIPPER_CONTROL);
        // 0.035 m = 35 mm = 35000 × 0.001mm
        assert_eq!(&frame.data[0..4], &35_000i32.to_be_bytes());
        assert_eq!(&frame.data[4..6], &1_000i16.to_be_bytes());
        assert_eq!(frame.data[6] & 0x01, 0x01);
    }

    #[test]
    fn test_set_gripper_ctrl_rejects_out_of_wire_range() {
        let mut driver = driver(FakeBus::default());
        assert!(matches!(
            driver.set_gripper_ctrl(5_000.0),
            Err(DriverError::InvalidInput(_))
        ));

        let mut driver = PiperDriver::new(
            FakeBus::default(),
            PiperDriverConfig {
                gripper_effort: 40.0,
                ..PiperDriverConfig::default()
            },
        );
        assert!(matches!(
            driver.set_gripper_ctrl(0.035),
            Err(DriverError::InvalidInput(_))
        ));
        assert!(driver.adapter().tx.is_empty());
    }

    #[test]
    fn test_send_error_propagates() {
        let mut driver = driver(FakeBus {
            fail_send: true,
            ..FakeBus::default()
        });
        assert!(matches!(
            driver.set_gripper_ctrl(0.0),
            Err(DriverError::Can(CanError::BusOff))
        ));
    }
}
