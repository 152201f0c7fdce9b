//! 回零 / 回起始位姿

use crate::robot::{Arm, Settings};
use anyhow::{Context, Result};

/// 单次运动命令：复位后移动到固定位姿
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    Home,
    Start,
}

impl MotionCommand {
    pub fn execute(self, settings: &Settings) -> Result<()> {
        let mut arm = settings.connect()?;
        self.run(&mut arm)?;
        println!("Joints (rad): {}", arm.current_command());
        Ok(())
    }

    fn run(self, arm: &mut Arm) -> Result<()> {
        arm.initialize().context("Failed to reset arm")?;
        match self {
            MotionCommand::Home => arm.reset_to_zero().context("Failed to move to zero pose"),
            MotionCommand::Start => arm
                .set_start_position()
                .context("Failed to move to start pose"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piper_control::{ArmController, GripperModel};
    use piper_driver::{HardwareDriver, JointVector, MockDriver};

    fn mock_arm() -> Arm {
        let driver: Box<dyn HardwareDriver> = Box::new(MockDriver::new());
        ArmController::new(
            driver,
            JointVector::new([0.1; 6]),
            GripperModel::default(),
        )
    }

    #[test]
    fn test_home_moves_to_zero() {
        let mut arm = mock_arm();
        MotionCommand::Home.run(&mut arm).unwrap();
        assert_eq!(arm.current_command(), JointVector::ZERO);
        assert_eq!(arm.get_absolute().unwrap(), JointVector::ZERO);
    }

    #[test]
    fn test_start_moves_to_start_pose() {
        let mut arm = mock_arm();
        MotionCommand::Home.run(&mut arm).unwrap();
        MotionCommand::Start.run(&mut arm).unwrap();
        assert_eq!(arm.get_absolute().unwrap(), JointVector::new([0.1; 6]));
    }
}
