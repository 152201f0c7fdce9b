//! 位置查询命令

use crate::robot::{Arm, Settings};
use anyhow::Result;
use std::io::{self, Write};

/// 查询关节与夹爪状态（不复位，不移动）
#[derive(Debug, Clone, Copy)]
pub struct PositionCommand;

impl PositionCommand {
    pub fn execute(&self, settings: &Settings) -> Result<()> {
        let mut arm = settings.connect()?;
        let stdout = io::stdout();
        print_position(&mut arm, &mut stdout.lock())
    }
}

/// 打印每个关节的绝对/相对角度和夹爪开口
pub fn print_position(arm: &mut Arm, out: &mut impl Write) -> Result<()> {
    let absolute = arm.get_absolute()?;
    let absolute_deg = arm.get_absolute_degrees()?;
    let relative = arm.get_relative()?;
    let relative_deg = arm.get_relative_degrees()?;
    let gripper = arm.get_gripper()?;

    writeln!(out, "Joint positions:")?;
    for i in 0..absolute.as_array().len() {
        writeln!(
            out,
            "  J{}: {:.3} rad ({:.1}°)  relative {:.3} rad ({:.1}°)",
            i + 1,
            absolute[i],
            absolute_deg[i],
            relative[i],
            relative_deg[i]
        )?;
    }
    writeln!(out, "Gripper position: {:.2} (0=closed, 1=open)", gripper)?;
    Ok(())
}
