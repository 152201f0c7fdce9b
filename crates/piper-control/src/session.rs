//! 交互式会话状态机
//!
//! ```text
//!            g                         q / EOF
//! GripperMenu <──── MainMenu ─────────────────> Terminated
//!      │      ────>    ↺ 关节命令 / 无效输入
//!      ↺ o/c/数值/无效  b
//! ```
//!
//! 每轮先打印当前状态，再读取一行输入并分发。输入错误在本地报告并保持状态；
//! 分发时的驱动错误同样只报告不退出，已下发的目标保持不变。
//! 刷新状态显示时的驱动错误会结束会话。

use crate::controller::ArmController;
use crate::parser::{MAIN_EXAMPLES, ParsedCommand, parse_gripper, parse_main};
use piper_driver::{DriverError, HardwareDriver};
use std::collections::VecDeque;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, warn};

/// 主菜单提示符
pub const MAIN_PROMPT: &str = "Enter joint angles (prefix + for relative, suffix d for degrees)\n\
                               or 'g' for gripper control, 'q' to quit: ";

/// 夹爪菜单提示符
pub const GRIPPER_PROMPT: &str = "Gripper command: ";

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    MainMenu,
    GripperMenu,
    Terminated,
}

/// 会话错误
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// 行输入源
///
/// 返回 `Ok(None)` 表示输入结束（EOF / Ctrl-C），会话随之结束。
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

impl<L: LineSource + ?Sized> LineSource for &mut L {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        (**self).read_line(prompt)
    }
}

/// 预先给定的输入序列（测试、管道输入）
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// 已经显示过的提示符
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// 剩余未读取的行数
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

/// 交互式会话
pub struct InteractiveSession<'a, D: HardwareDriver, I: LineSource, W: Write> {
    arm: &'a mut ArmController<D>,
    input: I,
    out: W,
    state: SessionState,
}

impl<'a, D: HardwareDriver, I: LineSource, W: Write> InteractiveSession<'a, D, I, W> {
    pub fn new(arm: &'a mut ArmController<D>, input: I, out: W) -> Self {
        Self {
            arm,
            input,
            out,
            state: SessionState::MainMenu,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// 运行直到 Terminated
    pub fn run(&mut self) -> Result<(), SessionError> {
        while self.state != SessionState::Terminated {
            self.step()?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// 执行一轮：显示状态、读取一行、分发
    pub fn step(&mut self) -> Result<SessionState, SessionError> {
        let prompt = match self.state {
            SessionState::MainMenu => {
                self.print_state()?;
                MAIN_PROMPT
            },
            SessionState::GripperMenu => {
                self.print_gripper_menu()?;
                GRIPPER_PROMPT
            },
            SessionState::Terminated => return Ok(SessionState::Terminated),
        };
        self.out.flush()?;

        let Some(line) = self.input.read_line(prompt)? else {
            debug!("Input closed, ending session");
            self.state = SessionState::Terminated;
            return Ok(self.state);
        };

        let command = match self.state {
            SessionState::GripperMenu => parse_gripper(&line),
            _ => parse_main(&line),
        };
        debug!("Parsed {:?} from {:?}", command, line);

        self.state = self.dispatch(command)?;
        Ok(self.state)
    }

    fn print_state(&mut self) -> Result<(), SessionError> {
        let absolute = self.arm.get_absolute()?;
        let degrees = self.arm.get_absolute_degrees()?;
        let relative = self.arm.get_relative()?;
        let gripper = self.arm.get_gripper()?;

        writeln!(self.out, "\nCurrent state:")?;
        writeln!(self.out, "Joints (rad): {}", absolute)?;
        writeln!(self.out, "Joints (deg): {:.1}", degrees)?;
        writeln!(self.out, "Relative to start (rad): {}", relative)?;
        writeln!(
            self.out,
            "Gripper position: {:.2} (0=closed, 1=open)",
            gripper
        )?;
        Ok(())
    }

    fn print_gripper_menu(&mut self) -> Result<(), SessionError> {
        let current = self.arm.get_gripper()?;
        writeln!(self.out, "\nCurrent gripper: {:.2} (0=closed, 1=open)", current)?;
        writeln!(self.out, "Commands: o=open, c=close, 0-1=position, b=back")?;
        Ok(())
    }

    fn dispatch(&mut self, command: ParsedCommand) -> Result<SessionState, SessionError> {
        let state = self.state;
        let (result, confirmation) = match command {
            ParsedCommand::Quit => return Ok(SessionState::Terminated),
            ParsedCommand::GripperMenu => return Ok(SessionState::GripperMenu),
            ParsedCommand::Back => return Ok(SessionState::MainMenu),
            ParsedCommand::AbsoluteSet(angles) => (self.arm.set_absolute(angles), None),
            ParsedCommand::RelativeSet(deltas) => (self.arm.set_relative(deltas), None),
            ParsedCommand::GripperOpen => (
                self.arm.set_gripper(1.0),
                Some("Gripper opened fully".to_string()),
            ),
            ParsedCommand::GripperClose => (
                self.arm.set_gripper(0.0),
                Some("Gripper closed fully".to_string()),
            ),
            ParsedCommand::GripperSetPosition(t) => (
                self.arm.set_gripper(t),
                Some(format!("Gripper set to {:.2}", t)),
            ),
            ParsedCommand::Invalid(e) => {
                if state == SessionState::GripperMenu {
                    writeln!(self.out, "{}", e)?;
                } else {
                    writeln!(self.out, "Invalid input: {}", e)?;
                    writeln!(self.out, "Example valid inputs:")?;
                    for (label, example) in MAIN_EXAMPLES {
                        writeln!(self.out, "{}: {}", label, example)?;
                    }
                }
                return Ok(state);
            },
        };

        match result {
            Ok(()) => {
                if let Some(message) = confirmation {
                    writeln!(self.out, "{}", message)?;
                }
            },
            Err(e) => {
                warn!("Command failed: {}", e);
                writeln!(self.out, "Command failed: {}", e)?;
            },
        }
        Ok(state)
    }
}
