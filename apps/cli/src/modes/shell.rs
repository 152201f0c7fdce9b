//! 交互模式
//!
//! 终端下使用 rustyline 提供行编辑（历史仅在本次会话内有效），
//! 标准输入被重定向时逐行读取，便于脚本驱动。

use crate::robot::{Arm, Settings};
use anyhow::{Context, Result};
use piper_control::{InteractiveSession, LineSource};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::info;

/// rustyline 输入源
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialize readline")?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }
}

/// 非终端输入源：输出提示符后读取一行
pub struct PipedSource<R: BufRead, W: Write> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PipedSource<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for PipedSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            // 换行，避免后续输出接在提示符后面
            writeln!(self.prompt_out)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// 复位、移动到起始位姿，然后进入交互循环
pub fn run_shell(settings: &Settings, skip_start: bool) -> Result<()> {
    let mut arm = settings.connect()?;
    prepare(&mut arm, skip_start, &mut io::stdout())?;

    if io::stdin().is_terminal() {
        session(&mut arm, EditorSource::new()?)
    } else {
        session(&mut arm, PipedSource::new(io::stdin().lock(), io::stdout()))
    }
}

fn prepare(arm: &mut Arm, skip_start: bool, out: &mut impl Write) -> Result<()> {
    arm.initialize().context("Failed to reset arm")?;
    if skip_start {
        info!("Skipping start pose move");
        return Ok(());
    }

    arm.set_start_position()
        .context("Failed to move to start pose")?;
    writeln!(out, "Start position (rad): {}", arm.get_absolute()?)?;
    writeln!(out, "Start position (deg): {:.1}", arm.get_absolute_degrees()?)?;
    Ok(())
}

fn session(arm: &mut Arm, input: impl LineSource) -> Result<()> {
    let mut session = InteractiveSession::new(arm, input, io::stdout());
    session.run()?;
    info!("Session ended");
    Ok(())
}
