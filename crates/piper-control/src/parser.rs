//! 操作员命令解析
//!
//! 主菜单语法（按顺序匹配）：
//!
//! | 输入 | 结果 |
//! |------|------|
//! | `q` / `quit` / `exit`（不区分大小写） | [`ParsedCommand::Quit`] |
//! | `g` | [`ParsedCommand::GripperMenu`] |
//! | 6 个数字，可选前缀 `+`（相对）和后缀 `d`（角度） | [`ParsedCommand::AbsoluteSet`] / [`ParsedCommand::RelativeSet`] |
//!
//! 夹爪菜单语法：`b` 返回，`o` 张开，`c` 闭合，或 [0, 1] 内的小数。
//!
//! 解析永远不会失败，错误以 [`ParsedCommand::Invalid`] 返回。

use crate::frame::{self, RADIAN_DECIMALS};
use piper_driver::{JOINT_COUNT, JointVector};
use thiserror::Error;

/// 一行输入的解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    /// 绝对关节目标（弧度，3 位小数）
    AbsoluteSet(JointVector),
    /// 相对起始位姿的关节偏移（弧度，3 位小数）
    RelativeSet(JointVector),
    /// 进入夹爪菜单
    GripperMenu,
    GripperOpen,
    GripperClose,
    /// 归一化夹爪位置，保证在 [0, 1] 内
    GripperSetPosition(f64),
    Quit,
    /// 退出夹爪菜单
    Back,
    Invalid(ParseError),
}

/// 输入格式错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty input: expected 6 joint values")]
    Empty,

    #[error("Expected {expected} joint values, got {found}")]
    WrongArity { expected: usize, found: usize },

    #[error("Could not convert '{token}' to a number")]
    NotANumber { token: String },

    #[error("Joint value '{token}' is not finite")]
    NonFinite { token: String },

    #[error("Position must be between 0 and 1")]
    OutOfRange { value: f64 },

    #[error("Invalid input. Enter number 0-1 or o/c/b")]
    Format { input: String },
}

impl ParseError {
    /// 简短的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Empty => "empty",
            ParseError::WrongArity { .. } => "arity",
            ParseError::NotANumber { .. } => "number",
            ParseError::NonFinite { .. } => "non-finite",
            ParseError::OutOfRange { .. } => "range",
            ParseError::Format { .. } => "format",
        }
    }
}

/// 主菜单输入示例
pub const MAIN_EXAMPLES: [(&str, &str); 5] = [
    ("Absolute radians", "1.0 -0.5 0.3 0.2 -1.2 0.8"),
    ("Absolute degrees", "45 -30 15 10 -70 45d"),
    ("Relative radians", "+0.1 0 -0.2 0 0.3 0"),
    ("Relative degrees", "+5 0 -10 0 15 0d"),
    ("Relative with negative", "+-0.1 0 -0.2 0 0.3 0"),
];

/// 解析主菜单输入
pub fn parse_main(line: &str) -> ParsedCommand {
    let input = line.trim();
    let lower = input.to_ascii_lowercase();

    match lower.as_str() {
        "q" | "quit" | "exit" => return ParsedCommand::Quit,
        "g" => return ParsedCommand::GripperMenu,
        _ => {},
    }

    match parse_joint_line(input) {
        Ok((values, true)) => ParsedCommand::RelativeSet(values),
        Ok((values, false)) => ParsedCommand::AbsoluteSet(values),
        Err(e) => ParsedCommand::Invalid(e),
    }
}

/// 解析 6 个关节值，返回 (弧度值, 是否相对)
fn parse_joint_line(input: &str) -> Result<(JointVector, bool), ParseError> {
    let (body, degrees) = match input.strip_suffix(['d', 'D']) {
        Some(rest) => (rest.trim(), true),
        None => (input, false),
    };

    // `+` 只切换相对模式，不是第一个数的符号
    let (body, relative) = match body.strip_prefix('+') {
        Some(rest) => (rest.trim(), true),
        None => (body, false),
    };

    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut values = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let value: f64 = token.parse().map_err(|_| ParseError::NotANumber {
            token: token.to_string(),
        })?;
        if !value.is_finite() {
            return Err(ParseError::NonFinite {
                token: token.to_string(),
            });
        }
        values.push(value);
    }

    let mut joints = JointVector::from_slice(&values).map_err(|found| ParseError::WrongArity {
        expected: JOINT_COUNT,
        found,
    })?;
    if degrees {
        joints = frame::degrees_to_radians(joints);
    }

    // 极大的有限值在换算或取整时会溢出为 inf
    let joints = joints.round_to(RADIAN_DECIMALS);
    if let Some(i) = joints.iter().position(|v| !v.is_finite()) {
        return Err(ParseError::NonFinite {
            token: tokens[i].to_string(),
        });
    }

    Ok((joints, relative))
}

/// 解析夹爪菜单输入
pub fn parse_gripper(line: &str) -> ParsedCommand {
    let input = line.trim().to_ascii_lowercase();

    match input.as_str() {
        "b" => ParsedCommand::Back,
        "o" => ParsedCommand::GripperOpen,
        "c" => ParsedCommand::GripperClose,
        _ => match input.parse::<f64>() {
            Ok(value) if (0.0..=1.0).contains(&value) => ParsedCommand::GripperSetPosition(value),
            Ok(value) => ParsedCommand::Invalid(ParseError::OutOfRange { value }),
            Err(_) => ParsedCommand::Invalid(ParseError::Format { input }),
        },
    }
}
