//! # Piper 遥操作控制层
//!
//! 位于 [`piper_driver::HardwareDriver`] 之上，负责：
//!
//! - **frame**：绝对/相对（相对起始位姿）与弧度/角度之间的换算和舍入策略
//! - **gripper**：夹爪物理开口与 [0, 1] 归一化值之间的映射
//! - **controller**：维护"当前下发的关节目标"，对外提供控制 API
//! - **parser**：把一行操作员输入解析为 [`ParsedCommand`]
//! - **session**：读取-解析-分发-打印的交互状态机
//! - **config**：TOML 配置文件
//!
//! ```rust
//! use piper_control::{ArmController, GripperModel, InteractiveSession, ScriptedInput};
//! use piper_driver::{JointVector, MockDriver};
//!
//! let start = JointVector::new([-1.593, 0.634, -0.286, 0.0, 0.385, -1.85]);
//! let mut arm = ArmController::new(MockDriver::new(), start, GripperModel::default());
//! arm.initialize().unwrap();
//!
//! let input = ScriptedInput::new(["+0.1 0 -0.2 0 0.3 0", "q"]);
//! let mut session = InteractiveSession::new(&mut arm, input, Vec::new());
//! session.run().unwrap();
//!
//! assert_eq!(arm.current_command()[0], -1.493);
//! ```

pub mod config;
pub mod controller;
pub mod frame;
pub mod gripper;
pub mod parser;
pub mod session;

pub use config::{ConfigError, TeleopConfig};
pub use controller::ArmController;
pub use gripper::GripperModel;
pub use parser::{ParseError, ParsedCommand, parse_gripper, parse_main};
pub use session::{InteractiveSession, LineSource, ScriptedInput, SessionError, SessionState};

/// 默认起始位姿（弧度）
pub const DEFAULT_START_POSE: [f64; piper_driver::JOINT_COUNT] =
    [-1.593, 0.634, -0.286, 0.0, 0.385, -1.85];
