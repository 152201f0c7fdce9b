//! One-shot 命令

pub mod config;
pub mod motion;
pub mod position;

pub use config::ConfigCommand;
pub use motion::MotionCommand;
pub use position::PositionCommand;
