//! 运行模式

pub mod shell;
