//! 执行器错误定义

use thiserror::Error;

/// 执行器操作结果类型
pub type Result<T> = std::result::Result<T, ExecutorError>;

/// 执行器错误类型
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// 外部命令以非零状态退出
    #[error("命令 '{command}' 执行失败 (退出码 {exit_code:?}): {output}")]
    CommandFailed {
        /// 完整命令行
        command: String,
        /// 退出码（被信号终止时为 None）
        exit_code: Option<i32>,
        /// 捕获的输出
        output: String,
    },

    /// 无法启动或等待进程
    #[error("启动命令 '{command}' 失败: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExecutorError {
    /// 命令的退出码（仅 CommandFailed 有）
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutorError::CommandFailed { exit_code, .. } => *exit_code,
            ExecutorError::Spawn { .. } => None,
        }
    }
}
