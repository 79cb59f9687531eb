//! 命令执行接口与系统实现
//!
//! 直接调用系统命令（不经过 shell），不设超时，不重试

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ExecutorError, Result};
use crate::output::{command_line, CommandOutput};

/// 外部命令执行接口
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 执行命令并捕获输出
    ///
    /// 非零退出码不视为错误，由调用方通过 [`CommandOutput::is_success`] 判断
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// 执行命令并检查是否成功
    ///
    /// 非零退出码返回 [`ExecutorError::CommandFailed`]
    async fn run_checked(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = self.run(program, args).await?;

        if !output.is_success() {
            return Err(ExecutorError::CommandFailed {
                command: command_line(program, args),
                exit_code: output.exit_code,
                output: output.combined_output(),
            });
        }

        Ok(output)
    }
}

/// 使用本机进程执行命令
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let command = command_line(program, args);
        debug!("执行命令: {}", command);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                command: command.clone(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ExecutorError::Spawn {
                command: command.clone(),
                source,
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        debug!(
            "命令执行完成, 退出码: {:?}, stdout 长度: {}, stderr 长度: {}",
            result.exit_code,
            result.stdout.len(),
            result.stderr.len()
        );

        Ok(result)
    }
}
