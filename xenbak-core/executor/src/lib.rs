//! xenbak 命令执行器
//!
//! 所有外部命令（`xe`、`mount`、`umount`、`mountpoint`）都通过
//! [`CommandRunner`] 执行，上层只解析文本输出：
//! - [`SystemRunner`]：基于 `tokio::process` 的真实执行
//! - `ScriptedRunner`：按命令前缀返回预设输出（`test-util` 特性）
//!
//! # 示例
//!
//! ```ignore
//! use xenbak_executor::{CommandRunner, SystemRunner};
//!
//! let runner = SystemRunner::new();
//! let output = runner.run_checked("xe", &["vm-list".to_string()]).await?;
//! println!("{}", output.stdout);
//! ```

mod error;
mod output;
mod runner;
#[cfg(any(test, feature = "test-util"))]
mod scripted;

pub use error::{ExecutorError, Result};
pub use output::{command_line, CommandOutput};
pub use runner::{CommandRunner, SystemRunner};
#[cfg(any(test, feature = "test-util"))]
pub use scripted::{Invocation, ScriptedRunner};
