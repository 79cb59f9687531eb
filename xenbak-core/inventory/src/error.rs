//! 清单错误定义

use std::path::PathBuf;

use thiserror::Error;

/// 清单操作结果类型
pub type Result<T> = std::result::Result<T, InventoryError>;

/// 清单错误类型
#[derive(Error, Debug)]
pub enum InventoryError {
    /// 外部命令错误
    #[error(transparent)]
    Command(#[from] xenbak_executor::ExecutorError),

    /// `xe vm-list` 输出解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 路径不是合法 UTF-8，无法作为 xe 参数
    #[error("路径不是合法的 UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),

    /// `xe vm-snapshot` 没有返回快照 UUID
    #[error("虚拟机 {0} 的快照命令没有返回 UUID")]
    EmptySnapshotUuid(String),
}
