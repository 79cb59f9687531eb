//! NFS 备份错误定义

use std::path::PathBuf;

use thiserror::Error;

/// NFS 备份操作结果类型
pub type Result<T> = std::result::Result<T, NfsError>;

/// NFS 备份错误类型
#[derive(Error, Debug)]
pub enum NfsError {
    /// 外部命令错误（mount/umount/mountpoint）
    #[error(transparent)]
    Command(#[from] xenbak_executor::ExecutorError),

    /// 虚拟机清单或导出错误
    #[error(transparent)]
    Inventory(#[from] xenbak_inventory::InventoryError),

    /// 路径不是合法 UTF-8，无法作为命令参数
    #[error("路径不是合法的 UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),

    /// 文件系统错误
    #[error("{action} {path:?} 失败: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NfsError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NfsError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
