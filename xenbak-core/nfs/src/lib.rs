//! xenbak NFS 批量备份
//!
//! 把 NFS 共享挂载到本地目录，导出全部虚拟机，按需删除导出前已存在的文件，
//! 最后卸载
//!
//! # 示例
//!
//! ```ignore
//! use std::sync::Arc;
//! use xenbak_executor::SystemRunner;
//! use xenbak_inventory::{XeClient, XeConfig};
//! use xenbak_nfs::{MountManager, NfsBackup};
//!
//! let runner = Arc::new(SystemRunner::new());
//! let xe = XeClient::new(runner.clone(), XeConfig::default());
//! let backup = NfsBackup::new(xe, MountManager::new(runner));
//!
//! let report = backup
//!     .export_all("nas:/export/xen", "/mnt/xen-backup".as_ref(), true)
//!     .await?;
//! println!("导出 {} 台, 删除 {} 个旧文件", report.exported.len(), report.removed.len());
//! ```

mod backup;
mod error;
mod files;
mod mount;

pub use backup::{NfsBackup, NfsExportReport};
pub use error::{NfsError, Result};
pub use files::{remove_files, snapshot_files};
pub use mount::MountManager;
