//! xenbak 虚拟机清单库
//!
//! 通过 `xe` 命令行管理 XenServer / XCP-ng 虚拟机，支持：
//! - 解析 `xe vm-list` 输出得到虚拟机列表
//! - 按名称（多关键字 AND）或 UUID 查找虚拟机
//! - 快照 + 导出为 `.xva` 文件
//! - 从 `.xva` 文件导入
//!
//! # 示例
//!
//! ```ignore
//! use std::sync::Arc;
//! use xenbak_executor::SystemRunner;
//! use xenbak_inventory::{XeClient, XeConfig};
//!
//! let client = XeClient::new(Arc::new(SystemRunner::new()), XeConfig::default());
//!
//! for vm in client.search_by_name(&["web".to_string()]).await? {
//!     let file = client.export_vm(&vm, Some("/srv/backup".as_ref())).await?;
//!     println!("{}", file.path.display());
//! }
//! ```

mod client;
mod error;
mod models;
mod parser;

pub use client::{export_file_name, XeClient, XeConfig};
pub use error::{InventoryError, Result};
pub use models::{ExportedVm, VmRecord};
pub use parser::parse_vm_list;
