//! 虚拟机数据模型

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 虚拟机记录
///
/// 由 `xe vm-list` 输出中的一段解析得到，只在单次命令执行期间存在
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmRecord {
    /// 虚拟机 UUID
    pub uuid: String,
    /// 名称（name-label）
    pub name: String,
    /// 电源状态（power-state）
    pub status: String,
}

impl VmRecord {
    pub fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            status: status.into(),
        }
    }

    /// 名称是否包含所有关键字（区分大小写）
    pub fn matches_all(&self, terms: &[String]) -> bool {
        terms.iter().all(|term| self.name.contains(term.as_str()))
    }

    /// 快照名称
    pub fn snapshot_label(&self) -> String {
        format!("backup-{}", self.name)
    }
}

impl fmt::Display for VmRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.uuid, self.name, self.status)
    }
}

/// 一次成功导出的结果
#[derive(Debug, Clone)]
pub struct ExportedVm {
    /// 虚拟机名称
    pub vm_name: String,
    /// 导出文件路径
    pub path: PathBuf,
    /// 导出所用快照的 UUID（导出后已删除）
    pub snapshot_uuid: String,
    /// 耗时
    pub elapsed: Duration,
}

impl ExportedVm {
    /// 耗时（秒）
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
