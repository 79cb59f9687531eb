//! NFS 批量导出

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use xenbak_inventory::{ExportedVm, XeClient};

use crate::error::{NfsError, Result};
use crate::files::{remove_files, snapshot_files};
use crate::mount::MountManager;

/// 批量导出结果
#[derive(Debug, Clone, Default)]
pub struct NfsExportReport {
    /// 是否由本次执行挂载
    pub mounted: bool,
    /// 导出成功的虚拟机
    pub exported: Vec<ExportedVm>,
    /// 已删除的旧文件
    pub removed: Vec<PathBuf>,
}

/// NFS 批量备份
pub struct NfsBackup {
    xe: XeClient,
    mounts: MountManager,
}

impl NfsBackup {
    pub fn new(xe: XeClient, mounts: MountManager) -> Self {
        Self { xe, mounts }
    }

    /// 导出全部虚拟机到 NFS 目录
    ///
    /// 1. 目录不存在时创建
    /// 2. 目录不是挂载点时挂载 `nfs_path`
    /// 3. 记录目录中已有的文件
    /// 4. 依次导出全部虚拟机，遇到失败立即停止
    /// 5. 全部导出成功且 `delete_old` 时删除第 3 步记录的文件
    /// 6. 无论 4、5 是否成功都卸载一次
    ///
    /// # Arguments
    /// * `nfs_path` - mount 语法的 NFS 设备，如 `nas:/export/xen`
    /// * `directory` - 本地挂载目录
    /// * `delete_old` - 是否删除导出前已存在的文件
    pub async fn export_all(
        &self,
        nfs_path: &str,
        directory: &Path,
        delete_old: bool,
    ) -> Result<NfsExportReport> {
        self.export_all_with(nfs_path, directory, delete_old, |_| {})
            .await
    }

    /// 同 [`NfsBackup::export_all`]，每台虚拟机导出完成后立即调用 `on_exported`
    ///
    /// 后续虚拟机导出失败时，已完成的导出也都已经回调过
    pub async fn export_all_with<F>(
        &self,
        nfs_path: &str,
        directory: &Path,
        delete_old: bool,
        mut on_exported: F,
    ) -> Result<NfsExportReport>
    where
        F: FnMut(&ExportedVm),
    {
        info!(
            "开始 NFS 批量导出: {} -> {:?} (删除旧文件: {})",
            nfs_path, directory, delete_old
        );

        if !directory.exists() {
            fs::create_dir_all(directory).map_err(|e| NfsError::io("创建目录", directory, e))?;
            info!("已创建目录 {:?}", directory);
        }

        let mounted = self.mounts.ensure_mounted(nfs_path, directory).await?;

        let result = self
            .export_and_prune(directory, delete_old, &mut on_exported)
            .await;
        let unmounted = self.mounts.umount(directory).await;

        match (result, unmounted) {
            (Ok(mut report), Ok(())) => {
                report.mounted = mounted;
                info!(
                    "NFS 批量导出完成: 导出 {} 台, 删除 {} 个旧文件",
                    report.exported.len(),
                    report.removed.len()
                );
                Ok(report)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(umount_err)) => {
                warn!("导出失败后卸载 {:?} 也失败: {}", directory, umount_err);
                Err(e)
            }
        }
    }

    async fn export_and_prune<F>(
        &self,
        directory: &Path,
        delete_old: bool,
        on_exported: &mut F,
    ) -> Result<NfsExportReport>
    where
        F: FnMut(&ExportedVm),
    {
        let old_files = snapshot_files(directory)?;
        info!("导出前目录中有 {} 个文件", old_files.len());

        let mut report = NfsExportReport::default();

        for vm in self.xe.list_vms().await? {
            let exported = self.xe.export_vm(&vm, Some(directory)).await?;
            on_exported(&exported);
            report.exported.push(exported);
        }

        if delete_old {
            // 与新导出文件同名的不删
            let stale: Vec<PathBuf> = old_files
                .into_iter()
                .filter(|path| !report.exported.iter().any(|e| &e.path == path))
                .collect();

            remove_files(&stale)?;
            report.removed = stale;
        }

        Ok(report)
    }
}
