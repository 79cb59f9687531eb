//! xe 客户端
//!
//! 通过 `xe` 命令行查询虚拟机列表并执行快照、导出、导入

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use xenbak_executor::CommandRunner;

use crate::error::{InventoryError, Result};
use crate::models::{ExportedVm, VmRecord};
use crate::parser::parse_vm_list;

/// 导出文件名中的时间格式
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// xe 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XeConfig {
    /// xe 可执行文件
    #[serde(default = "default_binary")]
    pub binary: String,
    /// 导出时是否压缩
    #[serde(default = "default_compress")]
    pub compress: bool,
}

fn default_binary() -> String {
    "xe".to_string()
}

fn default_compress() -> bool {
    true
}

impl Default for XeConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            compress: default_compress(),
        }
    }
}

/// 生成导出文件名：`<YYYY-MM-DD_HH-MM-SS> <name>.xva`（UTC）
pub fn export_file_name(name: &str, at: DateTime<Utc>) -> String {
    format!("{} {}.xva", at.format(TIMESTAMP_FORMAT), name)
}

/// xe 客户端
///
/// 所有命令顺序执行，任何一步失败立即返回
pub struct XeClient {
    runner: Arc<dyn CommandRunner>,
    config: XeConfig,
}

impl XeClient {
    /// 创建新的 xe 客户端
    ///
    /// # Arguments
    /// * `runner` - 命令执行器
    /// * `config` - xe 配置
    pub fn new(runner: Arc<dyn CommandRunner>, config: XeConfig) -> Self {
        Self { runner, config }
    }

    /// 获取配置
    pub fn config(&self) -> &XeConfig {
        &self.config
    }

    /// 执行 xe 子命令并检查是否成功
    async fn xe(&self, args: Vec<String>) -> Result<String> {
        let output = self.runner.run_checked(&self.config.binary, &args).await?;
        Ok(output.stdout)
    }

    /// 获取可备份的虚拟机列表（排除控制域和快照）
    ///
    /// 执行 `xe vm-list is-control-domain=false is-a-snapshot=false`
    pub async fn list_vms(&self) -> Result<Vec<VmRecord>> {
        info!("获取虚拟机列表");

        let stdout = self
            .xe(vec![
                "vm-list".to_string(),
                "is-control-domain=false".to_string(),
                "is-a-snapshot=false".to_string(),
            ])
            .await?;

        let vms = parse_vm_list(&stdout)?;

        info!("找到 {} 台虚拟机", vms.len());
        Ok(vms)
    }

    /// 按名称查找虚拟机
    ///
    /// 名称需包含所有关键字（区分大小写）；关键字为空时返回全部
    pub async fn search_by_name(&self, terms: &[String]) -> Result<Vec<VmRecord>> {
        debug!("按名称查找虚拟机: {:?}", terms);

        let vms = self
            .list_vms()
            .await?
            .into_iter()
            .filter(|vm| vm.matches_all(terms))
            .collect();

        Ok(vms)
    }

    /// 按 UUID 精确查找虚拟机
    pub async fn search_by_uuid(&self, uuid: &str) -> Result<Vec<VmRecord>> {
        debug!("按 UUID 查找虚拟机: {}", uuid);

        let vms = self
            .list_vms()
            .await?
            .into_iter()
            .filter(|vm| vm.uuid == uuid)
            .collect();

        Ok(vms)
    }

    /// 导出虚拟机
    ///
    /// 先创建快照，再把快照导出为 `.xva` 文件，最后删除快照
    ///
    /// # Arguments
    /// * `vm` - 要导出的虚拟机
    /// * `directory` - 导出目录（为空时使用当前目录）
    ///
    /// # Example
    /// ```ignore
    /// let exported = client.export_vm(&vm, Some(Path::new("/mnt/backup"))).await?;
    /// println!("{} ({:.1}s)", exported.path.display(), exported.elapsed_secs());
    /// ```
    pub async fn export_vm(&self, vm: &VmRecord, directory: Option<&Path>) -> Result<ExportedVm> {
        self.export_vm_at(vm, directory, Utc::now()).await
    }

    /// 以指定时间戳命名导出文件
    pub async fn export_vm_at(
        &self,
        vm: &VmRecord,
        directory: Option<&Path>,
        at: DateTime<Utc>,
    ) -> Result<ExportedVm> {
        let start = Instant::now();

        let file_name = export_file_name(&vm.name, at);
        let path = match directory {
            Some(dir) => dir.join(&file_name),
            None => PathBuf::from(&file_name),
        };

        // xe 参数只能是 UTF-8，不做有损转换
        let filename = path
            .to_str()
            .ok_or_else(|| InventoryError::NonUtf8Path(path.clone()))?
            .to_string();

        info!("导出虚拟机 {} ({}) 到 {}", vm.name, vm.uuid, filename);

        let snapshot_uuid = self.create_snapshot(vm).await?;

        // 失败时不回滚，快照会残留
        if let Err(e) = self.export_snapshot(&snapshot_uuid, &filename).await {
            warn!(
                "导出虚拟机 {} 失败，快照 {} 未被删除: {}",
                vm.name, snapshot_uuid, e
            );
            return Err(e);
        }

        let exported = ExportedVm {
            vm_name: vm.name.clone(),
            path,
            snapshot_uuid,
            elapsed: start.elapsed(),
        };

        info!(
            "虚拟机 {} 导出完成, 耗时 {:.2} 秒",
            exported.vm_name,
            exported.elapsed_secs()
        );

        Ok(exported)
    }

    /// 创建快照，返回快照 UUID
    async fn create_snapshot(&self, vm: &VmRecord) -> Result<String> {
        let stdout = self
            .xe(vec![
                "vm-snapshot".to_string(),
                format!("uuid={}", vm.uuid),
                format!("new-name-label={}", vm.snapshot_label()),
            ])
            .await?;

        let snapshot_uuid = stdout.trim().to_string();
        if snapshot_uuid.is_empty() {
            return Err(InventoryError::EmptySnapshotUuid(vm.name.clone()));
        }

        debug!("虚拟机 {} 快照已创建: {}", vm.name, snapshot_uuid);
        Ok(snapshot_uuid)
    }

    /// 修改快照参数、导出并删除快照
    async fn export_snapshot(&self, snapshot_uuid: &str, filename: &str) -> Result<()> {
        // 快照需要先去掉模板和 HA 标记才能导出
        self.xe(vec![
            "template-param-set".to_string(),
            "is-a-template=false".to_string(),
            "ha-always-run=false".to_string(),
            format!("uuid={}", snapshot_uuid),
        ])
        .await?;

        let mut args = vec![
            "vm-export".to_string(),
            format!("vm={}", snapshot_uuid),
            format!("filename={}", filename),
        ];
        if self.config.compress {
            args.push("--compress".to_string());
        }
        self.xe(args).await?;

        self.xe(vec![
            "vm-uninstall".to_string(),
            format!("uuid={}", snapshot_uuid),
            "force=true".to_string(),
        ])
        .await?;

        debug!("快照 {} 已删除", snapshot_uuid);
        Ok(())
    }

    /// 从文件导入虚拟机
    ///
    /// 执行 `xe vm-import filename=<filename>`
    pub async fn import_vm(&self, filename: &str) -> Result<()> {
        info!("导入虚拟机: {}", filename);

        self.xe(vec![
            "vm-import".to_string(),
            format!("filename={}", filename),
        ])
        .await?;

        info!("导入完成: {}", filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use xenbak_executor::{CommandOutput, ScriptedRunner};

    const VM_LIST: &str = "uuid ( RO)           : u-1
     name-label ( RW): prod-web
    power-state ( RO): running


uuid ( RO)           : u-2
     name-label ( RW): prod-db
    power-state ( RO): running


uuid ( RO)           : u-3
     name-label ( RW): test-web
    power-state ( RO): halted


";

    fn scripted_client(runner: ScriptedRunner) -> (XeClient, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        (XeClient::new(runner.clone(), XeConfig::default()), runner)
    }

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_export_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(export_file_name("web1", at), "2024-01-02_03-04-05 web1.xva");
    }

    #[tokio::test]
    async fn test_list_vms_runs_vm_list() {
        let (client, runner) =
            scripted_client(ScriptedRunner::new().on("xe vm-list", CommandOutput::success(VM_LIST)));

        let vms = client.list_vms().await.unwrap();

        assert_eq!(vms.len(), 3);
        assert_eq!(
            runner.command_lines(),
            vec!["xe vm-list is-control-domain=false is-a-snapshot=false"]
        );
    }

    #[tokio::test]
    async fn test_list_vms_propagates_failure() {
        let (client, _) = scripted_client(
            ScriptedRunner::new().on("xe vm-list", CommandOutput::failure(1, "connection refused")),
        );

        let err = client.list_vms().await.unwrap_err();
        assert!(matches!(err, InventoryError::Command(_)));
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let (client, _) =
            scripted_client(ScriptedRunner::new().on("xe vm-list", CommandOutput::success(VM_LIST)));

        let all = client.search_by_name(&[]).await.unwrap();
        assert_eq!(all.len(), 3);

        let found = client.search_by_name(&terms(&["prod", "web"])).await.unwrap();
        assert_eq!(found, vec![VmRecord::new("u-1", "prod-web", "running")]);

        let web: Vec<String> = client
            .search_by_name(&terms(&["web"]))
            .await
            .unwrap()
            .into_iter()
            .map(|vm| vm.uuid)
            .collect();
        assert_eq!(web, vec!["u-1", "u-3"]);

        assert!(client.search_by_name(&terms(&["PROD"])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_by_uuid() {
        let (client, _) =
            scripted_client(ScriptedRunner::new().on("xe vm-list", CommandOutput::success(VM_LIST)));

        let found = client.search_by_uuid("u-2").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].uuid, "u-2");

        assert!(client.search_by_uuid("u-").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_sequence() {
        let (client, runner) = scripted_client(
            ScriptedRunner::new().on("xe vm-snapshot", CommandOutput::success("snap-1\n")),
        );
        let vm = VmRecord::new("u-1", "web1", "running");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let exported = client
            .export_vm_at(&vm, Some(Path::new("/mnt/backup")), at)
            .await
            .unwrap();

        assert_eq!(
            exported.path,
            PathBuf::from("/mnt/backup/2024-01-02_03-04-05 web1.xva")
        );
        assert_eq!(exported.snapshot_uuid, "snap-1");
        assert_eq!(
            runner.command_lines(),
            vec![
                "xe vm-snapshot uuid=u-1 new-name-label=backup-web1",
                "xe template-param-set is-a-template=false ha-always-run=false uuid=snap-1",
                "xe vm-export vm=snap-1 filename=/mnt/backup/2024-01-02_03-04-05 web1.xva --compress",
                "xe vm-uninstall uuid=snap-1 force=true",
            ]
        );
    }

    #[tokio::test]
    async fn test_export_without_directory_or_compression() {
        let runner = Arc::new(
            ScriptedRunner::new().on("xe vm-snapshot", CommandOutput::success("snap-1")),
        );
        let config = XeConfig {
            binary: "/opt/xensource/bin/xe".to_string(),
            compress: false,
        };
        let client = XeClient::new(runner.clone(), config);
        let vm = VmRecord::new("u-1", "web1", "running");
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let exported = client.export_vm_at(&vm, None, at).await.unwrap();

        assert_eq!(exported.path, PathBuf::from("2024-01-02_03-04-05 web1.xva"));
        assert_eq!(
            runner.invocations()[2].args,
            vec!["vm-export", "vm=snap-1", "filename=2024-01-02_03-04-05 web1.xva"]
        );
        assert_eq!(runner.invocations()[2].program, "/opt/xensource/bin/xe");
    }

    #[tokio::test]
    async fn test_export_failure_leaves_snapshot() {
        let (client, runner) = scripted_client(
            ScriptedRunner::new()
                .on("xe vm-snapshot", CommandOutput::success("snap-1"))
                .on("xe vm-export", CommandOutput::failure(1, "disk full")),
        );
        let vm = VmRecord::new("u-1", "web1", "running");

        let err = client.export_vm(&vm, None).await.unwrap_err();

        assert!(matches!(err, InventoryError::Command(_)));
        assert_eq!(runner.count_matching("xe vm-uninstall"), 0);
    }

    #[tokio::test]
    async fn test_snapshot_failure_stops_sequence() {
        let (client, runner) = scripted_client(
            ScriptedRunner::new().on("xe vm-snapshot", CommandOutput::failure(1, "no space")),
        );
        let vm = VmRecord::new("u-1", "web1", "running");

        assert!(client.export_vm(&vm, None).await.is_err());
        assert_eq!(runner.invocations().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_snapshot_uuid_is_error() {
        let (client, runner) =
            scripted_client(ScriptedRunner::new().on("xe vm-snapshot", CommandOutput::success("\n")));
        let vm = VmRecord::new("u-1", "web1", "running");

        let err = client.export_vm(&vm, None).await.unwrap_err();

        assert!(matches!(err, InventoryError::EmptySnapshotUuid(_)));
        assert_eq!(runner.invocations().len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_directory_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (client, runner) = scripted_client(ScriptedRunner::new());
        let vm = VmRecord::new("u-1", "web1", "running");
        let dir = Path::new(OsStr::from_bytes(b"/mnt/backup-\xff"));

        let err = client.export_vm(&vm, Some(dir)).await.unwrap_err();

        assert!(matches!(err, InventoryError::NonUtf8Path(_)));
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_import_vm() {
        let (client, runner) = scripted_client(ScriptedRunner::new());

        client.import_vm("/srv/web1.xva").await.unwrap();

        assert_eq!(runner.command_lines(), vec!["xe vm-import filename=/srv/web1.xva"]);
    }
}
