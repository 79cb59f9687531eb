//! 挂载点管理

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};
use xenbak_executor::CommandRunner;

use crate::error::{NfsError, Result};

/// 通过 `mountpoint`/`mount`/`umount` 管理挂载
pub struct MountManager {
    runner: Arc<dyn CommandRunner>,
}

impl MountManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// 目录是否已经是挂载点
    ///
    /// `mountpoint -q` 退出码为 0 表示已挂载，其余退出码均视为未挂载
    pub async fn is_mountpoint(&self, dir: &Path) -> Result<bool> {
        let output = self
            .runner
            .run("mountpoint", &["-q".to_string(), path_arg(dir)?])
            .await?;

        debug!("mountpoint {:?}: 退出码 {:?}", dir, output.exit_code);
        Ok(output.is_success())
    }

    /// 挂载设备到目录
    pub async fn mount(&self, device: &str, dir: &Path) -> Result<()> {
        info!("挂载 {} 到 {:?}", device, dir);

        self.runner
            .run_checked("mount", &[device.to_string(), path_arg(dir)?])
            .await?;
        Ok(())
    }

    /// 卸载目录
    pub async fn umount(&self, dir: &Path) -> Result<()> {
        info!("卸载 {:?}", dir);

        self.runner.run_checked("umount", &[path_arg(dir)?]).await?;
        Ok(())
    }

    /// 未挂载时挂载，返回是否执行了挂载
    pub async fn ensure_mounted(&self, device: &str, dir: &Path) -> Result<bool> {
        if self.is_mountpoint(dir).await? {
            info!("{:?} 已经是挂载点，跳过挂载", dir);
            return Ok(false);
        }

        self.mount(device, dir).await?;
        Ok(true)
    }
}

fn path_arg(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| NfsError::NonUtf8Path(path.to_path_buf()))
}
