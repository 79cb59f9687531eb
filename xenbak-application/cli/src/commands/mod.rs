//! CLI 命令处理模块

pub mod export;
pub mod nfs;
pub mod output;
pub mod vm;

use std::sync::Arc;

use anyhow::Result;
use xenbak_executor::CommandRunner;
use xenbak_inventory::XeClient;
use xenbak_nfs::{MountManager, NfsBackup};

use crate::config::CliConfig;
use crate::Commands;

/// 命令执行上下文
pub struct Context {
    pub config: CliConfig,
    runner: Arc<dyn CommandRunner>,
}

impl Context {
    pub fn new(config: CliConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// 创建 xe 客户端
    pub fn xe_client(&self) -> XeClient {
        XeClient::new(self.runner.clone(), self.config.xe.clone())
    }

    /// 创建 NFS 批量备份
    pub fn nfs_backup(&self) -> NfsBackup {
        NfsBackup::new(self.xe_client(), MountManager::new(self.runner.clone()))
    }
}

/// 分发命令，返回进程退出码
pub async fn dispatch(command: Commands, ctx: &Context) -> Result<u8> {
    match command {
        Commands::List { format } => vm::list(ctx, &format).await,
        Commands::Search { terms, format } => vm::search(ctx, &terms, &format).await,
        Commands::Export { uuid, dir, terms } => {
            export::handle(ctx, uuid.as_deref(), &terms, dir.as_deref()).await
        }
        Commands::Import { filename } => vm::import(ctx, &filename).await,
        Commands::NfsExportAll {
            device,
            folder,
            delete_old,
        } => nfs::handle(ctx, &device, &folder, delete_old).await,
    }
}
