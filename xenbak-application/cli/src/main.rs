//! xenbak CLI 应用
//!
//! `xe vm-import`/`xe vm-export` 的简化封装；`nfs-export-all` 把全部虚拟机导出到
//! NFS 设备（mount 语法）

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use xenbak_executor::SystemRunner;

mod commands;
mod config;

use commands::Context;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "xenbak")]
#[command(about = "XenServer 虚拟机导出/导入与 NFS 批量备份", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 日志级别
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// 配置文件路径（默认 ~/.config/xenbak/config.toml）
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 列出全部虚拟机
    List {
        /// 输出格式 (text/table/json)
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "table", "json"])]
        format: String,
    },

    /// 按名称查找虚拟机（名称需包含全部关键字）
    Search {
        /// 搜索关键字
        #[arg(value_name = "SEARCH-TERM")]
        terms: Vec<String>,

        /// 输出格式 (text/table/json)
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "table", "json"])]
        format: String,
    },

    /// 导出单台虚拟机（快照后导出为 .xva）
    Export {
        /// 虚拟机 UUID
        #[arg(long, conflicts_with = "terms")]
        uuid: Option<String>,

        /// 导出目录
        #[arg(short = 'd', long = "dir", value_name = "DIRECTORY")]
        dir: Option<String>,

        /// 搜索关键字
        #[arg(value_name = "SEARCH-TERM")]
        terms: Vec<String>,
    },

    /// 从 .xva 文件导入虚拟机
    Import {
        /// 导入文件
        filename: String,
    },

    /// 挂载 NFS 设备并导出全部虚拟机，完成后卸载
    NfsExportAll {
        /// NFS 设备（mount 语法，如 nas:/export/xen）
        device: String,

        /// 本地挂载目录
        folder: String,

        /// 删除目录中导出前已存在的文件
        #[arg(long)]
        delete_old: bool,
    },
}

fn init_tracing(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout 只输出结果
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level);

    let config = CliConfig::load(cli.config.as_deref())?;
    debug!("配置: {:?}", config);

    let ctx = Context::new(config, Arc::new(SystemRunner::new()));
    let code = commands::dispatch(cli.command, &ctx).await?;

    Ok(ExitCode::from(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_by_uuid() {
        let cli = Cli::try_parse_from(["xenbak", "export", "-d", "/srv", "--uuid", "u-1"]).unwrap();

        match cli.command {
            Commands::Export { uuid, dir, terms } => {
                assert_eq!(uuid.as_deref(), Some("u-1"));
                assert_eq!(dir.as_deref(), Some("/srv"));
                assert!(terms.is_empty());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_uuid_conflicts_with_terms() {
        let result = Cli::try_parse_from(["xenbak", "export", "--uuid", "u-1", "web"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_nfs_export_all() {
        let cli = Cli::try_parse_from([
            "xenbak",
            "nfs-export-all",
            "nas:/export/xen",
            "/mnt/xen",
            "--delete-old",
        ])
        .unwrap();

        match cli.command {
            Commands::NfsExportAll {
                device,
                folder,
                delete_old,
            } => {
                assert_eq!(device, "nas:/export/xen");
                assert_eq!(folder, "/mnt/xen");
                assert!(delete_old);
            }
            _ => panic!("expected nfs-export-all"),
        }
    }

    #[test]
    fn test_search_terms_and_global_options() {
        let cli =
            Cli::try_parse_from(["xenbak", "search", "prod", "web", "-f", "json", "-l", "debug"])
                .unwrap();

        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Search { terms, format } => {
                assert_eq!(terms, vec!["prod", "web"]);
                assert_eq!(format, "json");
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["xenbak", "list", "-f", "yaml"]).is_err());
    }

    #[test]
    fn test_import_requires_filename() {
        assert!(Cli::try_parse_from(["xenbak", "import"]).is_err());
    }
}
