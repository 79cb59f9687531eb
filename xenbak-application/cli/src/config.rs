//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/xenbak/config.toml)，可用 `--config` 指定
//!
//! ```toml
//! export_dir = "/srv/xva"
//!
//! [xe]
//! binary = "/opt/xensource/bin/xe"
//! compress = true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xenbak_inventory::XeConfig;

/// CLI 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// xe 命令配置
    #[serde(default)]
    pub xe: XeConfig,

    /// `export` 未指定 `-d` 时使用的导出目录
    pub export_dir: Option<String>,
}

impl CliConfig {
    /// 获取默认配置文件路径
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("xenbak").join("config.toml"))
    }

    /// 加载配置
    ///
    /// 指定路径时文件必须存在；默认路径不存在时使用默认配置
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&expand_path(path)),
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    /// 从指定文件加载配置
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    /// 默认导出目录
    pub fn export_dir(&self) -> Option<PathBuf> {
        self.export_dir.as_deref().map(expand_path)
    }
}

/// 展开路径中的 `~`
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
