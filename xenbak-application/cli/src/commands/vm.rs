//! 虚拟机列表、查找与导入

use anyhow::{Context as _, Result};
use tracing::info;

use super::output::print_vms;
use super::Context;
use crate::config::expand_path;

pub async fn list(ctx: &Context, format: &str) -> Result<u8> {
    let vms = ctx.xe_client().list_vms().await.context("获取虚拟机列表失败")?;
    print_vms(&vms, format)?;
    Ok(0)
}

pub async fn search(ctx: &Context, terms: &[String], format: &str) -> Result<u8> {
    let vms = ctx
        .xe_client()
        .search_by_name(terms)
        .await
        .context("查找虚拟机失败")?;
    print_vms(&vms, format)?;
    Ok(0)
}

pub async fn import(ctx: &Context, filename: &str) -> Result<u8> {
    let path = expand_path(filename);
    let filename = path
        .to_str()
        .with_context(|| format!("导入路径不是合法的 UTF-8: {:?}", path))?;

    ctx.xe_client()
        .import_vm(filename)
        .await
        .with_context(|| format!("导入虚拟机失败: {}", filename))?;

    info!("已导入 {}", filename);
    Ok(0)
}
