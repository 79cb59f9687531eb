//! NFS 批量导出

use std::io::{self, Write};

use anyhow::{Context as _, Result};
use tracing::warn;

use super::output::exported_line;
use super::Context;
use crate::config::expand_path;

pub async fn handle(ctx: &Context, device: &str, folder: &str, delete_old: bool) -> Result<u8> {
    handle_to(ctx, device, folder, delete_old, &mut io::stdout()).await
}

/// 执行批量导出，结果写入 `out`
///
/// 每台虚拟机导出完成后立即输出一行，之后的失败不影响已输出的行
pub async fn handle_to<W: Write>(
    ctx: &Context,
    device: &str,
    folder: &str,
    delete_old: bool,
    out: &mut W,
) -> Result<u8> {
    let directory = expand_path(folder);

    let report = ctx
        .nfs_backup()
        .export_all_with(device, &directory, delete_old, |exported| {
            if let Err(e) = writeln!(out, "{}", exported_line(exported)) {
                warn!("输出导出结果失败: {}", e);
            }
        })
        .await
        .with_context(|| format!("NFS 批量导出到 {:?} 失败", directory))?;

    for removed in &report.removed {
        writeln!(out, "Removed old file {}", removed.display())?;
    }

    Ok(0)
}
