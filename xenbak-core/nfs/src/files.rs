//! 备份目录文件快照与清理

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{NfsError, Result};

/// 记录目录中当前的文件（导出前的"旧文件"），按路径排序
///
/// 子目录不计入
pub fn snapshot_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| NfsError::io("读取目录", dir, e))? {
        let entry = entry.map_err(|e| NfsError::io("读取目录", dir, e))?;
        let path = entry.path();

        let file_type = entry
            .file_type()
            .map_err(|e| NfsError::io("读取文件类型", &path, e))?;
        if file_type.is_dir() {
            debug!("跳过子目录: {:?}", path);
            continue;
        }

        files.push(path);
    }

    files.sort();
    debug!("目录 {:?} 中有 {} 个文件", dir, files.len());
    Ok(files)
}

/// 删除给定文件，返回删除数量
///
/// 遇到第一个删除失败立即返回
pub fn remove_files(paths: &[PathBuf]) -> Result<usize> {
    for path in paths {
        fs::remove_file(path).map_err(|e| NfsError::io("删除文件", path, e))?;
        debug!("已删除: {:?}", path);
    }

    info!("已删除 {} 个旧文件", paths.len());
    Ok(paths.len())
}
