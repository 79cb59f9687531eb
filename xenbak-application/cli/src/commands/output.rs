//! CLI 通用输出格式化模块
//!
//! 提供 text/table/json 三种输出格式

use anyhow::Result;
use serde::Serialize;
use xenbak_inventory::{ExportedVm, VmRecord};

/// 可输出为表格行的数据 trait
pub trait TableRow {
    /// 返回表格列标题
    fn headers() -> Vec<&'static str>;

    /// 返回该项的表格行数据
    fn row(&self) -> Vec<String>;
}

impl TableRow for VmRecord {
    fn headers() -> Vec<&'static str> {
        vec!["UUID", "NAME", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.uuid.clone(), self.name.clone(), self.status.clone()]
    }
}

/// 表格格式输出
pub fn render_table<T: TableRow>(items: &[T]) -> String {
    let headers = T::headers();
    let rows: Vec<Vec<String>> = items.iter().map(T::row).collect();

    // 每列宽度取标题和内容的最大值
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i).map(String::len))
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_line = format_line(headers.iter().map(|h| h.to_string()).collect());
    let mut lines = vec![header_line.clone(), "-".repeat(header_line.len())];
    lines.extend(rows.into_iter().map(format_line));
    lines.join("\n")
}

/// JSON 格式输出
pub fn render_json<T: Serialize>(items: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// 按格式渲染虚拟机列表
pub fn render_vms(vms: &[VmRecord], format: &str) -> Result<String> {
    match format {
        "json" => render_json(vms),
        _ if vms.is_empty() => Ok("No VMs found.".to_string()),
        "table" => Ok(render_table(vms)),
        _ => Ok(vms
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// 单台虚拟机导出完成的提示
pub fn exported_line(exported: &ExportedVm) -> String {
    format!(
        "Exported VM \"{}\" in {} seconds.",
        exported.vm_name,
        exported.elapsed_secs()
    )
}

/// 输出虚拟机列表
pub fn print_vms(vms: &[VmRecord], format: &str) -> Result<()> {
    println!("{}", render_vms(vms, format)?);
    Ok(())
}
