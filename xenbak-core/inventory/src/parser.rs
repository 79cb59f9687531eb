//! `xe vm-list` 输出解析
//!
//! # 输出格式示例
//!
//! ```text
//! uuid ( RO)           : 6f1a4c2e-0b7d-4c1e-9a55-1d2b3c4d5e6f
//!      name-label ( RW): web1
//!     power-state ( RO): running
//!
//!
//! uuid ( RO)           : 9b8c7d6e-5f4a-3b2c-1d0e-0f1e2d3c4b5a
//!      name-label ( RW): db1
//!     power-state ( RO): halted
//! ```
//!
//! 记录之间以两个空行分隔，每段前三行依次为 uuid、name-label、power-state

use tracing::debug;

use crate::error::{InventoryError, Result};
use crate::models::VmRecord;

/// 记录分隔符
const BLOCK_SEPARATOR: &str = "\n\n\n";

/// 解析 `xe vm-list` 输出
///
/// 空输出返回空列表；每个非空段必须至少有三行 `key: value`
pub fn parse_vm_list(output: &str) -> Result<Vec<VmRecord>> {
    debug!("解析 vm-list 输出: {} 字节", output.len());

    let mut vms = Vec::new();

    for block in output.split(BLOCK_SEPARATOR) {
        let lines: Vec<&str> = block
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .collect();

        if lines.is_empty() {
            continue;
        }

        if lines.len() < 3 {
            return Err(InventoryError::ParseError(format!(
                "记录只有 {} 行: {:?}",
                lines.len(),
                block
            )));
        }

        let uuid = parse_field(lines[0])?;
        let name = parse_field(lines[1])?;
        let status = parse_field(lines[2])?;

        vms.push(VmRecord::new(uuid, name, status));
    }

    debug!("解析完成: {} 台虚拟机", vms.len());
    Ok(vms)
}

/// 取第一个与第二个 `:` 之间的值，并去掉紧跟的一个分隔字符
///
/// 值中第二个 `:` 及其后的内容被丢弃
fn parse_field(line: &str) -> Result<&str> {
    let value = line
        .split(':')
        .nth(1)
        .ok_or_else(|| InventoryError::ParseError(format!("缺少 ':' 分隔符: {:?}", line)))?;

    let mut chars = value.chars();
    chars.next();
    Ok(chars.as_str())
}
