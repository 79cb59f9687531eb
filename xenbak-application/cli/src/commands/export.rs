//! 单台虚拟机导出

use std::fmt;

use anyhow::{Context as _, Result};
use tracing::info;
use xenbak_inventory::VmRecord;

use super::output::exported_line;
use super::Context;
use crate::config::expand_path;

/// 没有找到虚拟机时的退出码
pub const EXIT_NO_MATCH: u8 = 2;
/// 找到多台虚拟机时的退出码
pub const EXIT_MULTIPLE_MATCHES: u8 = 3;

/// 拒绝导出的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    NoMatch,
    MultipleMatches(usize),
}

impl Refusal {
    pub fn exit_code(&self) -> u8 {
        match self {
            Refusal::NoMatch => EXIT_NO_MATCH,
            Refusal::MultipleMatches(_) => EXIT_MULTIPLE_MATCHES,
        }
    }
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::NoMatch => write!(f, "No VM found to export"),
            Refusal::MultipleMatches(_) => {
                write!(f, "Multiple VMs found, but you only want to export one.")
            }
        }
    }
}

/// 只允许恰好一台虚拟机
pub fn select_single(mut found: Vec<VmRecord>) -> std::result::Result<VmRecord, Refusal> {
    match found.len() {
        0 => Err(Refusal::NoMatch),
        1 => Ok(found.remove(0)),
        n => Err(Refusal::MultipleMatches(n)),
    }
}

pub async fn handle(
    ctx: &Context,
    uuid: Option<&str>,
    terms: &[String],
    dir: Option<&str>,
) -> Result<u8> {
    let xe = ctx.xe_client();

    let found = match uuid {
        Some(uuid) => xe.search_by_uuid(uuid).await,
        None => xe.search_by_name(terms).await,
    }
    .context("查找虚拟机失败")?;

    let vm = match select_single(found) {
        Ok(vm) => vm,
        Err(refusal) => {
            if let Refusal::MultipleMatches(n) = refusal {
                info!("匹配到 {} 台虚拟机", n);
            }
            println!("{}", refusal);
            return Ok(refusal.exit_code());
        }
    };

    let directory = dir.map(expand_path).or_else(|| ctx.config.export_dir());

    let exported = xe
        .export_vm(&vm, directory.as_deref())
        .await
        .with_context(|| format!("导出虚拟机 {} 失败", vm.name))?;

    println!("{}", exported_line(&exported));
    Ok(0)
}
