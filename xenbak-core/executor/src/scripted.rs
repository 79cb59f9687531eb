//! 脚本化执行器
//!
//! 按命令行前缀返回预设输出并记录每次调用，用于在不调用真实进程的情况下
//! 测试文本解析与命令编排

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::Result;
use crate::output::{command_line, CommandOutput};
use crate::runner::CommandRunner;

/// 一次命令调用记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// 完整命令行
    pub fn command_line(&self) -> String {
        command_line(&self.program, &self.args)
    }

    /// 取 `key=value` 形式参数的值
    pub fn arg_value(&self, key: &str) -> Option<&str> {
        self.args.iter().find_map(|arg| {
            arg.split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }
}

type Responder = Box<dyn Fn(&Invocation) -> CommandOutput + Send + Sync>;

/// 按规则返回输出的执行器
///
/// 规则按注册顺序匹配，第一个前缀匹配的规则生效；
/// 没有规则匹配的命令返回空的成功输出
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, Responder)>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 命令行以 `prefix` 开头时返回固定输出
    pub fn on(self, prefix: impl Into<String>, output: CommandOutput) -> Self {
        self.on_with(prefix, move |_| output.clone())
    }

    /// 命令行以 `prefix` 开头时调用闭包生成输出
    pub fn on_with<F>(mut self, prefix: impl Into<String>, responder: F) -> Self
    where
        F: Fn(&Invocation) -> CommandOutput + Send + Sync + 'static,
    {
        self.rules.push((prefix.into(), Box::new(responder)));
        self
    }

    /// 所有已记录的调用
    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock().clone()
    }

    /// 所有已记录调用的命令行
    pub fn command_lines(&self) -> Vec<String> {
        self.lock().iter().map(Invocation::command_line).collect()
    }

    /// 命令行以 `prefix` 开头的调用次数
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.lock()
            .iter()
            .filter(|inv| inv.command_line().starts_with(prefix))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Invocation>> {
        self.invocations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        };
        let line = invocation.command_line();

        let output = self
            .rules
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, responder)| responder(&invocation))
            .unwrap_or_else(|| CommandOutput::success(""));

        self.lock().push(invocation);
        Ok(output)
    }
}
