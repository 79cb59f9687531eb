//! 命令执行输出

/// 命令执行输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 标准输出（原样保留，不做 trim）
    pub stdout: String,
    /// 标准错误
    pub stderr: String,
    /// 退出码
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// 构造一个成功的输出
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// 构造一个失败的输出
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
        }
    }

    /// 检查命令是否成功执行
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// 获取合并的输出（stdout + stderr）
    pub fn combined_output(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        if stderr.is_empty() {
            stdout.to_string()
        } else if stdout.is_empty() {
            stderr.to_string()
        } else {
            format!("{}\n{}", stdout, stderr)
        }
    }
}

/// 拼接用于日志和错误信息的命令行
pub fn command_line(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output() {
        let output = CommandOutput::success("hello\n");
        assert!(output.is_success());
        assert_eq!(output.combined_output(), "hello");

        let failed = CommandOutput {
            stdout: "partial".to_string(),
            stderr: "boom".to_string(),
            exit_code: Some(1),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.combined_output(), "partial\nboom");
    }

    #[test]
    fn test_killed_by_signal_is_not_success() {
        let output = CommandOutput {
            exit_code: None,
            ..Default::default()
        };
        assert!(!output.is_success());
    }

    #[test]
    fn test_command_line() {
        assert_eq!(command_line("umount", &[]), "umount");
        assert_eq!(
            command_line("mountpoint", &["-q".to_string(), "/mnt/backup".to_string()]),
            "mountpoint -q /mnt/backup"
        );
    }
}
