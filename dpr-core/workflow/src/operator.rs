//! 操作员交互接口
//!
//! 刷新流程的所有人机交互都经过本接口：自由文本输入、凭据输入、
//! 是/否确认、回车节奏门和状态输出。控制台实现位于 CLI，测试
//! 使用脚本化假实现。

use std::io;

/// 操作员交互接口
pub trait Operator: Send + Sync {
    /// 读取一行自由文本输入
    fn prompt_line(&self, prompt: &str) -> io::Result<String>;

    /// 读取敏感输入（密码等）
    fn prompt_secret(&self, prompt: &str) -> io::Result<String>;

    /// 是/否确认
    fn confirm(&self, prompt: &str) -> io::Result<bool>;

    /// 回车节奏门（等待操作员示意继续）
    fn pause(&self, prompt: &str) -> io::Result<()>;

    /// 输出一行状态/警告信息
    fn notify(&self, line: &str);
}
