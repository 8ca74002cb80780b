//! 控制台操作员实现
//!
//! 标准输入/输出上的 `Operator` 实现：顺序提示与状态行输出，
//! 无结构化机器可读输出。

use std::io::{self, BufRead, Write};

use colored::Colorize;

use dpr_workflow::Operator;

/// 控制台操作员
pub struct ConsoleOperator;

impl ConsoleOperator {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

impl Default for ConsoleOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for ConsoleOperator {
    fn prompt_line(&self, prompt: &str) -> io::Result<String> {
        print!("{}: ", prompt.cyan());
        io::stdout().flush()?;
        self.read_line()
    }

    fn prompt_secret(&self, prompt: &str) -> io::Result<String> {
        print!("{}: ", prompt.cyan());
        io::stdout().flush()?;
        self.read_line()
    }

    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        loop {
            print!("{} {}: ", prompt.cyan(), "(Y/N)".yellow());
            io::stdout().flush()?;
            let answer = self.read_line()?;
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" | "是" => return Ok(true),
                "n" | "no" | "否" => return Ok(false),
                _ => println!("{}", "请输入 Y 或 N".yellow()),
            }
        }
    }

    fn pause(&self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt.cyan());
        io::stdout().flush()?;
        self.read_line()?;
        Ok(())
    }

    fn notify(&self, line: &str) {
        println!("{}", line);
    }
}
