//! 候选选择器
//!
//! 流程中六处选择（池、模板、定制规范、文件夹改选、集群、数据
//! 存储改选）共用同一实现：恰好一个候选时自动选定并告知操作员；
//! 为空时按类别报 NotFound；多个时渲染 1..N 菜单，越界或无法
//! 解析的输入重新询问，不设默认项。

use tracing::info;

use crate::error::{Result, WorkflowError};
use crate::operator::Operator;

/// 从候选列表中解析操作员的选择
///
/// `category` 用于空列表时的错误文案（如"桌面池"），`label` 为
/// 每个候选生成菜单行文本。
pub fn resolve<'a, T, F>(
    operator: &dyn Operator,
    category: &str,
    prompt: &str,
    candidates: &'a [T],
    label: F,
) -> Result<&'a T>
where
    F: Fn(&T) -> String,
{
    match candidates.len() {
        0 => Err(WorkflowError::NotFound(category.to_string())),
        1 => {
            let only = &candidates[0];
            info!("类别「{}」仅一个候选，自动选定", category);
            operator.notify(&format!(
                "仅找到一个{}：{}，已自动选定",
                category,
                label(only)
            ));
            Ok(only)
        }
        n => {
            operator.notify(prompt);
            for (index, candidate) in candidates.iter().enumerate() {
                operator.notify(&format!("  {}. {}", index + 1, label(candidate)));
            }
            loop {
                let input = operator.prompt_line(&format!("请输入序号 (1-{})", n))?;
                match input.trim().parse::<usize>() {
                    Ok(choice) if choice >= 1 && choice <= n => {
                        return Ok(&candidates[choice - 1]);
                    }
                    _ => operator.notify("输入无效，请重新选择"),
                }
            }
        }
    }
}
