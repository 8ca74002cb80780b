//! 选择器与轮询原语测试

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use dpr_workflow::choice;
use dpr_workflow::{poll_until, Candidate, Operator, PollConfig, WorkflowError};

struct ScriptedOperator {
    lines: Mutex<VecDeque<String>>,
    notices: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: Mutex::new(lines.iter().map(|s| s.to_string()).collect()),
            notices: Mutex::new(Vec::new()),
        }
    }

    fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Operator for ScriptedOperator {
    fn prompt_line(&self, _prompt: &str) -> io::Result<String> {
        self.lines
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "脚本输入耗尽"))
    }

    fn prompt_secret(&self, prompt: &str) -> io::Result<String> {
        self.prompt_line(prompt)
    }

    fn confirm(&self, _prompt: &str) -> io::Result<bool> {
        Ok(true)
    }

    fn pause(&self, _prompt: &str) -> io::Result<()> {
        Ok(())
    }

    fn notify(&self, line: &str) {
        self.notices.lock().unwrap().push(line.to_string());
    }
}

fn candidates(names: &[&str]) -> Vec<Candidate> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Candidate {
            id: format!("id-{}", i + 1),
            name: name.to_string(),
        })
        .collect()
}

#[test]
fn test_resolve_empty_list_is_not_found() {
    let operator = ScriptedOperator::new(&[]);
    let list: Vec<Candidate> = Vec::new();

    let result = choice::resolve(&operator, "模板", "请选择：", &list, |c| c.name.clone());
    match result {
        Err(WorkflowError::NotFound(category)) => assert_eq!(category, "模板"),
        other => panic!("应当报 NotFound: {:?}", other),
    }
}

#[test]
fn test_resolve_single_candidate_auto_selected() {
    // 无任何脚本输入：唯一候选不得触发提问
    let operator = ScriptedOperator::new(&[]);
    let list = candidates(&["Win10 模板"]);

    let selected = choice::resolve(&operator, "模板", "请选择：", &list, |c| c.name.clone())
        .unwrap();
    assert_eq!(selected.id, "id-1");
    assert!(operator
        .notices()
        .iter()
        .any(|n| n.contains("已自动选定")));
}

#[test]
fn test_resolve_menu_reprompts_on_invalid_input() {
    let operator = ScriptedOperator::new(&["abc", "99", "2"]);
    let list = candidates(&["池甲", "池乙", "池丙"]);

    let selected = choice::resolve(&operator, "桌面池", "请选择：", &list, |c| c.name.clone())
        .unwrap();
    assert_eq!(selected.name, "池乙");

    // 两次无效输入各提示一次
    let invalid = operator
        .notices()
        .iter()
        .filter(|n| n.contains("输入无效"))
        .count();
    assert_eq!(invalid, 2);
}

#[tokio::test]
async fn test_poll_until_returns_first_satisfying_value() {
    let config = PollConfig {
        interval: Duration::from_millis(1),
        max_attempts: None,
    };
    let counter = AtomicU32::new(0);

    let value = poll_until(
        &config,
        || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<u32, WorkflowError>(n) }
        },
        |v| *v >= 3,
    )
    .await
    .unwrap();

    assert_eq!(value, 3);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_poll_until_times_out_after_max_attempts() {
    let config = PollConfig {
        interval: Duration::from_millis(1),
        max_attempts: Some(3),
    };
    let counter = AtomicU32::new(0);

    let result = poll_until(
        &config,
        || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<u32, WorkflowError>(0) }
        },
        |_| false,
    )
    .await;

    match result {
        Err(WorkflowError::PollTimeout(max)) => assert_eq!(max, 3),
        other => panic!("应当超时: {:?}", other),
    }
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_poll_until_propagates_fetch_error() {
    let config = PollConfig {
        interval: Duration::from_millis(1),
        max_attempts: None,
    };

    let result = poll_until(
        &config,
        || async { Err::<u32, WorkflowError>(WorkflowError::Operation("查询失败".to_string())) },
        |_| true,
    )
    .await;

    assert!(matches!(result, Err(WorkflowError::Operation(_))));
}
