//! 刷新流程场景测试
//!
//! 用假平面与脚本化操作员驱动完整编排器，覆盖：端到端成功、
//! 零池致命中止、单台克隆失败继续、操作员受控中止、连接重试
//! 语义以及显式的非幂等行为。

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use dpr_workflow::{
    BrokerMachine, BrokerPlane, Candidate, ComputePlane, ConnectError, Connector, Credential,
    DeployRequest, Operator, Phase, Placement, PollConfig, PowerState, RefreshOptions,
    RefreshOutcome, RefreshWorkflow, Result as WorkflowResult, SessionHandle, SessionManager,
    WorkflowError,
};

// ---------------------------------------------------------------------------
// 脚本化操作员
// ---------------------------------------------------------------------------

struct ScriptedOperator {
    lines: Mutex<VecDeque<String>>,
    confirms: Mutex<VecDeque<bool>>,
    notices: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    fn new(lines: &[&str], confirms: &[bool]) -> Self {
        Self {
            lines: Mutex::new(lines.iter().map(|s| s.to_string()).collect()),
            confirms: Mutex::new(confirms.iter().copied().collect()),
            notices: Mutex::new(Vec::new()),
        }
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
        self.confirms
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "脚本确认耗尽"))
    }

    fn pause(&self, _prompt: &str) -> io::Result<()> {
        Ok(())
    }

    fn notify(&self, line: &str) {
        self.notices.lock().unwrap().push(line.to_string());
    }
}

// ---------------------------------------------------------------------------
// 假计算平面
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ComputeState {
    templates: Vec<Candidate>,
    clusters: Vec<Candidate>,
    datastores: Vec<Candidate>,
    folders: Vec<Candidate>,
    specs: Vec<Candidate>,
    deployed: Vec<String>,
    power: std::collections::HashMap<String, PowerState>,
    disk_modes_set: Vec<String>,
    deploy_calls: usize,
    fail_deploy_at: Option<usize>,
}

struct FakeCompute {
    state: Mutex<ComputeState>,
    alive: AtomicBool,
}

impl FakeCompute {
    fn with_inventory() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ComputeState {
                templates: vec![candidate("tpl-1", "Win10 模板")],
                clusters: vec![candidate("cl-1", "生产集群")],
                datastores: vec![candidate("ds-1", "共享存储")],
                folders: vec![candidate("fold-1", "桌面文件夹")],
                specs: vec![candidate("spec-1", "域加入规范")],
                ..Default::default()
            }),
            alive: AtomicBool::new(true),
        })
    }
}

struct FakeComputeSession {
    inner: Arc<FakeCompute>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl SessionHandle for FakeComputeSession {
    async fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::SeqCst)
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ComputePlane for FakeComputeSession {
    async fn list_templates(&self) -> WorkflowResult<Vec<Candidate>> {
        Ok(self.inner.state.lock().unwrap().templates.clone())
    }

    async fn list_clusters(&self) -> WorkflowResult<Vec<Candidate>> {
        Ok(self.inner.state.lock().unwrap().clusters.clone())
    }

    async fn list_datastores(&self) -> WorkflowResult<Vec<Candidate>> {
        Ok(self.inner.state.lock().unwrap().datastores.clone())
    }

    async fn list_folders(&self) -> WorkflowResult<Vec<Candidate>> {
        Ok(self.inner.state.lock().unwrap().folders.clone())
    }

    async fn list_guest_specs(&self) -> WorkflowResult<Vec<Candidate>> {
        Ok(self.inner.state.lock().unwrap().specs.clone())
    }

    async fn vm_placement(&self, _name: &str) -> WorkflowResult<Placement> {
        let state = self.inner.state.lock().unwrap();
        let folder = state
            .folders
            .first()
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound("文件夹".to_string()))?;
        let datastore = state
            .datastores
            .first()
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound("数据存储".to_string()))?;
        Ok(Placement { folder, datastore })
    }

    async fn deploy_from_template(&self, req: &DeployRequest) -> WorkflowResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        let index = state.deploy_calls;
        state.deploy_calls += 1;
        if state.fail_deploy_at == Some(index) {
            return Err(WorkflowError::Operation("部署失败（模拟）".to_string()));
        }
        state.deployed.push(req.name.clone());
        state.power.insert(req.name.clone(), PowerState::PoweredOff);
        Ok(())
    }

    async fn power_on(&self, name: &str) -> WorkflowResult<()> {
        self.inner
            .state
            .lock()
            .unwrap()
            .power
            .insert(name.to_string(), PowerState::PoweredOn);
        Ok(())
    }

    async fn shutdown_guest(&self, name: &str) -> WorkflowResult<()> {
        self.inner
            .state
            .lock()
            .unwrap()
            .power
            .insert(name.to_string(), PowerState::PoweredOff);
        Ok(())
    }

    async fn power_state(&self, name: &str) -> WorkflowResult<PowerState> {
        Ok(self
            .inner
            .state
            .lock()
            .unwrap()
            .power
            .get(name)
            .copied()
            .unwrap_or(PowerState::Unknown))
    }

    async fn guest_hostname(&self, name: &str) -> WorkflowResult<Option<String>> {
        let state = self.inner.state.lock().unwrap();
        if state.deployed.iter().any(|n| n == name) {
            Ok(Some(name.to_string()))
        } else {
            Ok(None)
        }
    }

    async fn list_vm_names_in_folder(&self, _folder_id: &str) -> WorkflowResult<Vec<String>> {
        Ok(self.inner.state.lock().unwrap().deployed.clone())
    }

    async fn set_disks_nonpersistent(&self, name: &str) -> WorkflowResult<()> {
        self.inner
            .state
            .lock()
            .unwrap()
            .disk_modes_set
            .push(name.to_string());
        Ok(())
    }
}

struct FakeComputeConnector {
    inner: Arc<FakeCompute>,
    closed: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<ConnectError>>>,
    attempts: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<(String, Credential)>>>,
}

struct ConnectorProbes {
    closed: Arc<AtomicUsize>,
    attempts: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<(String, Credential)>>>,
    script: Arc<Mutex<VecDeque<ConnectError>>>,
}

fn compute_connector(inner: &Arc<FakeCompute>) -> (FakeComputeConnector, ConnectorProbes) {
    let closed = Arc::new(AtomicUsize::new(0));
    let script = Arc::new(Mutex::new(VecDeque::new()));
    let attempts = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(Mutex::new(Vec::new()));
    let connector = FakeComputeConnector {
        inner: Arc::clone(inner),
        closed: Arc::clone(&closed),
        script: Arc::clone(&script),
        attempts: Arc::clone(&attempts),
        calls: Arc::clone(&calls),
    };
    (
        connector,
        ConnectorProbes {
            closed,
            attempts,
            calls,
            script,
        },
    )
}

#[async_trait]
impl Connector for FakeComputeConnector {
    type Session = FakeComputeSession;

    async fn connect(
        &self,
        endpoint: &str,
        credential: &Credential,
    ) -> std::result::Result<FakeComputeSession, ConnectError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), credential.clone()));
        if let Some(err) = self.script.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(FakeComputeSession {
            inner: Arc::clone(&self.inner),
            closed: Arc::clone(&self.closed),
        })
    }
}

// ---------------------------------------------------------------------------
// 假代理平面
// ---------------------------------------------------------------------------

#[derive(Default)]
struct BrokerState {
    pools: Vec<Candidate>,
    machines: Vec<BrokerMachine>,
    disabled: Vec<String>,
    enabled: Vec<String>,
    deleted: Vec<(Vec<String>, bool)>,
    added: Vec<(String, Vec<String>)>,
}

struct FakeBroker {
    state: Mutex<BrokerState>,
}

impl FakeBroker {
    fn with_pool(machine_names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(BrokerState {
                pools: vec![candidate("pool-1", "财务部桌面池")],
                machines: machine_names
                    .iter()
                    .map(|n| BrokerMachine {
                        name: n.to_string(),
                        basic_state: "AVAILABLE".to_string(),
                    })
                    .collect(),
                ..Default::default()
            }),
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(BrokerState::default()),
        })
    }
}

struct FakeBrokerSession {
    inner: Arc<FakeBroker>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl SessionHandle for FakeBrokerSession {
    async fn is_alive(&self) -> bool {
        true
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BrokerPlane for FakeBrokerSession {
    async fn list_pools(&self) -> WorkflowResult<Vec<Candidate>> {
        Ok(self.inner.state.lock().unwrap().pools.clone())
    }

    async fn disable_pool(&self, pool_id: &str) -> WorkflowResult<()> {
        self.inner
            .state
            .lock()
            .unwrap()
            .disabled
            .push(pool_id.to_string());
        Ok(())
    }

    async fn enable_pool(&self, pool_id: &str) -> WorkflowResult<()> {
        self.inner
            .state
            .lock()
            .unwrap()
            .enabled
            .push(pool_id.to_string());
        Ok(())
    }

    async fn list_pool_machines(&self, _pool_id: &str) -> WorkflowResult<Vec<BrokerMachine>> {
        Ok(self.inner.state.lock().unwrap().machines.clone())
    }

    async fn delete_machines(&self, names: &[String], from_disk: bool) -> WorkflowResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        state.deleted.push((names.to_vec(), from_disk));
        state.machines.clear();
        Ok(())
    }

    async fn add_machines_to_pool(&self, pool_id: &str, names: &[String]) -> WorkflowResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        state.added.push((pool_id.to_string(), names.to_vec()));
        state.machines = names
            .iter()
            .map(|n| BrokerMachine {
                name: n.clone(),
                basic_state: "AVAILABLE".to_string(),
            })
            .collect();
        Ok(())
    }
}

struct FakeBrokerConnector {
    inner: Arc<FakeBroker>,
    closed: Arc<AtomicUsize>,
}

fn broker_connector(inner: &Arc<FakeBroker>) -> (FakeBrokerConnector, Arc<AtomicUsize>) {
    let closed = Arc::new(AtomicUsize::new(0));
    (
        FakeBrokerConnector {
            inner: Arc::clone(inner),
            closed: Arc::clone(&closed),
        },
        closed,
    )
}

#[async_trait]
impl Connector for FakeBrokerConnector {
    type Session = FakeBrokerSession;

    async fn connect(
        &self,
        _endpoint: &str,
        _credential: &Credential,
    ) -> std::result::Result<FakeBrokerSession, ConnectError> {
        Ok(FakeBrokerSession {
            inner: Arc::clone(&self.inner),
            closed: Arc::clone(&self.closed),
        })
    }
}

// ---------------------------------------------------------------------------
// 公共辅助
// ---------------------------------------------------------------------------

fn candidate(id: &str, name: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn test_options(tag: &str) -> RefreshOptions {
    RefreshOptions {
        compute_endpoint: "http://compute".to_string(),
        broker_endpoint: "http://broker".to_string(),
        machine_prefix: "DPR-".to_string(),
        poll: PollConfig {
            interval: Duration::from_millis(1),
            max_attempts: Some(100),
        },
        report_path: std::env::temp_dir().join(format!(
            "dpr-test-{}-{}.csv",
            tag,
            std::process::id()
        )),
    }
}

fn assert_machine_name(name: &str) {
    assert!(name.starts_with("DPR-"), "前缀不符: {}", name);
    let suffix = &name["DPR-".len()..];
    assert_eq!(suffix.len(), 7, "后缀长度不符: {}", name);
    for c in suffix.chars() {
        assert!(c.is_ascii_digit() || c.is_ascii_uppercase(), "非法字符: {}", name);
    }
}

// 连接成功场景下的输入脚本：两组凭据 + 数量
fn happy_lines(count: &str) -> Vec<&str> {
    vec!["admin", "compute-pw", "broker-admin", "broker-pw", count]
}

// ---------------------------------------------------------------------------
// 场景测试
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_full_refresh_happy_path() {
    let compute = FakeCompute::with_inventory();
    let broker = FakeBroker::with_pool(&["OLD-1", "OLD-2", "OLD-3"]);

    let (cc, compute_probes) = compute_connector(&compute);
    let (bc, broker_closed) = broker_connector(&broker);

    // 池/文件夹/数据存储三处确认均为"是"
    let operator = ScriptedOperator::new(&happy_lines("2"), &[true, true, true]);

    let workflow = RefreshWorkflow::new(
        SessionManager::new(cc, "计算平台"),
        SessionManager::new(bc, "桌面代理"),
        operator,
        test_options("happy"),
    );
    let summary = workflow.run().await;

    assert!(summary.is_success(), "应当无错误完成: {:?}", summary);

    let broker_state = broker.state.lock().unwrap();
    assert_eq!(broker_state.disabled, vec!["pool-1"]);
    assert_eq!(broker_state.enabled, vec!["pool-1"]);

    // 3 台旧桌面一次性从磁盘删除
    assert_eq!(broker_state.deleted.len(), 1);
    assert_eq!(broker_state.deleted[0].0.len(), 3);
    assert!(broker_state.deleted[0].1);

    // 新批次 2 台全部加回池且全部可用
    assert_eq!(broker_state.added.len(), 1);
    assert_eq!(broker_state.added[0].1.len(), 2);
    assert_eq!(broker_state.machines.len(), 2);
    assert!(broker_state.machines.iter().all(|m| m.is_available()));

    let compute_state = compute.state.lock().unwrap();
    assert_eq!(compute_state.deployed.len(), 2);
    for name in &compute_state.deployed {
        assert_machine_name(name);
        assert_eq!(compute_state.power.get(name), Some(&PowerState::PoweredOn));
    }
    assert_eq!(compute_state.disk_modes_set.len(), 2);

    // 两个会话各关闭一次
    assert_eq!(compute_probes.closed.load(Ordering::SeqCst), 1);
    assert_eq!(broker_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_zero_pools_is_fatal_and_sessions_closed() {
    let compute = FakeCompute::with_inventory();
    let broker = FakeBroker::empty();

    let (cc, compute_probes) = compute_connector(&compute);
    let (bc, broker_closed) = broker_connector(&broker);

    let operator = ScriptedOperator::new(
        &["admin", "compute-pw", "broker-admin", "broker-pw"],
        &[],
    );

    let workflow = RefreshWorkflow::new(
        SessionManager::new(cc, "计算平台"),
        SessionManager::new(bc, "桌面代理"),
        operator,
        test_options("zero-pools"),
    );
    let summary = workflow.run().await;

    match summary.outcome {
        RefreshOutcome::Failed(WorkflowError::NotFound(category)) => {
            assert_eq!(category, "桌面池");
        }
        other => panic!("应当以 NotFound 失败: {:?}", other),
    }

    // 致命错误已记录到累积器，且不再有后续远端调用
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].phase, Phase::SelectPool);
    assert!(broker.state.lock().unwrap().disabled.is_empty());
    assert!(compute.state.lock().unwrap().deployed.is_empty());

    // 已建立的会话仍然各关闭一次
    assert_eq!(compute_probes.closed.load(Ordering::SeqCst), 1);
    assert_eq!(broker_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_decline_single_pool_is_controlled_abort() {
    let compute = FakeCompute::with_inventory();
    let broker = FakeBroker::with_pool(&["OLD-1"]);

    let (cc, compute_probes) = compute_connector(&compute);
    let (bc, broker_closed) = broker_connector(&broker);

    let operator = ScriptedOperator::new(
        &["admin", "compute-pw", "broker-admin", "broker-pw"],
        &[false],
    );

    let workflow = RefreshWorkflow::new(
        SessionManager::new(cc, "计算平台"),
        SessionManager::new(bc, "桌面代理"),
        operator,
        test_options("abort"),
    );
    let summary = workflow.run().await;

    assert!(matches!(summary.outcome, RefreshOutcome::Aborted));
    assert!(summary.errors.is_empty());

    // 中止前未做任何修改
    let broker_state = broker.state.lock().unwrap();
    assert!(broker_state.disabled.is_empty());
    assert!(broker_state.deleted.is_empty());

    assert_eq!(compute_probes.closed.load(Ordering::SeqCst), 1);
    assert_eq!(broker_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_single_clone_failure_continues_with_rest() {
    let compute = FakeCompute::with_inventory();
    compute.state.lock().unwrap().fail_deploy_at = Some(1);
    let broker = FakeBroker::with_pool(&["OLD-1", "OLD-2"]);

    let (cc, _compute_probes) = compute_connector(&compute);
    let (bc, _broker_closed) = broker_connector(&broker);

    let operator = ScriptedOperator::new(&happy_lines("5"), &[true, true, true]);

    let workflow = RefreshWorkflow::new(
        SessionManager::new(cc, "计算平台"),
        SessionManager::new(bc, "桌面代理"),
        operator,
        test_options("partial"),
    );
    let summary = workflow.run().await;

    // 整体仍然完成，仅记录一条克隆错误
    assert!(matches!(summary.outcome, RefreshOutcome::Completed));
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].phase, Phase::CloneDesktops);

    // 其余 4 台照常走完全部后续阶段
    let compute_state = compute.state.lock().unwrap();
    assert_eq!(compute_state.deployed.len(), 4);
    assert_eq!(compute_state.disk_modes_set.len(), 4);

    let broker_state = broker.state.lock().unwrap();
    assert_eq!(broker_state.added[0].1.len(), 4);

    // 失败运行留下了报告工件
    let report_path = std::env::temp_dir().join(format!(
        "dpr-test-partial-{}.csv",
        std::process::id()
    ));
    assert!(report_path.exists());
    let _ = std::fs::remove_file(&report_path);
    let _ = std::fs::remove_file(report_path.with_extension("json"));
}

#[tokio::test]
async fn test_refresh_twice_creates_two_batches() {
    // 显式验证非幂等：对同一池跑两轮产生两批桌面
    let compute = FakeCompute::with_inventory();
    let broker = FakeBroker::with_pool(&["OLD-1", "OLD-2", "OLD-3"]);

    for tag in ["twice-a", "twice-b"] {
        let (cc, _) = compute_connector(&compute);
        let (bc, _) = broker_connector(&broker);
        let operator = ScriptedOperator::new(&happy_lines("2"), &[true, true, true]);
        let workflow = RefreshWorkflow::new(
            SessionManager::new(cc, "计算平台"),
            SessionManager::new(bc, "桌面代理"),
            operator,
            test_options(tag),
        );
        let summary = workflow.run().await;
        assert!(summary.is_success(), "第 {} 轮应当成功", tag);
    }

    // 第二轮删除的是第一轮创建的 2 台，总部署量为 4
    let compute_state = compute.state.lock().unwrap();
    assert_eq!(compute_state.deployed.len(), 4);

    let broker_state = broker.state.lock().unwrap();
    assert_eq!(broker_state.deleted.len(), 2);
    assert_eq!(broker_state.deleted[0].0.len(), 3);
    assert_eq!(broker_state.deleted[1].0.len(), 2);
}

// ---------------------------------------------------------------------------
// 会话管理器测试
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_connect_retries_on_connectivity_keep_credential() {
    let compute = FakeCompute::with_inventory();
    let (connector, probes) = compute_connector(&compute);
    {
        let mut script = probes.script.lock().unwrap();
        script.push_back(ConnectError::Connectivity("连接被拒绝".to_string()));
        script.push_back(ConnectError::Connectivity("连接被拒绝".to_string()));
        script.push_back(ConnectError::Connectivity("连接被拒绝".to_string()));
    }

    let manager = SessionManager::new(connector, "计算平台");
    let operator = ScriptedOperator::new(&["http://b", "http://c", "http://d"], &[]);
    let credential = Credential {
        username: "admin".to_string(),
        password: "pw".to_string(),
    };

    let session = manager
        .establish(&operator, "http://a".to_string(), credential.clone())
        .await
        .unwrap();

    // N 次连接失败 + 1 次成功 = N+1 次尝试
    assert_eq!(probes.attempts.load(Ordering::SeqCst), 4);
    assert_eq!(session.endpoint, "http://d");

    // 每次只换地址，凭据保持不变
    let calls = probes.calls.lock().unwrap();
    let endpoints: Vec<&str> = calls.iter().map(|(e, _)| e.as_str()).collect();
    assert_eq!(endpoints, ["http://a", "http://b", "http://c", "http://d"]);
    assert!(calls.iter().all(|(_, c)| *c == credential));
}

#[tokio::test]
async fn test_connect_retries_on_auth_keep_endpoint() {
    let compute = FakeCompute::with_inventory();
    let (connector, probes) = compute_connector(&compute);
    probes
        .script
        .lock()
        .unwrap()
        .push_back(ConnectError::Auth("密码错误".to_string()));

    let manager = SessionManager::new(connector, "计算平台");
    let operator = ScriptedOperator::new(&["admin2", "pw2"], &[]);

    let session = manager
        .establish(
            &operator,
            "http://a".to_string(),
            Credential {
                username: "admin".to_string(),
                password: "pw".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(probes.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(session.endpoint, "http://a");

    let calls = probes.calls.lock().unwrap();
    assert_eq!(calls[1].0, "http://a");
    assert_eq!(calls[1].1.username, "admin2");
    assert_eq!(calls[1].1.password, "pw2");
}

#[tokio::test]
async fn test_ensure_live_reconnects_with_saved_endpoint() {
    let compute = FakeCompute::with_inventory();
    let (connector, probes) = compute_connector(&compute);
    let manager = SessionManager::new(connector, "计算平台");
    let operator = ScriptedOperator::new(&[], &[]);

    let credential = Credential {
        username: "admin".to_string(),
        password: "pw".to_string(),
    };
    let mut session = manager
        .establish(&operator, "http://a".to_string(), credential.clone())
        .await
        .unwrap();
    assert_eq!(probes.attempts.load(Ordering::SeqCst), 1);

    // 模拟远端回收会话
    compute.alive.store(false, Ordering::SeqCst);
    manager.ensure_live(&mut session).await.unwrap();

    assert_eq!(probes.attempts.load(Ordering::SeqCst), 2);
    let calls = probes.calls.lock().unwrap();
    assert_eq!(calls[1].0, "http://a");
    assert_eq!(calls[1].1, credential);
}

#[tokio::test]
async fn test_single_candidate_auto_selected_without_prompt() {
    // 唯一候选不消耗任何脚本输入，否则 prompt_line 会因脚本耗尽报错
    let compute = FakeCompute::with_inventory();
    let broker = FakeBroker::with_pool(&["OLD-1"]);

    let (cc, _) = compute_connector(&compute);
    let (bc, _) = broker_connector(&broker);

    let operator = ScriptedOperator::new(&happy_lines("1"), &[true, true, true]);
    let workflow = RefreshWorkflow::new(
        SessionManager::new(cc, "计算平台"),
        SessionManager::new(bc, "桌面代理"),
        operator,
        test_options("auto-select"),
    );
    let summary = workflow.run().await;

    assert!(summary.is_success(), "{:?}", summary);
}
