//! 桌面池刷新编排器
//!
//! 按固定顺序执行 15 个阶段：连接两个平面、选池并禁用、捕获
//! 放置位置并删除现有桌面、收集克隆参数、逐台克隆开机、等待
//! 定制与签入、整批关机改磁盘模式、重新开机、重新启用池，最后
//! 无论以何种方式退出都执行清理。阶段 4-5 为破坏性操作，整个
//! 流程不可重入也不提供断点续跑：失败后需人工对账再重跑。

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::choice;
use crate::error::{Result, WorkflowError};
use crate::naming;
use crate::operator::Operator;
use crate::plane::{BrokerMachine, BrokerPlane, ComputePlane, DeployRequest, PowerState};
use crate::poll::{self, PollConfig};
use crate::report::ErrorReport;
use crate::session::{prompt_credential, Connector, RemoteSession, SessionHandle, SessionManager};
use crate::sink::{ErrorRecord, ErrorSink, Phase};
use crate::state::WorkflowState;

/// 刷新流程配置
#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// 计算平台初始地址（为空则向操作员询问）
    pub compute_endpoint: String,

    /// 桌面代理初始地址（为空则向操作员询问）
    pub broker_endpoint: String,

    /// 新桌面名称前缀
    pub machine_prefix: String,

    /// 收敛等待的轮询配置
    pub poll: PollConfig,

    /// 错误报告输出路径
    pub report_path: PathBuf,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            compute_endpoint: String::new(),
            broker_endpoint: String::new(),
            machine_prefix: "DPR-".to_string(),
            poll: PollConfig::default(),
            report_path: PathBuf::from("dpr-errors.csv"),
        }
    }
}

/// 流程结束方式
#[derive(Debug)]
pub enum RefreshOutcome {
    /// 全部阶段执行完毕（期间可能累积了非致命错误）
    Completed,

    /// 操作员在选择点主动中止，未做修改
    Aborted,

    /// 某个阶段发生致命错误
    Failed(WorkflowError),
}

/// 一次刷新运行的汇总
#[derive(Debug)]
pub struct RefreshSummary {
    /// 结束方式
    pub outcome: RefreshOutcome,

    /// 运行期间累积的全部错误记录
    pub errors: Vec<ErrorRecord>,
}

impl RefreshSummary {
    /// 是否完整成功（执行完毕且无任何错误记录）
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RefreshOutcome::Completed) && self.errors.is_empty()
    }
}

/// 阶段推进结果
enum PhaseFlow {
    Continue,
    Abort,
}

/// 两个远端会话，由单一执行线程独占
struct Sessions<CS, BS> {
    compute: Option<RemoteSession<CS>>,
    broker: Option<RemoteSession<BS>>,
}

impl<CS, BS> Sessions<CS, BS> {
    fn new() -> Self {
        Self {
            compute: None,
            broker: None,
        }
    }

    fn compute_mut(&mut self) -> Result<&mut RemoteSession<CS>> {
        self.compute
            .as_mut()
            .ok_or_else(|| WorkflowError::Unknown("计算平台会话未建立".to_string()))
    }

    fn broker_mut(&mut self) -> Result<&mut RemoteSession<BS>> {
        self.broker
            .as_mut()
            .ok_or_else(|| WorkflowError::Unknown("桌面代理会话未建立".to_string()))
    }
}

/// 桌面池刷新编排器
pub struct RefreshWorkflow<CC, BC, O>
where
    CC: Connector,
    CC::Session: ComputePlane,
    BC: Connector,
    BC::Session: BrokerPlane,
    O: Operator,
{
    compute: SessionManager<CC>,
    broker: SessionManager<BC>,
    operator: O,
    options: RefreshOptions,
    state: WorkflowState,
    sink: ErrorSink,
}

impl<CC, BC, O> RefreshWorkflow<CC, BC, O>
where
    CC: Connector,
    CC::Session: ComputePlane,
    BC: Connector,
    BC::Session: BrokerPlane,
    O: Operator,
{
    /// 创建刷新编排器
    pub fn new(
        compute: SessionManager<CC>,
        broker: SessionManager<BC>,
        operator: O,
        options: RefreshOptions,
    ) -> Self {
        Self {
            compute,
            broker,
            operator,
            options,
            state: WorkflowState::default(),
            sink: ErrorSink::new(),
        }
    }

    /// 运行一次完整刷新
    ///
    /// 无论正常完成、操作员中止还是致命失败，清理阶段都会执行：
    /// 已建立的会话各关闭一次，累积的错误输出并写入报告。
    pub async fn run(mut self) -> RefreshSummary {
        let mut sessions = Sessions::new();
        let result = self.run_phases(&mut sessions).await;
        self.finalize(&mut sessions).await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => RefreshOutcome::Failed(e),
        };
        RefreshSummary {
            outcome,
            errors: self.sink.take_records(),
        }
    }

    async fn run_phases(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<RefreshOutcome> {
        // 1-2. 连接两个平面
        self.connect_compute(sessions)
            .await
            .map_err(|e| self.fatal(Phase::ConnectCompute, e))?;
        self.connect_broker(sessions)
            .await
            .map_err(|e| self.fatal(Phase::ConnectBroker, e))?;

        // 3. 选择桌面池（即使唯一也需操作员确认，拒绝为受控中止）
        match self
            .select_pool(sessions)
            .await
            .map_err(|e| self.fatal(Phase::SelectPool, e))?
        {
            PhaseFlow::Abort => return Ok(RefreshOutcome::Aborted),
            PhaseFlow::Continue => {}
        }

        // 4. 禁用池（失败致命：池可能仍在对外提供会话）
        self.disable_pool(sessions)
            .await
            .map_err(|e| self.fatal(Phase::DisablePool, e))?;

        // 5. 捕获放置位置并删除现有桌面（失败累积，人工核查后继续）
        if let Err(e) = self.capture_and_delete_existing(sessions).await {
            self.sink
                .record(Phase::CaptureAndDeleteExisting, e.to_string());
            self.operator
                .notify("删除现有桌面时出错，请人工核查并手动移除残留桌面");
        }
        self.operator
            .pause("请确认现有桌面已清理，按回车继续")
            .map_err(|e| self.fatal(Phase::CaptureAndDeleteExisting, WorkflowError::from(e)))?;

        // 6. 收集克隆参数
        self.gather_clone_parameters(sessions)
            .await
            .map_err(|e| self.fatal(Phase::GatherCloneParameters, e))?;

        // 7. 逐台克隆并开机（单台失败跳过，不回滚）
        self.clone_desktops(sessions)
            .await
            .map_err(|e| self.fatal(Phase::CloneDesktops, e))?;

        // 8. 等待客户机定制完成
        self.wait_for_customization(sessions)
            .await
            .map_err(|e| self.fatal(Phase::WaitForCustomization, e))?;

        // 9. 加入桌面池（失败时改人工添加，操作员确认后继续）
        if let Err(e) = self.add_to_pool(sessions).await {
            self.sink.record(Phase::AddToPool, e.to_string());
            self.operator
                .notify("自动加入桌面池失败，请在代理平台手动添加新桌面");
            self.operator
                .pause("手动添加完成后按回车继续")
                .map_err(|e| self.fatal(Phase::AddToPool, WorkflowError::from(e)))?;
        }

        // 10. 等待全部桌面签入
        self.wait_for_check_in(sessions)
            .await
            .map_err(|e| self.fatal(Phase::WaitForCheckIn, e))?;

        // 11. 整批关机，等待电源收敛
        self.shutdown_for_reconfig(sessions)
            .await
            .map_err(|e| self.fatal(Phase::ShutdownForReconfig, e))?;

        // 12. 磁盘改为独立非持久
        self.set_disk_persistence(sessions)
            .await
            .map_err(|e| self.fatal(Phase::SetDiskPersistence, e))?;

        // 13. 重新开机
        self.power_on_batch(sessions)
            .await
            .map_err(|e| self.fatal(Phase::PowerOn, e))?;

        // 14. 重新启用池（失败累积，人工启用）
        if let Err(e) = self.enable_pool(sessions).await {
            self.sink.record(Phase::EnablePool, e.to_string());
            self.operator.notify("桌面池启用失败，请手动启用");
        }

        Ok(RefreshOutcome::Completed)
    }

    /// 记录致命错误并原样返回，供 `?` 上抛触发清理
    fn fatal(&mut self, phase: Phase, err: WorkflowError) -> WorkflowError {
        error!("阶段 {} 发生致命错误: {}", phase, err);
        self.sink.record(phase, err.to_string());
        err
    }

    fn selected_pool(&self) -> Result<&crate::plane::Candidate> {
        self.state
            .pool
            .as_ref()
            .ok_or_else(|| WorkflowError::Unknown("尚未选择桌面池".to_string()))
    }

    async fn connect_compute(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let endpoint = if self.options.compute_endpoint.trim().is_empty() {
            self.operator.prompt_line("请输入计算平台地址")?
        } else {
            self.options.compute_endpoint.clone()
        };
        let credential = prompt_credential(&self.operator, "计算平台")?;
        let session = self
            .compute
            .establish(&self.operator, endpoint, credential)
            .await?;
        sessions.compute = Some(session);
        Ok(())
    }

    async fn connect_broker(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let endpoint = if self.options.broker_endpoint.trim().is_empty() {
            self.operator.prompt_line("请输入桌面代理地址")?
        } else {
            self.options.broker_endpoint.clone()
        };
        let credential = prompt_credential(&self.operator, "桌面代理")?;
        let session = self
            .broker
            .establish(&self.operator, endpoint, credential)
            .await?;
        sessions.broker = Some(session);
        Ok(())
    }

    async fn select_pool(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<PhaseFlow> {
        let pools = {
            let broker = sessions.broker_mut()?;
            self.broker.ensure_live(broker).await?;
            broker.handle.list_pools().await?
        };

        let pool = choice::resolve(
            &self.operator,
            "桌面池",
            "找到多个桌面池，请选择要刷新的池：",
            &pools,
            |p| p.name.clone(),
        )?
        .clone();

        if !self
            .operator
            .confirm(&format!("即将刷新桌面池「{}」，是否继续?", pool.name))?
        {
            info!("操作员取消刷新");
            self.operator.notify("已取消，未做任何修改");
            return Ok(PhaseFlow::Abort);
        }

        self.state.pool = Some(pool);
        Ok(PhaseFlow::Continue)
    }

    async fn disable_pool(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let pool = self.selected_pool()?.clone();
        let broker = sessions.broker_mut()?;
        self.broker.ensure_live(broker).await?;
        broker.handle.disable_pool(&pool.id).await?;
        self.operator
            .notify(&format!("桌面池「{}」已禁用", pool.name));
        Ok(())
    }

    async fn capture_and_delete_existing(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let pool = self.selected_pool()?.clone();

        let machines = {
            let broker = sessions.broker_mut()?;
            self.broker.ensure_live(broker).await?;
            broker.handle.list_pool_machines(&pool.id).await?
        };

        if machines.is_empty() {
            self.operator.notify("池中当前没有桌面，跳过删除");
            return Ok(());
        }

        // 放置信息必须在删除之前读取，删除后对象即不存在
        {
            let compute = sessions.compute_mut()?;
            self.compute.ensure_live(compute).await?;
            let placement = compute.handle.vm_placement(&machines[0].name).await?;
            self.operator.notify(&format!(
                "已记录原放置位置：文件夹「{}」，数据存储「{}」",
                placement.folder.name, placement.datastore.name
            ));
            self.state.captured_placement = Some(placement);
        }

        let names: Vec<String> = machines.iter().map(|m| m.name.clone()).collect();
        self.operator
            .notify(&format!("删除现有桌面 {} 台（同时从磁盘删除）", names.len()));

        let broker = sessions.broker_mut()?;
        self.broker.ensure_live(broker).await?;
        broker.handle.delete_machines(&names, true).await?;
        Ok(())
    }

    async fn gather_clone_parameters(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let count = loop {
            let input = self
                .operator
                .prompt_line("请输入要创建的桌面数量（建议 1-20）")?;
            match input.trim().parse::<u32>() {
                Ok(n) if n >= 1 => break n,
                _ => self.operator.notify("输入无效，请输入一个正整数"),
            }
        };
        self.state.requested_count = count;

        let compute = sessions.compute_mut()?;
        self.compute.ensure_live(compute).await?;

        let templates = compute.handle.list_templates().await?;
        let template = choice::resolve(
            &self.operator,
            "模板",
            "请选择源模板：",
            &templates,
            |t| t.name.clone(),
        )?
        .clone();

        let specs = compute.handle.list_guest_specs().await?;
        let guest_spec = choice::resolve(
            &self.operator,
            "定制规范",
            "请选择客户机定制规范：",
            &specs,
            |s| s.name.clone(),
        )?
        .clone();

        // 目标文件夹：默认沿用捕获的原文件夹，操作员可改选
        let mut folder = None;
        if let Some(placement) = self.state.captured_placement.as_ref() {
            if self
                .operator
                .confirm(&format!("新桌面沿用原文件夹「{}」?", placement.folder.name))?
            {
                folder = Some(placement.folder.clone());
            }
        }
        let folder = match folder {
            Some(f) => f,
            None => {
                let folders = compute.handle.list_folders().await?;
                choice::resolve(
                    &self.operator,
                    "文件夹",
                    "请选择目标文件夹：",
                    &folders,
                    |f| f.name.clone(),
                )?
                .clone()
            }
        };

        let clusters = compute.handle.list_clusters().await?;
        let cluster = choice::resolve(
            &self.operator,
            "集群",
            "请选择目标集群：",
            &clusters,
            |c| c.name.clone(),
        )?
        .clone();

        // 目标数据存储：默认沿用捕获值，可改选；与集群的兼容性
        // 不做交叉校验，两项选择相互独立
        let mut datastore = None;
        if let Some(placement) = self.state.captured_placement.as_ref() {
            if self.operator.confirm(&format!(
                "新桌面沿用原数据存储「{}」?",
                placement.datastore.name
            ))? {
                datastore = Some(placement.datastore.clone());
            }
        }
        let datastore = match datastore {
            Some(d) => d,
            None => {
                let datastores = compute.handle.list_datastores().await?;
                choice::resolve(
                    &self.operator,
                    "数据存储",
                    "请选择目标数据存储：",
                    &datastores,
                    |d| d.name.clone(),
                )?
                .clone()
            }
        };

        self.state.template = Some(template);
        self.state.guest_spec = Some(guest_spec);
        self.state.folder = Some(folder);
        self.state.cluster = Some(cluster);
        self.state.datastore = Some(datastore);
        Ok(())
    }

    async fn clone_desktops(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let missing = |what: &str| WorkflowError::Unknown(format!("克隆参数缺失: {}", what));
        let template = self.state.template.clone().ok_or_else(|| missing("模板"))?;
        let guest_spec = self
            .state
            .guest_spec
            .clone()
            .ok_or_else(|| missing("定制规范"))?;
        let folder = self.state.folder.clone().ok_or_else(|| missing("文件夹"))?;
        let cluster = self.state.cluster.clone().ok_or_else(|| missing("集群"))?;
        let datastore = self
            .state
            .datastore
            .clone()
            .ok_or_else(|| missing("数据存储"))?;
        let count = self.state.requested_count;

        let compute = sessions.compute_mut()?;
        self.compute.ensure_live(compute).await?;

        let mut created = Vec::new();
        let mut failures = Vec::new();
        for index in 0..count {
            let name = naming::generate_machine_name(&self.options.machine_prefix);
            self.operator.notify(&format!(
                "正在创建并开机桌面 {}/{}：{}",
                index + 1,
                count,
                name
            ));

            let req = DeployRequest {
                name: name.clone(),
                template_id: template.id.clone(),
                folder_id: folder.id.clone(),
                cluster_id: cluster.id.clone(),
                datastore_id: datastore.id.clone(),
                spec_id: guest_spec.id.clone(),
            };
            let result = async {
                compute.handle.deploy_from_template(&req).await?;
                compute.handle.power_on(&name).await
            }
            .await;

            match result {
                Ok(()) => created.push(name),
                Err(e) => {
                    warn!("桌面 {} 创建失败: {}", name, e);
                    self.operator
                        .notify(&format!("桌面 {} 创建失败，跳过：{}", name, e));
                    failures.push(ErrorRecord::new(
                        Phase::CloneDesktops,
                        format!("{}: {}", name, e),
                    ));
                }
            }
        }

        self.state.created_names = created;
        self.sink.merge(failures);
        Ok(())
    }

    /// 等待客户机定制完成
    ///
    /// 只检查最后创建的一台：其客户机主机名与分配名称前缀吻合
    /// 即视为整批定制完成。这是对整批的启发式信号，不是逐台
    /// 等待，个别桌面仍可能稍晚就绪。
    async fn wait_for_customization(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let last = match self.state.created_names.last() {
            Some(name) => name.clone(),
            None => {
                self.operator.notify("本批没有新桌面，跳过定制等待");
                return Ok(());
            }
        };

        self.operator.notify(&format!(
            "等待客户机定制完成（以最后创建的 {} 为整批完成信号）...",
            last
        ));

        let compute = sessions.compute_mut()?;
        self.compute.ensure_live(compute).await?;

        let handle = &compute.handle;
        let name = last.clone();
        let target = last.to_ascii_uppercase();
        poll::poll_until(
            &self.options.poll,
            move || {
                let name = name.clone();
                async move { handle.guest_hostname(&name).await }
            },
            move |hostname: &Option<String>| {
                hostname
                    .as_deref()
                    .map_or(false, |h| !h.is_empty() && h.to_ascii_uppercase().starts_with(&target))
            },
        )
        .await?;

        self.operator.notify("客户机定制已完成");
        Ok(())
    }

    async fn add_to_pool(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let pool = self.selected_pool()?.clone();
        let folder = self
            .state
            .folder
            .clone()
            .ok_or_else(|| WorkflowError::Unknown("目标文件夹缺失".to_string()))?;

        // 以目标文件夹内的虚拟机作为"刚创建的整批"的代理
        let names = {
            let compute = sessions.compute_mut()?;
            self.compute.ensure_live(compute).await?;
            compute.handle.list_vm_names_in_folder(&folder.id).await?
        };

        let broker = sessions.broker_mut()?;
        self.broker.ensure_live(broker).await?;
        broker.handle.add_machines_to_pool(&pool.id, &names).await?;
        self.operator.notify(&format!(
            "已将 {} 台桌面加入池「{}」",
            names.len(),
            pool.name
        ));
        Ok(())
    }

    async fn wait_for_check_in(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let pool = self.selected_pool()?.clone();
        self.operator
            .notify("等待全部桌面在代理平台签入（状态 AVAILABLE）...");

        let broker = sessions.broker_mut()?;
        self.broker.ensure_live(broker).await?;

        let handle = &broker.handle;
        let pool_id = pool.id.clone();
        poll::poll_until(
            &self.options.poll,
            move || {
                let pool_id = pool_id.clone();
                async move { handle.list_pool_machines(&pool_id).await }
            },
            |machines: &Vec<BrokerMachine>| machines.iter().all(|m| m.is_available()),
        )
        .await?;

        self.operator.notify("全部桌面已签入");
        Ok(())
    }

    async fn shutdown_for_reconfig(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let names = self.state.created_names.clone();
        if names.is_empty() {
            return Ok(());
        }

        let compute = sessions.compute_mut()?;
        self.compute.ensure_live(compute).await?;

        self.operator
            .notify("请求整批客户机关机，为磁盘重配做准备 ...");
        let mut failures = Vec::new();
        for name in &names {
            if let Err(e) = compute.handle.shutdown_guest(name).await {
                self.operator.notify(&format!(
                    "桌面 {} 关机请求失败：{}（请人工处理）",
                    name, e
                ));
                failures.push(ErrorRecord::new(
                    Phase::ShutdownForReconfig,
                    format!("{}: {}", name, e),
                ));
            }
        }
        self.sink.merge(failures);

        // 个别关机失败不阻断流程，仍等待整批电源收敛
        let handle = &compute.handle;
        let batch = names.clone();
        poll::poll_until(
            &self.options.poll,
            move || {
                let batch = batch.clone();
                async move {
                    let mut states = Vec::with_capacity(batch.len());
                    for name in &batch {
                        states.push(handle.power_state(name).await?);
                    }
                    Ok(states)
                }
            },
            |states: &Vec<PowerState>| states.iter().all(|s| *s == PowerState::PoweredOff),
        )
        .await?;

        self.operator.notify("整批桌面已关机");
        Ok(())
    }

    async fn set_disk_persistence(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let names = self.state.created_names.clone();
        if names.is_empty() {
            return Ok(());
        }

        let compute = sessions.compute_mut()?;
        self.compute.ensure_live(compute).await?;

        self.operator.notify("设置磁盘为独立非持久模式 ...");
        let mut failures = Vec::new();
        for name in &names {
            if let Err(e) = compute.handle.set_disks_nonpersistent(name).await {
                self.operator.notify(&format!(
                    "桌面 {} 磁盘模式设置失败：{}（请人工处理）",
                    name, e
                ));
                failures.push(ErrorRecord::new(
                    Phase::SetDiskPersistence,
                    format!("{}: {}", name, e),
                ));
            }
        }
        self.sink.merge(failures);
        Ok(())
    }

    async fn power_on_batch(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let names = self.state.created_names.clone();
        if names.is_empty() {
            return Ok(());
        }

        let compute = sessions.compute_mut()?;
        self.compute.ensure_live(compute).await?;

        self.operator.notify("整批桌面重新开机 ...");
        let mut failures = Vec::new();
        for name in &names {
            if let Err(e) = compute.handle.power_on(name).await {
                self.operator
                    .notify(&format!("桌面 {} 开机失败：{}（请人工处理）", name, e));
                failures.push(ErrorRecord::new(Phase::PowerOn, format!("{}: {}", name, e)));
            }
        }
        self.sink.merge(failures);
        Ok(())
    }

    async fn enable_pool(
        &mut self,
        sessions: &mut Sessions<CC::Session, BC::Session>,
    ) -> Result<()> {
        let pool = self.selected_pool()?.clone();
        let broker = sessions.broker_mut()?;
        self.broker.ensure_live(broker).await?;
        broker.handle.enable_pool(&pool.id).await?;
        self.operator
            .notify(&format!("桌面池「{}」已重新启用", pool.name));
        Ok(())
    }

    /// 清理阶段：每条退出路径都会经过这里且只执行一次
    async fn finalize(&mut self, sessions: &mut Sessions<CC::Session, BC::Session>) {
        info!("清理：关闭远端会话");
        if let Some(mut session) = sessions.compute.take() {
            session.handle.close().await;
        }
        if let Some(mut session) = sessions.broker.take() {
            session.handle.close().await;
        }

        if self.sink.is_empty() {
            self.operator.notify("刷新流程结束，未记录任何错误");
            return;
        }

        self.operator
            .notify(&format!("流程共记录 {} 个错误：", self.sink.len()));
        for record in self.sink.records() {
            self.operator.notify(&format!(
                "  [{}] {} - {}",
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                record.phase,
                record.detail
            ));
        }

        let report = ErrorReport::new(self.sink.records().to_vec());
        match report.write(&self.options.report_path) {
            Ok(()) => self.operator.notify(&format!(
                "错误报告已写入: {}",
                self.options.report_path.display()
            )),
            Err(e) => {
                error!("错误报告写入失败: {}", e);
                self.operator
                    .notify(&format!("错误报告写入失败：{}", e));
            }
        }
    }
}
