use std::collections::VecDeque;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use task_console_domain::{SubmissionPayload, TaskDescriptor, TaskDescriptorBuilder, TaskDraft};
use task_console_errors::{ConsoleError, ConsoleResult, ValidationReport};

use crate::ports::{BindableNode, BindableNodeDirectory, SubmitOutcome, TaskSubmitter};

pub const DEFAULT_HISTORY_LIMIT: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// 一次绑定节点查询的凭据，结果只能回填到发起查询的会话
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket {
    session_id: Uuid,
}

/// 任务编辑窗口会话
///
/// 会话独占一份草稿，每次编辑都以新草稿替换旧草稿并记录历史，可撤销。
/// 确认时先验证，再构建载荷并交给提交方；失败时草稿保持不变，用户可直接重试。
#[derive(Debug)]
pub struct TaskModalSession {
    id: Uuid,
    builder: TaskDescriptorBuilder,
    draft: TaskDraft,
    history: VecDeque<TaskDraft>,
    history_limit: usize,
    candidates: Vec<BindableNode>,
    state: SessionState,
}

impl TaskModalSession {
    /// 新建任务
    pub fn open_create() -> Self {
        Self::open(TaskDescriptorBuilder::new())
    }

    /// 编辑已有任务
    pub fn open_edit(existing: TaskDescriptor) -> Self {
        Self::open(TaskDescriptorBuilder::for_existing(existing))
    }

    fn open(builder: TaskDescriptorBuilder) -> Self {
        let draft = builder.initialize_draft();
        let session = Self {
            id: Uuid::new_v4(),
            builder,
            draft,
            history: VecDeque::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            candidates: Vec::new(),
            state: SessionState::Open,
        };
        info!(
            "打开任务编辑会话: session={}, 模式={}, task_id={:?}",
            session.id,
            if session.is_edit() { "编辑" } else { "新建" },
            session.draft.id
        );
        session
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn is_edit(&self) -> bool {
        self.builder.is_edit()
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// 当前缓存的候选绑定节点
    pub fn candidates(&self) -> &[BindableNode] {
        &self.candidates
    }

    /// 以编辑函数生成的新草稿替换当前草稿
    pub fn update<F>(&mut self, edit: F) -> ConsoleResult<&TaskDraft>
    where
        F: FnOnce(TaskDraft) -> TaskDraft,
    {
        self.ensure_open()?;

        let next = edit(self.draft.clone());
        if next != self.draft {
            let previous = std::mem::replace(&mut self.draft, next);
            self.history.push_back(previous);
            while self.history.len() > self.history_limit {
                self.history.pop_front();
            }
        }

        Ok(&self.draft)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// 撤销上一次编辑，没有可撤销的编辑时返回 `false`
    pub fn undo(&mut self) -> ConsoleResult<bool> {
        self.ensure_open()?;

        match self.history.pop_back() {
            Some(previous) => {
                self.draft = previous;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationReport> {
        self.builder.validate(&self.draft)
    }

    /// 验证并构建提交载荷，不提交
    pub fn preview_payload(&self) -> Result<SubmissionPayload, ValidationReport> {
        self.validate()?;
        Ok(self.builder.build_payload(self.draft.clone()))
    }

    pub fn begin_binding_lookup(&self) -> ConsoleResult<LookupTicket> {
        self.ensure_open()?;
        Ok(LookupTicket {
            session_id: self.id,
        })
    }

    /// 回填绑定节点查询结果，返回是否替换了候选列表
    ///
    /// 后完成的查询覆盖先完成的；查询失败时保留旧列表；会话已关闭或凭据
    /// 不属于本会话时丢弃结果。
    pub fn complete_binding_lookup(
        &mut self,
        ticket: LookupTicket,
        result: ConsoleResult<Vec<BindableNode>>,
    ) -> bool {
        if ticket.session_id != self.id || !self.is_open() {
            debug!(
                "丢弃过期的绑定节点查询结果: session={}, ticket={}",
                self.id, ticket.session_id
            );
            return false;
        }

        match result {
            Ok(nodes) => {
                debug!("更新候选绑定节点: session={}, 数量={}", self.id, nodes.len());
                self.candidates = nodes;
                true
            }
            Err(e) => {
                warn!(
                    "获取可绑定节点失败，保留现有列表: session={}, error={}",
                    self.id, e
                );
                false
            }
        }
    }

    /// 查询并回填候选绑定节点；查询失败不会返回错误
    pub async fn refresh_bindings(
        &mut self,
        directory: &dyn BindableNodeDirectory,
    ) -> ConsoleResult<bool> {
        let ticket = self.begin_binding_lookup()?;
        let result = directory.fetch_bindable_nodes().await;
        Ok(self.complete_binding_lookup(ticket, result))
    }

    /// 验证、构建并提交任务
    ///
    /// 只有提交被接受时会话才会关闭；验证失败、传输失败或被拒绝时草稿保持
    /// 原样，不自动重试。
    pub async fn confirm(&mut self, submitter: &dyn TaskSubmitter) -> ConsoleResult<SubmitOutcome> {
        self.ensure_open()?;

        if let Err(report) = self.validate() {
            info!(
                "任务表单验证未通过: session={}, 无效字段={}",
                self.id,
                report.len()
            );
            return Err(ConsoleError::Validation(report));
        }

        let payload = self.builder.build_payload(self.draft.clone());
        info!(
            "提交任务: session={}, task_id={:?}, name={}, 绑定节点={:?}",
            self.id, payload.task.id, payload.task.name, payload.binding_ids
        );

        match submitter.submit(&payload).await {
            Ok(SubmitOutcome::Accepted) => {
                info!("任务提交成功: session={}", self.id);
                self.close();
                Ok(SubmitOutcome::Accepted)
            }
            Ok(SubmitOutcome::Rejected { reason }) => {
                error!("任务提交被拒绝: session={}, reason={}", self.id, reason);
                Err(ConsoleError::rejected(reason))
            }
            Err(e) => {
                error!("任务提交失败: session={}, error={}", self.id, e);
                Err(e)
            }
        }
    }

    pub fn close(&mut self) {
        if self.is_open() {
            debug!("关闭任务编辑会话: session={}", self.id);
        }
        self.state = SessionState::Closed;
    }

    fn ensure_open(&self) -> ConsoleResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ConsoleError::SessionClosed)
        }
    }
}
