use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use task_console_domain::SubmissionPayload;
use task_console_errors::ConsoleResult;

/// 可绑定的Worker节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindableNode {
    pub id: i64,
    pub title: String,
}

impl BindableNode {
    pub fn new<S: Into<String>>(id: i64, title: S) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// 提交结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    Accepted,
    Rejected { reason: String },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

/// 可绑定节点目录
///
/// 可能被反复调用（例如每次展开节点选择框），对会话而言没有副作用。
#[async_trait]
pub trait BindableNodeDirectory: Send + Sync {
    async fn fetch_bindable_nodes(&self) -> ConsoleResult<Vec<BindableNode>>;
}

/// 提交载荷到调度服务
///
/// 网络传输由实现方负责；返回 `Err` 表示传输失败，`Rejected` 表示服务端拒绝。
#[async_trait]
pub trait TaskSubmitter: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> ConsoleResult<SubmitOutcome>;
}
