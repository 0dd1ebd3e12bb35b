//! 任务编辑会话
//!
//! 把描述符构建器与两个外部协作方（可绑定节点目录、任务提交方）串起来：
//! 打开会话 → 编辑草稿 → 刷新候选节点 → 确认提交。

pub mod adapters;
pub mod ports;
pub mod session;

pub use adapters::{FileNodeDirectory, JsonWriterSubmitter, StaticNodeDirectory};
pub use ports::{BindableNode, BindableNodeDirectory, SubmitOutcome, TaskSubmitter};
pub use session::{LookupTicket, SessionState, TaskModalSession, DEFAULT_HISTORY_LIMIT};
