//! # 任务表单数据模型
//!
//! - [`TaskDraft`]：表单的原始输入，字段类型宽松（可选数值、文本形式的运行次数）
//! - [`TaskDescriptor`]：提交给调度服务的规范化描述符，`frequency` 与 `tag` 为字符串
//! - [`SubmissionPayload`]：`{task, binding_ids}` 形式的提交载荷
//!
//! 草稿与描述符之间的转换见 [`crate::builder`]。

pub mod frequency;
pub mod task;

pub use frequency::*;
pub use task::*;
