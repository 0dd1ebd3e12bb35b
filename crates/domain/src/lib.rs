//! # 任务描述符规范化
//!
//! 将定时任务表单的宽松输入（字符串、可选字段、自由格式的CRON文本）转换为
//! 调度服务可直接接收的规范化任务描述符，并提供提交前的验证约定。
//!
//! 处理流程：
//!
//! ```text
//! initialize_draft ──► 用户编辑 ──► validate_draft ──► build_descriptor ──► 提交
//! ```

pub mod builder;
pub mod codec;
pub mod cron_utils;
pub mod models;
pub mod validation;
pub mod value_objects;

pub use builder::{build_descriptor, initialize_draft, TaskDescriptorBuilder};
pub use cron_utils::{normalize_cron_expression, CronPreview, CRON_FIELD_COUNT};
pub use models::*;
pub use task_console_errors::{ConsoleError, ConsoleResult, ValidationReport};
pub use validation::validate_draft;
pub use value_objects::*;
