use serde_json::Map;
use tracing::{debug, warn};

use task_console_errors::ValidationReport;

use crate::codec::{decode_binding_ids, decode_frequency, decode_tags, encode_frequency, encode_tags};
use crate::cron_utils::normalize_cron_expression;
use crate::models::{Frequency, FrequencyDraft, SubmissionPayload, TaskDescriptor, TaskDraft};
use crate::validation::validate_draft;

/// 服务端记录中绑定节点字段的键名，不属于描述符正文
pub const BINDING_IDS_KEY: &str = "binding_ids";

/// 任务描述符构建器
///
/// 持有编辑前的原始记录（新建时为空），负责：
/// - 生成初始草稿（默认值或由原始记录反序列化）
/// - 验证草稿
/// - 将草稿转换为规范化描述符，并与原始记录合并
///
/// 合并规则：表单编辑的字段总是覆盖原始值；`id` 以原始记录为准；
/// 表单不涉及的服务端字段原样保留。
///
/// # 使用示例
///
/// ```rust
/// use task_console_domain::builder::TaskDescriptorBuilder;
/// use task_console_domain::models::TaskDraft;
///
/// let builder = TaskDescriptorBuilder::new();
/// let draft = TaskDraft {
///     name: "demo".to_string(),
///     description: "this is a command line".to_string(),
///     command: "echo 'hello world';".to_string(),
///     cron_expression: "0 0 12 * * ?".to_string(),
///     tag: vec!["prod".to_string(), "etl".to_string()],
///     ..builder.initialize_draft()
/// };
///
/// assert!(builder.validate(&draft).is_ok());
/// let (descriptor, binding_ids) = builder.build_descriptor(draft);
/// assert_eq!(descriptor.cron_expression, "0 0 12 * * *");
/// assert_eq!(descriptor.tag, "prod,etl");
/// assert!(binding_ids.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskDescriptorBuilder {
    existing: Option<TaskDescriptor>,
}

impl TaskDescriptorBuilder {
    /// 新建模式
    pub fn new() -> Self {
        Self { existing: None }
    }

    /// 编辑模式；空记录按新建处理
    pub fn for_existing(existing: TaskDescriptor) -> Self {
        if existing.is_empty() {
            return Self::new();
        }
        Self {
            existing: Some(existing),
        }
    }

    pub fn existing(&self) -> Option<&TaskDescriptor> {
        self.existing.as_ref()
    }

    pub fn is_edit(&self) -> bool {
        self.existing.is_some()
    }

    pub fn initialize_draft(&self) -> TaskDraft {
        initialize_draft(self.existing.as_ref())
    }

    pub fn validate(&self, draft: &TaskDraft) -> Result<(), ValidationReport> {
        validate_draft(draft)
    }

    /// 将草稿转换为描述符与绑定节点列表
    ///
    /// 纯函数，从不失败。调用方必须先通过 [`Self::validate`]；未验证的草稿中
    /// 缺失的数值按 0 传递。
    pub fn build_descriptor(&self, draft: TaskDraft) -> (TaskDescriptor, Vec<i64>) {
        let TaskDraft {
            id,
            name,
            description,
            command,
            frequency,
            cron_expression,
            timeout,
            retry_times,
            retry_interval,
            maximum_parallel_runnable_num,
            tag,
            binding_ids,
            status,
        } = draft;

        let (stored_id, mut extra) = match &self.existing {
            Some(existing) => (existing.id, existing.extra.clone()),
            None => (None, Map::new()),
        };
        extra.remove(BINDING_IDS_KEY);

        let descriptor = TaskDescriptor {
            id: stored_id.or(id),
            name,
            description,
            command,
            frequency: encode_frequency(&frequency.normalized()),
            cron_expression: normalize_cron_expression(&cron_expression),
            timeout: timeout.unwrap_or_default(),
            retry_times: retry_times.unwrap_or_default(),
            retry_interval: retry_interval.unwrap_or_default(),
            maximum_parallel_runnable_num: maximum_parallel_runnable_num.unwrap_or_default(),
            tag: encode_tags(&tag),
            status,
            extra,
        };

        debug!(
            "构建任务描述符: id={:?}, name={}, cron={}, frequency={}, 绑定节点数={}",
            descriptor.id,
            descriptor.name,
            descriptor.cron_expression,
            descriptor.frequency,
            binding_ids.len()
        );

        (descriptor, binding_ids)
    }

    pub fn build_payload(&self, draft: TaskDraft) -> SubmissionPayload {
        let (task, binding_ids) = self.build_descriptor(draft);
        SubmissionPayload::new(task, binding_ids)
    }
}

/// 生成编辑草稿：有非空原始记录时反序列化，否则返回新建默认值。从不失败。
pub fn initialize_draft(existing: Option<&TaskDescriptor>) -> TaskDraft {
    let existing = match existing {
        Some(existing) if !existing.is_empty() => existing,
        _ => return TaskDraft::default(),
    };

    let frequency = decode_frequency(&existing.frequency).unwrap_or_else(|e| {
        warn!(
            "任务 {:?} 的频率配置无法解析，使用默认值: {}",
            existing.id, e
        );
        Frequency::default()
    });

    let binding_ids = existing
        .extra
        .get(BINDING_IDS_KEY)
        .and_then(decode_binding_ids)
        .unwrap_or_default();

    TaskDraft {
        id: existing.id,
        name: existing.name.clone(),
        description: existing.description.clone(),
        command: existing.command.clone(),
        frequency: FrequencyDraft::from(&frequency),
        cron_expression: existing.cron_expression.clone(),
        timeout: Some(existing.timeout),
        retry_times: Some(existing.retry_times),
        retry_interval: Some(existing.retry_interval),
        maximum_parallel_runnable_num: Some(existing.maximum_parallel_runnable_num),
        tag: decode_tags(&existing.tag),
        binding_ids,
        status: existing.status,
    }
}

/// 新建模式下的描述符构建
pub fn build_descriptor(draft: TaskDraft) -> (TaskDescriptor, Vec<i64>) {
    TaskDescriptorBuilder::new().build_descriptor(draft)
}
