use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::frequency::FrequencyDraft;
use crate::value_objects::TaskStatus;

/// 新建任务时预填的 CRON 表达式
pub const DEFAULT_CRON_EXPRESSION: &str = "* * * * * ?";

/// 任务编辑草稿
///
/// 表单的原始输入状态，每次编辑都生成一个新的草稿值。反序列化时缺失的字段
/// 取新建任务的默认值，显式的 `null` 表示该字段未填写。
///
/// # 使用示例
///
/// ```rust
/// use task_console_domain::models::TaskDraft;
///
/// let draft = TaskDraft {
///     name: "nightly-backup".to_string(),
///     description: "每日凌晨备份".to_string(),
///     command: "backup.sh".to_string(),
///     tag: vec!["prod".to_string()],
///     ..TaskDraft::default()
/// };
/// assert_eq!(draft.timeout, Some(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TaskDraft {
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "任务名称必须填写"))]
    pub name: String,
    #[validate(length(min = 1, message = "任务描述必须填写"))]
    pub description: String,
    #[validate(length(min = 1, message = "执行命令必须填写"))]
    pub command: String,
    #[validate(nested)]
    pub frequency: FrequencyDraft,
    #[validate(length(min = 1, message = "CRON表达式必须填写"))]
    pub cron_expression: String,
    #[validate(
        required(message = "超时时间必须填写"),
        range(min = 10, max = 10000, message = "超时时间必须在10到10000秒之间")
    )]
    pub timeout: Option<i64>,
    #[validate(
        required(message = "重试次数必须填写"),
        range(min = 1, max = 100, message = "重试次数必须在1到100次之间")
    )]
    pub retry_times: Option<i64>,
    #[validate(
        required(message = "重试间隔必须填写"),
        range(min = 10, max = 10000, message = "重试间隔必须在10到10000秒之间")
    )]
    pub retry_interval: Option<i64>,
    #[validate(
        required(message = "最大并行数必须填写"),
        range(min = 1, max = 10000, message = "最大并行数必须在1到10000之间")
    )]
    pub maximum_parallel_runnable_num: Option<i64>,
    pub tag: Vec<String>,
    pub binding_ids: Vec<i64>,
    pub status: TaskStatus,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            command: String::new(),
            frequency: FrequencyDraft::default(),
            cron_expression: DEFAULT_CRON_EXPRESSION.to_string(),
            timeout: Some(300),
            retry_times: Some(1),
            retry_interval: Some(10),
            maximum_parallel_runnable_num: Some(2),
            tag: Vec::new(),
            binding_ids: Vec::new(),
            status: TaskStatus::Enabled,
        }
    }
}

/// 规范化后的任务描述符，即提交给调度服务的 `task` 字段
///
/// `frequency` 与 `tag` 以字符串形式传输。服务端生成、表单不编辑的字段
/// （例如 `created_time`）保存在 `extra` 中，编辑时原样带回。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub command: String,
    pub frequency: String,
    pub cron_expression: String,
    pub timeout: i64,
    pub retry_times: i64,
    pub retry_interval: i64,
    // 调度服务的存量记录使用旧拼写
    #[serde(alias = "maximun_parallel_runnable_num")]
    pub maximum_parallel_runnable_num: i64,
    pub tag: String,
    pub status: TaskStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskDescriptor {
    /// 没有任何实际内容的记录视为空，编辑窗口按新建处理
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_empty()
            && self.description.is_empty()
            && self.command.is_empty()
            && self.frequency.is_empty()
            && self.cron_expression.is_empty()
            && self.timeout == 0
            && self.retry_times == 0
            && self.retry_interval == 0
            && self.maximum_parallel_runnable_num == 0
            && self.tag.is_empty()
            && self.extra.is_empty()
    }
}

/// 提交载荷：任务描述符与绑定节点列表并列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub task: TaskDescriptor,
    pub binding_ids: Vec<i64>,
}

impl SubmissionPayload {
    pub fn new(task: TaskDescriptor, binding_ids: Vec<i64>) -> Self {
        Self { task, binding_ids }
    }

    pub fn is_update(&self) -> bool {
        self.task.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_keeps_unknown_fields() {
        let descriptor: TaskDescriptor = serde_json::from_str(
            r#"{
                "id": 9,
                "name": "etl",
                "timeout": 60,
                "maximun_parallel_runnable_num": 4,
                "status": 1,
                "created_time": "2021-05-01 10:00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(descriptor.id, Some(9));
        assert_eq!(descriptor.maximum_parallel_runnable_num, 4);
        assert_eq!(descriptor.status, TaskStatus::Disabled);
        assert_eq!(
            descriptor.extra.get("created_time"),
            Some(&Value::String("2021-05-01 10:00:00".to_string()))
        );
        assert!(!descriptor.is_empty());
    }

    #[test]
    fn test_empty_descriptor() {
        let descriptor: TaskDescriptor = serde_json::from_str("{}").unwrap();
        assert!(descriptor.is_empty());
    }

    #[test]
    fn test_draft_missing_fields_take_defaults() {
        let draft: TaskDraft = serde_json::from_str(r#"{"name": "demo", "timeout": null}"#).unwrap();
        assert_eq!(draft.name, "demo");
        assert_eq!(draft.timeout, None);
        assert_eq!(draft.retry_times, Some(1));
        assert_eq!(draft.cron_expression, DEFAULT_CRON_EXPRESSION);
    }

    #[test]
    fn test_draft_from_toml() {
        let draft: TaskDraft = toml::from_str(
            r#"
name = "demo"
description = "this is a command line"
command = "echo 'hello world';"
tag = ["prod", "etl"]
binding_ids = [3, 5]

[frequency]
mode = 2
time_zone = 2
extend = { count = "4" }
"#,
        )
        .unwrap();

        assert_eq!(draft.tag, vec!["prod", "etl"]);
        assert_eq!(draft.binding_ids, vec![3, 5]);
        assert_eq!(draft.frequency.extend.count, "4");
    }
}
