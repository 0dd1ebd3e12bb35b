//! Test data builders for drafts and stored task records

use serde_json::json;
use task_console_domain::{
    ExtendDraft, FrequencyMode, TaskDescriptor, TaskDraft, TaskStatus, TaskTimeZone,
};
use task_console_session::BindableNode;

/// Builder for a draft that passes validation unless customised otherwise
pub struct TaskDraftBuilder {
    draft: TaskDraft,
}

impl TaskDraftBuilder {
    pub fn new() -> Self {
        Self {
            draft: TaskDraft {
                name: "test_task".to_string(),
                description: "test task description".to_string(),
                command: "echo 'hello world';".to_string(),
                ..TaskDraft::default()
            },
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.draft.name = name.to_string();
        self
    }

    pub fn with_command(mut self, command: &str) -> Self {
        self.draft.command = command.to_string();
        self
    }

    pub fn with_cron(mut self, cron_expression: &str) -> Self {
        self.draft.cron_expression = cron_expression.to_string();
        self
    }

    pub fn with_frequency(mut self, mode: FrequencyMode, time_zone: TaskTimeZone, count: &str) -> Self {
        self.draft.frequency.mode = Some(mode);
        self.draft.frequency.time_zone = Some(time_zone);
        self.draft.frequency.extend = ExtendDraft::new(count);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<i64>) -> Self {
        self.draft.timeout = timeout;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.draft.tag = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }

    pub fn with_binding_ids(mut self, binding_ids: Vec<i64>) -> Self {
        self.draft.binding_ids = binding_ids;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.draft.status = TaskStatus::Disabled;
        self
    }

    pub fn build(self) -> TaskDraft {
        self.draft
    }
}

impl Default for TaskDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a task record as returned by the scheduling backend
pub struct StoredTaskBuilder {
    value: serde_json::Value,
}

impl StoredTaskBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            value: json!({
                "id": id,
                "name": format!("stored_task_{id}"),
                "description": "stored task",
                "command": "run.sh",
                "frequency": "{\"extend\":{\"count\":1},\"mode\":3,\"time_zone\":1}",
                "cron_expression": "0 0 2 * * *",
                "timeout": 300,
                "retry_times": 1,
                "retry_interval": 10,
                "maximun_parallel_runnable_num": 2,
                "tag": "",
                "status": 2,
                "created_time": "2021-05-01 10:00:00"
            }),
        }
    }

    pub fn with_field(mut self, key: &str, value: serde_json::Value) -> Self {
        self.value[key] = value;
        self
    }

    pub fn build(self) -> TaskDescriptor {
        serde_json::from_value(self.value).unwrap()
    }
}

pub fn sample_nodes() -> Vec<BindableNode> {
    vec![
        BindableNode::new(1, "worker-01 (10.0.0.1)"),
        BindableNode::new(2, "worker-02 (10.0.0.2)"),
    ]
}
