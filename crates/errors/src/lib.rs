use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// 任务管理台统一错误类型
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("表单验证失败: {0}")]
    Validation(ValidationReport),
    #[error("无效的CRON表达式: {expr} - {message}")]
    InvalidCron { expr: String, message: String },
    #[error("无效的频率配置: {raw} - {message}")]
    InvalidFrequency { raw: String, message: String },
    #[error("序列化错误: {0}")]
    Serialization(String),
    #[error("绑定节点查询失败: {0}")]
    NodeLookup(String),
    #[error("任务提交失败: {0}")]
    Submission(String),
    #[error("任务提交被拒绝: {0}")]
    SubmissionRejected(String),
    #[error("会话已关闭")]
    SessionClosed,
    #[error("IO错误: {0}")]
    Io(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl ConsoleError {
    pub fn invalid_cron<E: Into<String>, M: Into<String>>(expr: E, message: M) -> Self {
        Self::InvalidCron {
            expr: expr.into(),
            message: message.into(),
        }
    }
    pub fn invalid_frequency<R: Into<String>, M: Into<String>>(raw: R, message: M) -> Self {
        Self::InvalidFrequency {
            raw: raw.into(),
            message: message.into(),
        }
    }
    pub fn node_lookup<S: Into<String>>(msg: S) -> Self {
        Self::NodeLookup(msg.into())
    }
    pub fn submission<S: Into<String>>(msg: S) -> Self {
        Self::Submission(msg.into())
    }
    pub fn rejected<S: Into<String>>(reason: S) -> Self {
        Self::SubmissionRejected(reason.into())
    }

    /// 用户修正输入之前重试没有意义的错误返回 false
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ConsoleError::NodeLookup(_) | ConsoleError::Submission(_) | ConsoleError::Io(_)
        )
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ConsoleError::Internal(_))
    }

    pub fn user_message(&self) -> &str {
        match self {
            ConsoleError::Validation(_) => "表单填写有误，请检查标红的字段",
            ConsoleError::InvalidCron { .. } => "CRON表达式无法解析",
            ConsoleError::InvalidFrequency { .. } => "任务频率配置有误",
            ConsoleError::NodeLookup(_) => "绑定节点列表暂时不可用",
            ConsoleError::Submission(_) => "任务提交失败，请稍后重试",
            ConsoleError::SubmissionRejected(_) => "调度服务拒绝了该任务",
            ConsoleError::SessionClosed => "编辑窗口已关闭",
            _ => "系统繁忙，请稍后重试",
        }
    }

    /// 验证失败时返回逐字段的错误报告
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            ConsoleError::Validation(report) => Some(report),
            _ => None,
        }
    }
}

impl From<ValidationReport> for ConsoleError {
    fn from(report: ValidationReport) -> Self {
        ConsoleError::Validation(report)
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for ConsoleError {
    fn from(err: anyhow::Error) -> Self {
        ConsoleError::Internal(err.to_string())
    }
}

/// 逐字段的表单验证结果
///
/// 字段名使用点分路径（例如 `frequency.mode`），同一字段可能对应多条错误信息。
/// 所有无效字段一次性给出，而不是遇到第一个就停止。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 按字段名排序的无效字段列表
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// 有错误时转换为 `Err`
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}
