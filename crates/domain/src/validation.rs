use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use task_console_errors::ValidationReport;

use crate::models::TaskDraft;

/// 验证任务草稿，一次性返回所有无效字段
///
/// 必填项：名称、描述、命令、运行模式、时区、CRON表达式、超时时间、重试次数、
/// 重试间隔、最大并行数。数值超出范围视为失败，不做截断。
pub fn validate_draft(draft: &TaskDraft) -> Result<(), ValidationReport> {
    match draft.validate() {
        Ok(()) => Ok(()),
        Err(errors) => to_report(&errors).into_result(),
    }
}

/// 将嵌套的 `ValidationErrors` 展开为以点分路径为键的报告
pub fn to_report(errors: &ValidationErrors) -> ValidationReport {
    let mut report = ValidationReport::new();
    collect(None, errors, &mut report);
    report
}

fn collect(prefix: Option<&str>, errors: &ValidationErrors, report: &mut ValidationReport) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    report.push(path.as_str(), message_of(error));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(Some(&path), nested, report),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(Some(&format!("{path}[{index}]")), nested, report);
                }
            }
        }
    }
}

fn message_of(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}
