use chrono::{DateTime, Local, Utc};
use cron::Schedule;
use std::str::FromStr;
use tracing::debug;

use task_console_errors::{ConsoleError, ConsoleResult};

use crate::value_objects::TaskTimeZone;

/// 调度服务要求的CRON字段数：秒 分 时 日 月 周
pub const CRON_FIELD_COUNT: usize = 6;

const FIELD_DELIMITER: char = ' ';
const WILDCARD: &str = "*";
const WILDCARD_ALIAS: &str = "?";

/// 按单个空格切分统计字段数，连续或结尾的分隔符也计入
pub fn count_cron_fields(expr: &str) -> usize {
    expr.split(FIELD_DELIMITER).count()
}

/// 规范化CRON表达式
///
/// `?` 一律替换为 `*`；不足6个字段时在末尾补 `*` 直到6个字段，
/// 已有6个及以上字段时保持原样（超出部分由调度服务判断是否合法）。
pub fn normalize_cron_expression(expr: &str) -> String {
    let fields = count_cron_fields(expr);
    let mut normalized = expr.replace(WILDCARD_ALIAS, WILDCARD);
    for _ in fields..CRON_FIELD_COUNT {
        normalized.push(FIELD_DELIMITER);
        normalized.push_str(WILDCARD);
    }
    normalized
}

/// CRON表达式的执行时间预览
///
/// 仅用于在提交前展示接下来的触发时间，解析失败不会阻止提交。
pub struct CronPreview {
    expression: String,
    schedule: Schedule,
}

impl CronPreview {
    pub fn new(cron_expr: &str) -> ConsoleResult<Self> {
        let compact = cron_expr.split_whitespace().collect::<Vec<_>>().join(" ");
        let expression = normalize_cron_expression(&compact);
        let schedule = Schedule::from_str(&expression)
            .map_err(|e| ConsoleError::invalid_cron(expression.as_str(), e.to_string()))?;

        Ok(Self {
            expression,
            schedule,
        })
    }

    /// 实际参与解析的规范化表达式
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// 从 `from` 之后的 `count` 个触发时间，按任务时区计算，统一以UTC返回
    pub fn upcoming(
        &self,
        time_zone: TaskTimeZone,
        from: DateTime<Utc>,
        count: usize,
    ) -> Vec<DateTime<Utc>> {
        let times: Vec<DateTime<Utc>> = match time_zone {
            TaskTimeZone::Utc => self.schedule.after(&from).take(count).collect(),
            TaskTimeZone::Local => self
                .schedule
                .after(&from.with_timezone(&Local))
                .take(count)
                .map(|time| time.with_timezone(&Utc))
                .collect(),
        };
        debug!(
            "CRON预览: 表达式={}, 时区={}, 结果数={}",
            self.expression,
            time_zone,
            times.len()
        );
        times
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_cron_fields() {
        assert_eq!(count_cron_fields("* * * * * ?"), 6);
        assert_eq!(count_cron_fields("* * * * *"), 5);
        assert_eq!(count_cron_fields("* * * * * "), 6);
        assert_eq!(count_cron_fields("0"), 1);
    }

    #[test]
    fn test_normalize_replaces_alias_and_pads() {
        assert_eq!(normalize_cron_expression("0 0 12 * * ?"), "0 0 12 * * *");
        assert_eq!(normalize_cron_expression("* * * * *"), "* * * * * *");
        assert_eq!(normalize_cron_expression("0"), "0 * * * * *");
    }

    #[test]
    fn test_normalize_keeps_longer_expressions() {
        assert_eq!(
            normalize_cron_expression("0 0 12 ? * * 2030"),
            "0 0 12 * * * 2030"
        );
    }
}
