#[cfg(test)]
mod error_tests {
    use crate::*;

    #[test]
    fn test_console_error_display() {
        let cron_error = ConsoleError::invalid_cron("* *", "too few fields");
        assert_eq!(
            cron_error.to_string(),
            "无效的CRON表达式: * * - too few fields"
        );

        let frequency_error = ConsoleError::invalid_frequency("{", "EOF");
        assert_eq!(frequency_error.to_string(), "无效的频率配置: { - EOF");

        let lookup_error = ConsoleError::node_lookup("connection refused");
        assert_eq!(
            lookup_error.to_string(),
            "绑定节点查询失败: connection refused"
        );

        let submit_error = ConsoleError::submission("502 Bad Gateway");
        assert_eq!(submit_error.to_string(), "任务提交失败: 502 Bad Gateway");

        let rejected = ConsoleError::rejected("duplicate name");
        assert_eq!(rejected.to_string(), "任务提交被拒绝: duplicate name");

        assert_eq!(ConsoleError::SessionClosed.to_string(), "会话已关闭");
    }

    #[test]
    fn test_validation_error_display_lists_every_field() {
        let mut report = ValidationReport::new();
        report.push("name", "任务名称必须填写");
        report.push("timeout", "超时时间必须在10到10000秒之间");

        let error = ConsoleError::from(report);
        assert_eq!(
            error.to_string(),
            "表单验证失败: name: 任务名称必须填写; timeout: 超时时间必须在10到10000秒之间"
        );
        assert_eq!(error.validation_report().map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_is_retryable() {
        assert!(ConsoleError::submission("timeout").is_retryable());
        assert!(ConsoleError::node_lookup("timeout").is_retryable());
        assert!(ConsoleError::Io("broken pipe".to_string()).is_retryable());

        assert!(!ConsoleError::Validation(ValidationReport::new()).is_retryable());
        assert!(!ConsoleError::rejected("bad cron").is_retryable());
        assert!(!ConsoleError::SessionClosed.is_retryable());
    }

    #[test]
    fn test_is_fatal() {
        assert!(ConsoleError::Internal("boom".to_string()).is_fatal());
        assert!(!ConsoleError::SessionClosed.is_fatal());
        assert!(!ConsoleError::submission("timeout").is_fatal());
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            ConsoleError::Validation(ValidationReport::new()).user_message(),
            "表单填写有误，请检查标红的字段"
        );
        assert_eq!(ConsoleError::SessionClosed.user_message(), "编辑窗口已关闭");
        assert_eq!(
            ConsoleError::Internal("x".to_string()).user_message(),
            "系统繁忙，请稍后重试"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: ConsoleError = err.into();
        assert!(matches!(error, ConsoleError::Serialization(_)));
    }

    #[test]
    fn test_validation_report_accumulates_messages() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());

        report.push("frequency.mode", "请选择运行模式");
        report.push("frequency.mode", "second message");
        report.push("command", "执行命令必须填写");

        assert!(!report.is_valid());
        assert_eq!(report.len(), 2);
        assert!(report.has_field("frequency.mode"));
        assert_eq!(report.messages("frequency.mode").len(), 2);
        assert!(report.messages("name").is_empty());

        let fields: Vec<&str> = report.fields().collect();
        assert_eq!(fields, vec!["command", "frequency.mode"]);
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_validation_report_serializes_as_field_map() {
        let mut report = ValidationReport::new();
        report.push("name", "required");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({"name": ["required"]}));
    }
}
