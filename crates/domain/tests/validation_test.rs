#[cfg(test)]
mod validation_tests {
    use task_console_domain::{validate_draft, FrequencyDraft, TaskDraft};

    fn complete_draft() -> TaskDraft {
        TaskDraft {
            name: "demo".to_string(),
            description: "this is a command line".to_string(),
            command: "echo 'hello world';".to_string(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn test_complete_draft_is_valid() {
        assert!(validate_draft(&complete_draft()).is_ok());
    }

    #[test]
    fn test_default_draft_reports_every_missing_text_field() {
        let report = validate_draft(&TaskDraft::default()).unwrap_err();
        let fields: Vec<&str> = report.fields().collect();
        assert_eq!(fields, vec!["command", "description", "name"]);
        assert_eq!(report.messages("name"), ["任务名称必须填写".to_string()]);
    }

    #[test]
    fn test_two_missing_fields_are_both_reported() {
        let draft = TaskDraft {
            name: String::new(),
            timeout: None,
            ..complete_draft()
        };
        let report = validate_draft(&draft).unwrap_err();
        assert_eq!(report.len(), 2);
        assert!(report.has_field("name"));
        assert!(report.has_field("timeout"));
        assert_eq!(report.messages("timeout"), ["超时时间必须填写".to_string()]);
    }

    #[test]
    fn test_missing_frequency_fields_use_dotted_paths() {
        let draft = TaskDraft {
            frequency: FrequencyDraft {
                mode: None,
                time_zone: None,
                ..FrequencyDraft::default()
            },
            ..complete_draft()
        };
        let report = validate_draft(&draft).unwrap_err();
        assert!(report.has_field("frequency.mode"));
        assert!(report.has_field("frequency.time_zone"));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_unparsable_count_is_not_a_validation_failure() {
        let mut draft = complete_draft();
        draft.frequency.extend.count = "abc".to_string();
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn test_empty_cron_expression_is_required() {
        let draft = TaskDraft {
            cron_expression: String::new(),
            ..complete_draft()
        };
        let report = validate_draft(&draft).unwrap_err();
        assert!(report.has_field("cron_expression"));
    }

    #[test]
    fn test_numeric_domains_are_not_clamped() {
        let cases: [(&str, TaskDraft); 8] = [
            ("timeout", TaskDraft { timeout: Some(9), ..complete_draft() }),
            ("timeout", TaskDraft { timeout: Some(10001), ..complete_draft() }),
            ("retry_times", TaskDraft { retry_times: Some(0), ..complete_draft() }),
            ("retry_times", TaskDraft { retry_times: Some(101), ..complete_draft() }),
            ("retry_interval", TaskDraft { retry_interval: Some(5), ..complete_draft() }),
            ("retry_interval", TaskDraft { retry_interval: Some(20000), ..complete_draft() }),
            (
                "maximum_parallel_runnable_num",
                TaskDraft { maximum_parallel_runnable_num: Some(0), ..complete_draft() },
            ),
            (
                "maximum_parallel_runnable_num",
                TaskDraft { maximum_parallel_runnable_num: Some(10001), ..complete_draft() },
            ),
        ];

        for (field, draft) in cases {
            let report = validate_draft(&draft).unwrap_err();
            assert_eq!(report.fields().collect::<Vec<_>>(), vec![field]);
        }
    }

    #[test]
    fn test_numeric_domain_bounds_are_inclusive() {
        let draft = TaskDraft {
            timeout: Some(10),
            retry_times: Some(100),
            retry_interval: Some(10000),
            maximum_parallel_runnable_num: Some(1),
            ..complete_draft()
        };
        assert!(validate_draft(&draft).is_ok());
    }
}
