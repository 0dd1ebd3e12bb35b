use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, Utc};
use clap::Subcommand;
use serde::Serialize;
use tracing::{info, warn};

use task_console_config::AppConfig;
use task_console_domain::{
    validate_draft, ConsoleError, CronPreview, TaskDescriptor, TaskDraft, TaskTimeZone,
    ValidationReport,
};
use task_console_session::{
    BindableNodeDirectory, FileNodeDirectory, JsonWriterSubmitter, TaskModalSession,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 输出新建任务的默认草稿
    Defaults,
    /// 由已有任务记录生成可编辑草稿
    Edit {
        /// 已有任务记录 (JSON)
        #[arg(short, long)]
        existing: PathBuf,
    },
    /// 验证草稿
    Validate {
        /// 草稿文件 (TOML/JSON)
        #[arg(short, long)]
        draft: PathBuf,
    },
    /// 验证并输出提交载荷，不提交
    Build {
        #[arg(short, long)]
        draft: PathBuf,
        /// 编辑模式下的已有任务记录 (JSON)
        #[arg(short, long)]
        existing: Option<PathBuf>,
    },
    /// 验证、构建并写出提交载荷
    Submit {
        #[arg(short, long)]
        draft: PathBuf,
        #[arg(short, long)]
        existing: Option<PathBuf>,
        /// 载荷输出文件，默认写到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 列出可绑定节点
    Nodes,
    /// 预览CRON表达式的触发时间
    Preview {
        #[arg(long)]
        cron: String,
        /// local 或 utc
        #[arg(long, default_value = "local")]
        time_zone: TaskTimeZone,
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
}

/// 命令执行器
pub struct ConsoleApp {
    config: AppConfig,
}

impl ConsoleApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Defaults => self.print(TaskModalSession::open_create().draft()),
            Commands::Edit { existing } => {
                let session = TaskModalSession::open_edit(load_descriptor(&existing)?);
                self.print(session.draft())
            }
            Commands::Validate { draft } => {
                let draft = load_draft(&draft)?;
                validate_draft(&draft).map_err(report_error)?;
                println!("草稿验证通过");
                Ok(())
            }
            Commands::Build { draft, existing } => {
                let session = self.open_session(&draft, existing.as_deref())?;
                let payload = session.preview_payload().map_err(report_error)?;
                self.print(&payload)
            }
            Commands::Submit {
                draft,
                existing,
                output,
            } => self.submit(&draft, existing.as_deref(), output.as_deref()).await,
            Commands::Nodes => self.nodes().await,
            Commands::Preview {
                cron,
                time_zone,
                count,
            } => preview(&cron, time_zone, count),
        }
    }

    fn open_session(&self, draft: &Path, existing: Option<&Path>) -> Result<TaskModalSession> {
        let draft = load_draft(draft)?;
        let mut session = match existing {
            Some(path) => TaskModalSession::open_edit(load_descriptor(path)?),
            None => TaskModalSession::open_create(),
        }
        .with_history_limit(self.config.console.history_limit);
        session.update(|_| draft)?;
        Ok(session)
    }

    async fn submit(
        &self,
        draft: &Path,
        existing: Option<&Path>,
        output: Option<&Path>,
    ) -> Result<()> {
        let mut session = self.open_session(draft, existing)?;

        if let Some(nodes_file) = &self.config.console.nodes_file {
            let directory = FileNodeDirectory::new(nodes_file);
            if session.refresh_bindings(&directory).await? {
                let known: Vec<i64> = session.candidates().iter().map(|node| node.id).collect();
                for id in &session.draft().binding_ids {
                    if !known.contains(id) {
                        warn!("绑定节点 {} 不在可绑定节点列表中", id);
                    }
                }
            }
        }

        let writer: Box<dyn Write + Send> = match output {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("创建输出文件失败: {}", path.display()))?,
            ),
            None => Box::new(io::stdout()),
        };
        let submitter = JsonWriterSubmitter::new(writer).pretty(self.config.console.pretty_output);

        let outcome = session.confirm(&submitter).await.map_err(|e| match e {
            ConsoleError::Validation(report) => report_error(report),
            other => anyhow::Error::new(other).context("任务提交失败"),
        })?;
        info!("提交完成: {:?}", outcome);
        Ok(())
    }

    async fn nodes(&self) -> Result<()> {
        let nodes_file = self
            .config
            .console
            .nodes_file
            .as_deref()
            .ok_or_else(|| anyhow!("未配置可绑定节点文件 (console.nodes_file)"))?;

        let nodes = FileNodeDirectory::new(nodes_file)
            .fetch_bindable_nodes()
            .await
            .context("获取可绑定节点失败")?;
        self.print(&nodes)
    }

    fn print<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let encoded = if self.config.console.pretty_output {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .context("序列化输出失败")?;
        println!("{encoded}");
        Ok(())
    }
}

fn preview(cron: &str, time_zone: TaskTimeZone, count: usize) -> Result<()> {
    let preview = CronPreview::new(cron)?;
    println!("{}", preview.expression());
    for time in preview.upcoming(time_zone, Utc::now(), count) {
        match time_zone {
            TaskTimeZone::Local => println!("{}", time.with_timezone(&Local).to_rfc3339()),
            TaskTimeZone::Utc => println!("{}", time.to_rfc3339()),
        }
    }
    Ok(())
}

/// 按扩展名读取草稿：`.toml` 为TOML，其余按JSON解析
fn load_draft(path: &Path) -> Result<TaskDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取草稿文件失败: {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).with_context(|| format!("解析TOML草稿失败: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("解析JSON草稿失败: {}", path.display()))
    }
}

fn load_descriptor(path: &Path) -> Result<TaskDescriptor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取任务记录失败: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("解析任务记录失败: {}", path.display()))
}

fn report_error(report: ValidationReport) -> anyhow::Error {
    for (field, messages) in report.iter() {
        eprintln!("{field}: {}", messages.join("; "));
    }
    anyhow!("草稿验证失败，共 {} 个字段无效", report.len())
}

#[cfg(test)]
mod app_tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::Builder;

    #[test]
    fn test_load_draft_from_toml() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
name = "backup"
description = "nightly backup"
command = "backup.sh"
cron_expression = "0 0 2 * *"
tag = ["prod"]

[frequency]
mode = 2
time_zone = 2

[frequency.extend]
count = 3
"#
        )
        .unwrap();

        let draft = load_draft(file.path()).unwrap();
        assert_eq!(draft.name, "backup");
        assert_eq!(draft.frequency.extend.count, "3");
        assert_eq!(draft.frequency.time_zone, Some(TaskTimeZone::Utc));
        assert_eq!(draft.timeout, Some(300));
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn test_load_draft_from_json() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "a", "frequency": {{"mode": 1, "time_zone": 1, "extend": {{"count": "abc"}}}}}}"#)
            .unwrap();

        let draft = load_draft(file.path()).unwrap();
        assert_eq!(draft.name, "a");
        assert_eq!(draft.frequency.extend.count, "abc");
    }

    #[test]
    fn test_load_descriptor_accepts_legacy_field() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"id": 5, "name": "t", "frequency": "{{\"extend\":{{\"count\":1}},\"mode\":3,\"time_zone\":1}}", "maximun_parallel_runnable_num": 4, "tag": "a,b", "status": 1}}"#
        )
        .unwrap();

        let descriptor = load_descriptor(file.path()).unwrap();
        assert_eq!(descriptor.id, Some(5));
        assert_eq!(descriptor.maximum_parallel_runnable_num, 4);
    }

    #[test]
    fn test_open_session_for_edit_keeps_id() {
        let mut draft_file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            draft_file,
            r#"{{"name": "n", "description": "d", "command": "c"}}"#
        )
        .unwrap();
        let mut existing_file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(existing_file, r#"{{"id": 9, "name": "old", "created_time": "2021-01-01"}}"#).unwrap();

        let app = ConsoleApp::new(AppConfig::default());
        let session = app
            .open_session(draft_file.path(), Some(existing_file.path()))
            .unwrap();
        let payload = session.preview_payload().unwrap();

        assert_eq!(payload.task.id, Some(9));
        assert_eq!(payload.task.name, "n");
        assert_eq!(payload.task.extra["created_time"], "2021-01-01");
    }

    #[test]
    fn test_preview_rejects_invalid_cron() {
        assert!(preview("not a cron", TaskTimeZone::Utc, 3).is_err());
        assert!(preview("0 0 12 * * ?", TaskTimeZone::Utc, 2).is_ok());
    }
}
