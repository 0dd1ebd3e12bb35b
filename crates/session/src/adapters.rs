use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use task_console_domain::SubmissionPayload;
use task_console_errors::{ConsoleError, ConsoleResult};

use crate::ports::{BindableNode, BindableNodeDirectory, SubmitOutcome, TaskSubmitter};

/// 固定的节点列表
#[derive(Debug, Clone, Default)]
pub struct StaticNodeDirectory {
    nodes: Vec<BindableNode>,
}

impl StaticNodeDirectory {
    pub fn new(nodes: Vec<BindableNode>) -> Self {
        Self { nodes }
    }
}

#[async_trait]
impl BindableNodeDirectory for StaticNodeDirectory {
    async fn fetch_bindable_nodes(&self) -> ConsoleResult<Vec<BindableNode>> {
        Ok(self.nodes.clone())
    }
}

/// 每次查询时读取 JSON 文件（`[{"id": 1, "title": "..."}]`）
#[derive(Debug, Clone)]
pub struct FileNodeDirectory {
    path: PathBuf,
}

impl FileNodeDirectory {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BindableNodeDirectory for FileNodeDirectory {
    async fn fetch_bindable_nodes(&self) -> ConsoleResult<Vec<BindableNode>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ConsoleError::node_lookup(format!("读取节点文件 {} 失败: {e}", self.path.display()))
        })?;
        let nodes: Vec<BindableNode> = serde_json::from_str(&content).map_err(|e| {
            ConsoleError::node_lookup(format!("解析节点文件 {} 失败: {e}", self.path.display()))
        })?;
        debug!("从 {} 读取到 {} 个可绑定节点", self.path.display(), nodes.len());
        Ok(nodes)
    }
}

/// 将每个提交载荷写为一行 JSON
///
/// 适用于把载荷交给外部传输工具（管道、文件）的场景，写入成功即视为接受。
pub struct JsonWriterSubmitter<W> {
    writer: Mutex<W>,
    pretty: bool,
}

impl<W: Write + Send> JsonWriterSubmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> ConsoleResult<W> {
        self.writer
            .into_inner()
            .map_err(|_| ConsoleError::Internal("载荷写入器锁已损坏".to_string()))
    }
}

#[async_trait]
impl<W: Write + Send> TaskSubmitter for JsonWriterSubmitter<W> {
    async fn submit(&self, payload: &SubmissionPayload) -> ConsoleResult<SubmitOutcome> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(payload)?
        } else {
            serde_json::to_string(payload)?
        };

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ConsoleError::Internal("载荷写入器锁已损坏".to_string()))?;
        writeln!(writer, "{encoded}").map_err(|e| ConsoleError::submission(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| ConsoleError::submission(e.to_string()))?;

        Ok(SubmitOutcome::Accepted)
    }
}
