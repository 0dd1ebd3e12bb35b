use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// 管理台会话相关配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// 可绑定节点列表文件（JSON数组，元素为 `{id, title}`）
    #[serde(default)]
    pub nodes_file: Option<String>,
    /// 输出的提交载荷是否格式化
    #[serde(default)]
    pub pretty_output: bool,
    /// 编辑历史（撤销）保留的最大条数
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    32
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            nodes_file: None,
            pretty_output: false,
            history_limit: default_history_limit(),
        }
    }
}

impl ConsoleConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_limit == 0 {
            return Err(ConfigError::Validation(
                "history_limit must be greater than 0".to_string(),
            ));
        }

        if let Some(path) = &self.nodes_file {
            if path.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "nodes_file cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
