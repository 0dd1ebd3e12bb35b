//! 字符串编码字段的编解码
//!
//! 调度服务以扁平字符串保存 `frequency` 和 `tag`，内部则始终使用结构化类型。
//! 这里是两者之间唯一的转换边界。

use serde_json::{json, Value};
use task_console_errors::{ConsoleError, ConsoleResult};

use crate::models::Frequency;

pub const TAG_SEPARATOR: &str = ",";

/// 编码为 `{"extend":{"count":N},"mode":M,"time_zone":Z}`，缺失的模式或时区省略
pub fn encode_frequency(frequency: &Frequency) -> String {
    let mut value = json!({
        "extend": { "count": frequency.extend.count },
    });
    if let Some(mode) = frequency.mode {
        value["mode"] = json!(u8::from(mode));
    }
    if let Some(time_zone) = frequency.time_zone {
        value["time_zone"] = json!(u8::from(time_zone));
    }
    value.to_string()
}

pub fn decode_frequency(raw: &str) -> ConsoleResult<Frequency> {
    serde_json::from_str::<Frequency>(raw)
        .map_err(|e| ConsoleError::invalid_frequency(raw, e.to_string()))
}

/// 以逗号连接标签
///
/// 编码不可逆的两种情况：空标签在解码时消失（`[""]` 解码为 `[]`），
/// 含逗号的标签解码后拆成多个。
pub fn encode_tags(tags: &[String]) -> String {
    tags.join(TAG_SEPARATOR)
}

/// 空字符串解码为空列表
pub fn decode_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(TAG_SEPARATOR).map(str::to_string).collect()
}

/// 从服务端记录的附加字段中读取绑定节点
pub fn decode_binding_ids(value: &Value) -> Option<Vec<i64>> {
    value
        .as_array()?
        .iter()
        .map(Value::as_i64)
        .collect::<Option<Vec<i64>>>()
}
