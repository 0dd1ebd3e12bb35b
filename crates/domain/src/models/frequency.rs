use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::value_objects::{FrequencyMode, TaskTimeZone};

/// 规范化后的频率配置
///
/// 提交给调度服务时整体编码为一个 JSON 字符串（见 [`crate::codec::encode_frequency`]）。
/// 未经验证的草稿可能缺少运行模式或时区，此时对应字段在编码结果中省略。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    #[serde(default)]
    pub extend: FrequencyExtend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<FrequencyMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TaskTimeZone>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyExtend {
    /// 运行次数，仅在 CountDown 模式下有意义
    ///
    /// 存量记录中可能是负数或文本，解码时按 [`normalize_count`] 取值，不影响其余字段。
    #[serde(default, deserialize_with = "stored_count")]
    pub count: u32,
}

impl Default for Frequency {
    fn default() -> Self {
        Self {
            extend: FrequencyExtend { count: 1 },
            mode: Some(FrequencyMode::Repeat),
            time_zone: Some(TaskTimeZone::Local),
        }
    }
}

/// 表单中的频率输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FrequencyDraft {
    #[serde(default)]
    #[validate(required(message = "请选择运行模式"))]
    pub mode: Option<FrequencyMode>,
    #[serde(default)]
    #[validate(required(message = "请选择时区"))]
    pub time_zone: Option<TaskTimeZone>,
    #[serde(default)]
    pub extend: ExtendDraft,
}

/// 运行次数的原始输入
///
/// 输入框允许任意文本；数字和字符串都按文本保存，规范化时再解析。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendDraft {
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: String,
}

impl ExtendDraft {
    pub fn new<S: Into<String>>(count: S) -> Self {
        Self {
            count: count.into(),
        }
    }
}

impl FrequencyDraft {
    /// 解析运行次数并生成规范化的频率配置，从不失败
    pub fn normalized(&self) -> Frequency {
        Frequency {
            extend: FrequencyExtend {
                count: normalize_count(&self.extend.count),
            },
            mode: self.mode,
            time_zone: self.time_zone,
        }
    }
}

impl Default for FrequencyDraft {
    fn default() -> Self {
        FrequencyDraft::from(&Frequency::default())
    }
}

impl From<&Frequency> for FrequencyDraft {
    fn from(frequency: &Frequency) -> Self {
        Self {
            mode: frequency.mode,
            time_zone: frequency.time_zone,
            extend: ExtendDraft::new(frequency.extend.count.to_string()),
        }
    }
}

/// 将运行次数输入解析为非负整数
///
/// 去掉首尾空白后取可选符号与紧随其后的数字前缀（`"5 runs"` 取 5，`"3.5"` 取 3）。
/// 没有数字前缀、负数或超出范围时取 0。
pub fn normalize_count(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];

    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawCount {
    fn into_text(raw: Option<RawCount>) -> String {
        match raw {
            Some(RawCount::Integer(count)) => count.to_string(),
            Some(RawCount::Float(count)) => count.to_string(),
            Some(RawCount::Text(text)) => text,
            Some(RawCount::Other(_)) | None => String::new(),
        }
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawCount::into_text(Option::<RawCount>::deserialize(
        deserializer,
    )?))
}

fn stored_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_count(deserializer).map(|text| normalize_count(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_count() {
        assert_eq!(normalize_count("7"), 7);
        assert_eq!(normalize_count(" 12 "), 12);
        assert_eq!(normalize_count("abc"), 0);
        assert_eq!(normalize_count(""), 0);
        assert_eq!(normalize_count("-3"), 0);
        assert_eq!(normalize_count("99999999999"), 0);
    }

    #[test]
    fn test_normalize_count_takes_leading_digits() {
        assert_eq!(normalize_count("5 runs"), 5);
        assert_eq!(normalize_count("3.5"), 3);
        assert_eq!(normalize_count("+4"), 4);
        assert_eq!(normalize_count("-3 runs"), 0);
        assert_eq!(normalize_count("runs 5"), 0);
        assert_eq!(normalize_count("-"), 0);
    }

    #[test]
    fn test_stored_count_is_decoded_leniently() {
        let frequency: Frequency =
            serde_json::from_str(r#"{"extend":{"count":-3},"mode":1,"time_zone":2}"#).unwrap();
        assert_eq!(frequency.extend.count, 0);
        assert_eq!(frequency.mode, Some(FrequencyMode::Once));
        assert_eq!(frequency.time_zone, Some(TaskTimeZone::Utc));

        let frequency: Frequency =
            serde_json::from_str(r#"{"extend":{"count":"7"},"mode":2,"time_zone":1}"#).unwrap();
        assert_eq!(frequency.extend.count, 7);

        let frequency: Frequency =
            serde_json::from_str(r#"{"extend":{"count":2.5},"mode":2,"time_zone":1}"#).unwrap();
        assert_eq!(frequency.extend.count, 2);
    }

    #[test]
    fn test_count_accepts_numbers_and_text() {
        let draft: FrequencyDraft =
            serde_json::from_str(r#"{"mode": 2, "time_zone": 1, "extend": {"count": 5}}"#)
                .unwrap();
        assert_eq!(draft.extend.count, "5");

        let draft: FrequencyDraft =
            serde_json::from_str(r#"{"mode": 2, "time_zone": 1, "extend": {"count": "abc"}}"#)
                .unwrap();
        assert_eq!(draft.extend.count, "abc");
        assert_eq!(draft.normalized().extend.count, 0);

        let draft: FrequencyDraft =
            serde_json::from_str(r#"{"mode": 2, "extend": {"count": null}}"#).unwrap();
        assert_eq!(draft.extend.count, "");
        assert!(draft.time_zone.is_none());
    }

    #[test]
    fn test_default_frequency() {
        let draft = FrequencyDraft::default();
        assert_eq!(draft.mode, Some(FrequencyMode::Repeat));
        assert_eq!(draft.time_zone, Some(TaskTimeZone::Local));
        assert_eq!(draft.extend.count, "1");
        assert_eq!(draft.normalized(), Frequency::default());
    }
}
