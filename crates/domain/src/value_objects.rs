use serde::{Deserialize, Serialize};
use std::fmt;

/// 任务运行模式，线上以整数编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FrequencyMode {
    Once = 1,
    CountDown = 2,
    Repeat = 3,
}

impl From<FrequencyMode> for u8 {
    fn from(mode: FrequencyMode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for FrequencyMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FrequencyMode::Once),
            2 => Ok(FrequencyMode::CountDown),
            3 => Ok(FrequencyMode::Repeat),
            other => Err(format!("无效的运行模式: {other}，只能是 1、2 或 3")),
        }
    }
}

impl fmt::Display for FrequencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyMode::Once => write!(f, "Once"),
            FrequencyMode::CountDown => write!(f, "CountDown"),
            FrequencyMode::Repeat => write!(f, "Repeat"),
        }
    }
}

/// 调度时区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskTimeZone {
    Local = 1,
    Utc = 2,
}

impl From<TaskTimeZone> for u8 {
    fn from(zone: TaskTimeZone) -> Self {
        zone as u8
    }
}

impl TryFrom<u8> for TaskTimeZone {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskTimeZone::Local),
            2 => Ok(TaskTimeZone::Utc),
            other => Err(format!("无效的时区: {other}，只能是 1 或 2")),
        }
    }
}

impl std::str::FromStr for TaskTimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "1" => Ok(TaskTimeZone::Local),
            "utc" | "2" => Ok(TaskTimeZone::Utc),
            _ => Err(format!("Invalid time zone: {s}. Valid values: local, utc")),
        }
    }
}

impl fmt::Display for TaskTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskTimeZone::Local => write!(f, "Local"),
            TaskTimeZone::Utc => write!(f, "Utc"),
        }
    }
}

/// 任务启用状态：1 未启用，2 启用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    Disabled = 1,
    #[default]
    Enabled = 2,
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskStatus::Disabled),
            2 => Ok(TaskStatus::Enabled),
            other => Err(format!("无效的任务状态: {other}，只能是 1 或 2")),
        }
    }
}

impl TaskStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, TaskStatus::Enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_encode_as_integers() {
        assert_eq!(serde_json::to_string(&FrequencyMode::CountDown).unwrap(), "2");
        assert_eq!(serde_json::to_string(&TaskTimeZone::Utc).unwrap(), "2");
        assert_eq!(serde_json::to_string(&TaskStatus::Disabled).unwrap(), "1");
    }

    #[test]
    fn test_enums_reject_unknown_codes() {
        assert!(serde_json::from_str::<FrequencyMode>("4").is_err());
        assert!(serde_json::from_str::<TaskTimeZone>("0").is_err());
        assert!(serde_json::from_str::<TaskStatus>("3").is_err());
        assert_eq!(
            serde_json::from_str::<FrequencyMode>("1").unwrap(),
            FrequencyMode::Once
        );
    }

    #[test]
    fn test_time_zone_from_str() {
        assert_eq!("UTC".parse::<TaskTimeZone>().unwrap(), TaskTimeZone::Utc);
        assert_eq!("local".parse::<TaskTimeZone>().unwrap(), TaskTimeZone::Local);
        assert!("mars".parse::<TaskTimeZone>().is_err());
    }

    #[test]
    fn test_default_status_is_enabled() {
        assert!(TaskStatus::default().is_enabled());
        assert!(!TaskStatus::Disabled.is_enabled());
    }
}
