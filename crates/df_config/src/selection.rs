// crates/df_config/src/selection.rs

//! 算例与时间步选择
//!
//! - [`PatternSelection`]: 批处理的模式编号集合，如 `1-5`、`1,3,5`、`2`
//! - [`TimeStepSelector`]: `latest` 或具体时间目录名，如 `5`、`0.5`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 模式编号集合（升序、去重）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct PatternSelection {
    ids: Vec<u32>,
}

impl PatternSelection {
    /// 从编号列表创建，自动排序去重
    pub fn new(mut ids: Vec<u32>) -> Result<Self, ConfigError> {
        if ids.is_empty() {
            return Err(ConfigError::invalid("patterns", "[]", "至少需要一个模式编号"));
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(Self { ids })
    }

    /// 闭区间 `first..=last`
    pub fn range(first: u32, last: u32) -> Result<Self, ConfigError> {
        if first > last {
            return Err(ConfigError::invalid(
                "patterns",
                format!("{first}-{last}"),
                "区间起点大于终点",
            ));
        }
        Self::new((first..=last).collect())
    }

    /// 编号（升序）
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// 数量
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// 是否为空（构造保证非空）
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for PatternSelection {
    fn default() -> Self {
        Self {
            ids: (1..=5).collect(),
        }
    }
}

impl TryFrom<Vec<u32>> for PatternSelection {
    type Error = ConfigError;

    fn try_from(ids: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(ids)
    }
}

impl From<PatternSelection> for Vec<u32> {
    fn from(sel: PatternSelection) -> Self {
        sel.ids
    }
}

impl FromStr for PatternSelection {
    type Err = ConfigError;

    /// 支持 `3`、`1-5`、`1,3,5` 以及混合写法 `1-3,7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_id = |t: &str| {
            t.trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::invalid("patterns", s, format!("无效编号 '{}'", t.trim())))
        };

        let mut ids = Vec::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            match part.split_once('-') {
                Some((a, b)) => {
                    let (first, last) = (parse_id(a)?, parse_id(b)?);
                    ids.extend(Self::range(first, last)?.ids);
                }
                None => ids.push(parse_id(part)?),
            }
        }
        Self::new(ids)
    }
}

impl fmt::Display for PatternSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ids.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// 时间步选择器
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeStepSelector {
    /// 数值最大的时间目录
    #[default]
    Latest,
    /// 指定目录名
    Named(String),
}

impl FromStr for TimeStepSelector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err(ConfigError::invalid("time_step", s, "不能为空"));
        }
        if t.eq_ignore_ascii_case("latest") {
            Ok(Self::Latest)
        } else {
            Ok(Self::Named(t.to_string()))
        }
    }
}

impl TryFrom<String> for TimeStepSelector {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeStepSelector> for String {
    fn from(sel: TimeStepSelector) -> Self {
        sel.to_string()
    }
}

impl fmt::Display for TimeStepSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_range() {
        let sel: PatternSelection = "1-5".parse().unwrap();
        assert_eq!(sel.ids(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_pattern_list_sorted_dedup() {
        let sel: PatternSelection = "5,1,3,3".parse().unwrap();
        assert_eq!(sel.ids(), &[1, 3, 5]);
        assert_eq!(sel.to_string(), "1,3,5");
    }

    #[test]
    fn test_pattern_mixed() {
        let sel: PatternSelection = "1-3,7".parse().unwrap();
        assert_eq!(sel.ids(), &[1, 2, 3, 7]);
    }

    #[test]
    fn test_pattern_invalid() {
        assert!("".parse::<PatternSelection>().is_err());
        assert!("a-3".parse::<PatternSelection>().is_err());
        assert!("5-1".parse::<PatternSelection>().is_err());
    }

    #[test]
    fn test_time_step_selector() {
        assert_eq!("latest".parse::<TimeStepSelector>().unwrap(), TimeStepSelector::Latest);
        assert_eq!(
            "0.5".parse::<TimeStepSelector>().unwrap(),
            TimeStepSelector::Named("0.5".into())
        );
        assert!(" ".parse::<TimeStepSelector>().is_err());
    }

    #[test]
    fn test_selector_serde() {
        let json = serde_json::to_string(&TimeStepSelector::Named("5".into())).unwrap();
        assert_eq!(json, "\"5\"");
        let sel: PatternSelection = serde_json::from_str("[3,1]").unwrap();
        assert_eq!(sel.ids(), &[1, 3]);
    }
}
