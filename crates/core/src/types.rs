use serde::{Deserialize, Serialize};

/// CSS 声明
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    /// CSS 属性名（如 "padding"、"--bg-opacity"）
    pub property: String,
    /// CSS 属性值（如 "10px"）
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    /// 从完整的 `property: value` 文本解析声明
    ///
    /// 冒号前后的空白会被去除，末尾的分号会被忽略。
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().trim_end_matches(';');
        let (property, value) = text.split_once(':')?;
        let property = property.trim();
        if property.is_empty() {
            return None;
        }
        Some(Self::new(property, value.trim()))
    }

    /// 输出 `property: value`（不含分号）
    pub fn to_css(&self) -> String {
        format!("{}: {}", self.property, self.value)
    }
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// Joins declarations the way they appear inside a rule block:
/// `a: 1; b: 2;`
pub fn format_block(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|decl| format!("{};", decl))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 响应式断点
///
/// `min` 与 `max` 至少存在一个，单位为像素。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Breakpoint {
    pub fn min(name: impl Into<String>, min: f64) -> Self {
        Self {
            name: name.into(),
            min: Some(min),
            max: None,
        }
    }

    pub fn max(name: impl Into<String>, max: f64) -> Self {
        Self {
            name: name.into(),
            min: None,
            max: Some(max),
        }
    }

    pub fn range(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether a viewport of `width` pixels falls inside this breakpoint.
    ///
    /// Both bounds are inclusive.
    pub fn matches(&self, width: f64) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= width && width <= max,
            (Some(min), None) => width >= min,
            (None, Some(max)) => width <= max,
            (None, None) => false,
        }
    }

    /// Media condition for this breakpoint, e.g.
    /// `(min-width: 768px) and (max-width: 1023px)`.
    pub fn media_condition(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(format!(
                "(min-width: {}px) and (max-width: {}px)",
                format_number(min),
                format_number(max)
            )),
            (Some(min), None) => Some(format!("(min-width: {}px)", format_number(min))),
            (None, Some(max)) => Some(format!("(max-width: {}px)", format_number(max))),
            (None, None) => None,
        }
    }
}

/// Prints a float without a trailing `.0` for whole numbers.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
