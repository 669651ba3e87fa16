use serde::{Deserialize, Serialize};

/// 解析后的 class-name
///
/// 由解析器创建，随即交给解析/求值阶段消费，不做持久化。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedClass {
    /// 变体前缀（如 "hover"、"md"、"max-[600px]"），不含冒号
    pub prefix: Option<String>,

    /// utility-type（如 "bg"、"pt"、"[padding,margin]"），或命名类本身
    pub utility: String,

    /// 主值（如 "red-500"、"10"、"[1px_solid]"），无值时为空
    pub value: String,

    /// 主值单位（如 "px"），无单位时为空
    pub unit: String,

    /// `/` 之后的第二个值（如 "40"）
    pub second_value: Option<String>,

    /// 第二个值的单位
    pub second_unit: Option<String>,

    /// 原始 class-name
    pub raw: String,
}

impl ParsedClass {
    pub fn new(raw: impl Into<String>, utility: impl Into<String>) -> Self {
        Self {
            prefix: None,
            utility: utility.into(),
            value: String::new(),
            unit: String::new(),
            second_value: None,
            second_unit: None,
            raw: raw.into(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>, unit: impl Into<String>) -> Self {
        self.value = value.into();
        self.unit = unit.into();
        self
    }

    pub fn with_second(mut self, value: impl Into<String>, unit: Option<String>) -> Self {
        self.second_value = Some(value.into());
        self.second_unit = unit;
        self
    }

    /// Whether the utility is a `[prop1,prop2]` direct property list.
    pub fn is_property_list(&self) -> bool {
        self.utility.starts_with('[') && self.utility.ends_with(']')
    }

    /// class-name without its variant prefix
    pub fn base(&self) -> &str {
        match &self.prefix {
            Some(prefix) => self
                .raw
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix(':'))
                .unwrap_or(&self.raw),
            None => &self.raw,
        }
    }
}
