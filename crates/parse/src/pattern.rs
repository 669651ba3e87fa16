//! 构建将类名拆分为 `[prefix:]type[-value[unit]][/second[unit]]` 的正则

use regex::{Captures, Regex};

/// 带符号小数：`10`、`-4`、`1.5`、`.5`
pub const NUMBER: &str = r"-?\d*\.?\d+";
/// 含连字符、不含点的单词：`red-500`、`auto`
pub const WORD: &str = r"[\w-]+";
pub const HEX: &str = r"#[0-9a-fA-F]+";
/// `[...]`，单层
pub const BRACKET: &str = r"\[[^\]]+\]";
/// `{...}`，允许一层嵌套
pub const BRACE: &str = r"\{(?:[^{}]|\{[^{}]*\})*\}";
/// `(...)`，允许一层嵌套
pub const PAREN: &str = r"\((?:[^()]|\([^()]*\))*\)";
/// `$name`，遇到空白或 `/` 结束
pub const VARIABLE: &str = r"\$[^\s/]+";
pub const UNIT: &str = r"[a-zA-Z%]+";

/// 模式构建错误
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("failed to compile class pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// 值的候选分支，按匹配优先级排列：
/// number > word > hex > bracket > brace > paren > `$token`
fn value_pattern() -> String {
    format!("(?:{NUMBER}|{WORD}|{HEX}|{BRACKET}|{BRACE}|{PAREN}|{VARIABLE})")
}

/// 前缀的候选分支：
/// - 带括号参数的 token（`max-[600px]`、`nth-(3)`）
/// - 单独的括号（`(&:hover)`）
/// - 普通 token（`hover`、`@md`）
fn prefix_pattern() -> String {
    format!(r"[\w@-]*(?:{BRACKET}|{PAREN}|{BRACE})|[\w@-]+")
}

/// 按长度降序拼接为候选分支
///
/// 正则优先选择靠前且能完整匹配的分支，所以 `pt` 必须排在 `p` 之前。
fn alternation<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut tokens: Vec<&str> = tokens.into_iter().filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return None;
    }
    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    tokens.dedup();
    Some(
        tokens
            .into_iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|"),
    )
}

/// 编译后的类名正则
#[derive(Debug, Clone)]
pub struct ClassPattern {
    regex: Regex,
    /// 同一正则去掉前缀分组
    bare: Regex,
}

/// 单个类名捕获到的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    pub prefix: Option<&'a str>,
    pub utility: &'a str,
    pub value: &'a str,
    pub unit: &'a str,
    pub second_value: Option<&'a str>,
    pub second_unit: Option<&'a str>,
}

impl ClassPattern {
    /// 由 utility-type 名称和命名类名称构建正则
    ///
    /// `fallback`（safelist）仅在已注册类型都无法匹配时尝试。
    pub fn build<'a, T, F>(types: T, fallback: F) -> Result<Self, PatternError>
    where
        T: IntoIterator<Item = &'a str>,
        F: IntoIterator<Item = &'a str>,
    {
        let mut type_branches = Vec::new();
        if let Some(primary) = alternation(types) {
            type_branches.push(primary);
        }
        type_branches.push(BRACKET.to_string());
        if let Some(extra) = alternation(fallback) {
            type_branches.push(extra);
        }

        let value = value_pattern();
        let body = format!(
            r"(?P<type>{types})(?:-(?P<value>{value})(?P<unit>{UNIT})?)?(?:/(?P<second>{value})(?P<second_unit>{UNIT})?)?$",
            types = type_branches.join("|"),
        );
        let source = format!(r"^(?:(?P<prefix>{prefix}):)?{body}", prefix = prefix_pattern());

        log::debug!("class pattern rebuilt ({} bytes)", source.len());

        Ok(Self {
            regex: Regex::new(&source)?,
            bare: Regex::new(&format!("^{}", body))?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// 匹配单个类名
    pub fn captures<'a>(&self, class_name: &'a str) -> Option<PatternMatch<'a>> {
        let caps = self.regex.captures(class_name)?;
        Some(PatternMatch::from_captures(&caps))
    }

    /// 不拆分变体前缀，整个类名按 `type-value` 匹配
    pub fn captures_unprefixed<'a>(&self, class_name: &'a str) -> Option<PatternMatch<'a>> {
        let caps = self.bare.captures(class_name)?;
        Some(PatternMatch::from_captures(&caps))
    }
}

impl<'a> PatternMatch<'a> {
    fn from_captures(caps: &Captures<'a>) -> Self {
        let get = |name: &str| caps.name(name).map(|m| m.as_str());
        Self {
            prefix: get("prefix"),
            utility: get("type").unwrap_or_default(),
            value: get("value").unwrap_or_default(),
            unit: get("unit").unwrap_or_default(),
            second_value: get("second"),
            second_unit: get("second_unit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(types: &[&str]) -> ClassPattern {
        ClassPattern::build(types.iter().copied(), std::iter::empty()).unwrap()
    }

    #[test]
    fn test_longest_type_wins() {
        let p = pattern(&["p", "pt", "m", "mx"]);

        let m = p.captures("pt-4px").unwrap();
        assert_eq!(m.utility, "pt");
        assert_eq!(m.value, "4");
        assert_eq!(m.unit, "px");

        let m = p.captures("mx-4").unwrap();
        assert_eq!(m.utility, "mx");
    }

    #[test]
    fn test_word_value() {
        let p = pattern(&["bg"]);
        let m = p.captures("bg-red-500").unwrap();
        assert_eq!(m.value, "red-500");
        assert_eq!(m.unit, "");
        assert_eq!(m.second_value, None);
    }

    #[test]
    fn test_second_value() {
        let p = pattern(&["bg"]);
        let m = p.captures("bg-red-500/40").unwrap();
        assert_eq!(m.value, "red-500");
        assert_eq!(m.second_value, Some("40"));
        assert_eq!(m.second_unit, None);

        let m = p.captures("bg-red/50pct").unwrap();
        assert_eq!(m.second_value, Some("50"));
        assert_eq!(m.second_unit, Some("pct"));
    }

    #[test]
    fn test_decimal_and_negative_numbers() {
        let p = pattern(&["m"]);
        let m = p.captures("m-1.5rem").unwrap();
        assert_eq!((m.value, m.unit), ("1.5", "rem"));

        let m = p.captures("m--4px").unwrap();
        assert_eq!((m.value, m.unit), ("-4", "px"));
    }

    #[test]
    fn test_hex_and_variable_values() {
        let p = pattern(&["bg"]);
        assert_eq!(p.captures("bg-#ff0000").unwrap().value, "#ff0000");
        assert_eq!(p.captures("bg-$brand").unwrap().value, "$brand");
    }

    #[test]
    fn test_arbitrary_values() {
        let p = pattern(&["w", "grid"]);
        assert_eq!(p.captures("w-[calc(100%_-_2px)]").unwrap().value, "[calc(100%_-_2px)]");
        assert_eq!(
            p.captures("grid-(repeat(3,1fr))").unwrap().value,
            "(repeat(3,1fr))"
        );
        // 圆括号只允许一层嵌套
        assert!(p.captures("grid-(repeat(3,minmax(0,1fr)))").is_none());
        assert_eq!(p.captures("w-{{size}_*_2}").unwrap().value, "{{size}_*_2}");
    }

    #[test]
    fn test_bare_type_without_value() {
        let p = pattern(&["hidden"]);
        let m = p.captures("hidden").unwrap();
        assert_eq!(m.utility, "hidden");
        assert_eq!(m.value, "");
    }

    #[test]
    fn test_prefix_forms() {
        let p = pattern(&["bg"]);
        assert_eq!(p.captures("hover:bg-red").unwrap().prefix, Some("hover"));
        assert_eq!(
            p.captures("max-[600px]:bg-red").unwrap().prefix,
            Some("max-[600px]")
        );
        assert_eq!(p.captures("nth-(3):bg-red").unwrap().prefix, Some("nth-(3)"));
        assert_eq!(
            p.captures("(&:hover):bg-red").unwrap().prefix,
            Some("(&:hover)")
        );
        assert_eq!(p.captures("@md:bg-red").unwrap().prefix, Some("@md"));
    }

    #[test]
    fn test_bracketed_property_list_type() {
        let p = pattern(&["bg"]);
        let m = p.captures("[padding,margin]-10px").unwrap();
        assert_eq!(m.utility, "[padding,margin]");
        assert_eq!((m.value, m.unit), ("10", "px"));
    }

    #[test]
    fn test_no_match() {
        let p = pattern(&["bg"]);
        assert!(p.captures("color-red").is_none());
        assert!(p.captures("bgx-red").is_none());
    }

    #[test]
    fn test_fallback_tokens_lose_to_types() {
        let p = ClassPattern::build(["bg"], ["bg-red", "card"]).unwrap();
        let m = p.captures("bg-red").unwrap();
        assert_eq!((m.utility, m.value), ("bg", "red"));

        let m = p.captures("card").unwrap();
        assert_eq!(m.utility, "card");
    }

    #[test]
    fn test_empty_registry_still_builds() {
        let p = pattern(&[]);
        assert!(p.captures("[color]-red").is_some());
        assert!(p.captures("bg-red").is_none());
    }
}
