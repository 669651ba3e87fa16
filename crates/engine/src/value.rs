//! 值解析：命名值、`$var` 引用、任意值以及 `{0}`/`{1}` 模板

use gale_core::Config;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// `{1}` 或 `{1|default}`
static SECOND_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{1(?:\|([^}]*))?\}").expect("valid placeholder regex"));

/// 任意值中的 `{key}`
static REGISTRY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid registry key regex"));

/// `(label:value)` 或 `[label:value]`
static LABELED_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\(|\[)([\w-]+):(.+)(\)|\])$").expect("valid labeled value regex")
});

/// 单个任意值内注册表替换的最大轮数（自引用的值也能结束）
const MAX_SUBSTITUTION_PASSES: usize = 8;

const ESCAPED_UNDERSCORE: &str = "\u{0}";

/// 从类名中捕获的原始模板输入
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueInput<'a> {
    pub value: &'a str,
    pub unit: &'a str,
    pub second_value: Option<&'a str>,
    pub second_unit: Option<&'a str>,
}

/// 单个 utility-type 的值解析器
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver<'a> {
    config: &'a Config,
    utility: &'a str,
    group: Option<&'a str>,
}

impl<'a> ValueResolver<'a> {
    pub fn new(config: &'a Config, utility: &'a str, group: Option<&'a str>) -> Self {
        Self {
            config,
            utility,
            group,
        }
    }

    /// 计算最终的 CSS 值
    ///
    /// 按顺序，第一个适用的规则生效：
    /// 1. 空值 → 空字符串
    /// 2. group 或 utility-type 作用域下的命名值
    /// 3. 全局命名值
    /// 4. `$name` → `var(--name)`
    /// 5. `[...]`、`(...)`、`{...}` → 任意值
    /// 6. `value + unit`
    pub fn resolve(&self, raw: &str, unit: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        if let Some(named) = self.lookup(raw, unit) {
            return named.to_string();
        }

        if let Some(name) = raw.strip_prefix('$') {
            return format!("var(--{})", name);
        }

        if let Some(inner) = unwrap_arbitrary(raw) {
            return self.resolve_arbitrary(inner);
        }

        format!("{}{}", raw, unit)
    }

    /// 命名值查找，先查 `value+unit`（如 `2xl`），再查 `value`
    fn lookup(&self, raw: &str, unit: &str) -> Option<&'a str> {
        let joined = format!("{}{}", raw, unit);
        let mut keys = vec![raw];
        if !unit.is_empty() {
            keys.insert(0, joined.as_str());
        }

        let scopes = self.group.into_iter().chain(std::iter::once(self.utility));
        for scope in scopes {
            for key in &keys {
                if let Some(v) = self.config.scoped_value(scope, key) {
                    return Some(v);
                }
            }
        }

        keys.iter().find_map(|key| self.config.global_value(key))
    }

    /// 已去掉外层括号的任意值内容
    pub fn resolve_arbitrary(&self, inner: &str) -> String {
        let text = underscores_to_spaces(inner);

        if REGISTRY_KEY.is_match(&text) {
            return self.substitute_keys(text);
        }

        if text.starts_with("--") {
            return format!("var({})", text);
        }

        text
    }

    /// `(label:value)` 中的值
    ///
    /// 命名值和 `$` 引用照常解析，其余按任意值文本处理。
    pub fn resolve_inline(&self, inner: &str) -> String {
        if inner.starts_with('$') || self.lookup(inner, "").is_some() {
            self.resolve(inner, "")
        } else {
            self.resolve_arbitrary(inner)
        }
    }

    /// 用注册表中的值替换 `{key}`，找不到的保持原样
    fn substitute_keys(&self, mut text: String) -> String {
        for _ in 0..MAX_SUBSTITUTION_PASSES {
            let next = REGISTRY_KEY
                .replace_all(&text, |caps: &regex::Captures| {
                    let key = &caps[1];
                    self.config
                        .scoped_value(self.utility, key)
                        .or_else(|| self.config.global_value(key))
                        .map(str::to_string)
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned();
            if next == text {
                break;
            }
            text = next;
        }
        text
    }

    /// 解析模板的第二个值（`{1}`）
    ///
    /// 方括号形式的第二个值按字面文本透传。
    pub fn resolve_second(&self, raw: &str, unit: Option<&str>) -> String {
        if raw.starts_with('[') {
            return unwrap_arbitrary(raw)
                .map(underscores_to_spaces)
                .unwrap_or_else(|| raw.to_string());
        }
        self.resolve(raw, unit.unwrap_or_default())
    }

    /// 将值模板应用到类名的原始输入
    ///
    /// ```
    /// use gale_core::Config;
    /// use gale_engine::value::{ValueInput, ValueResolver};
    ///
    /// let config = Config::new();
    /// let values = ValueResolver::new(&config, "m", None);
    /// let input = ValueInput { value: "10", ..Default::default() };
    /// assert_eq!(values.parse_value_pattern("{0}px", &input), "10px");
    /// assert_eq!(values.parse_value_pattern("{0}px || auto", &ValueInput::default()), "auto");
    /// ```
    pub fn parse_value_pattern(&self, pattern: &str, input: &ValueInput<'_>) -> String {
        if !is_template(pattern) {
            return pattern.to_string();
        }
        let primary = self.resolve(input.value, input.unit);
        let second = input
            .second_value
            .map(|sec| self.resolve_second(sec, input.second_unit));
        fill_pattern(pattern, &primary, second.as_deref())
    }
}

/// 文本是否使用了模板语法
pub fn is_template(pattern: &str) -> bool {
    pattern.contains("{0}") || pattern.contains("{1") || pattern.contains("||")
}

/// 将已解析的值代入模板
///
/// - 没有 `{0}`、`{1` 或 `||` → 模板是常量
/// - 主值为空 → `||` 之后的默认值，没有则为前半部分
/// - `{1}` 且没有第二个值 → `||` 默认值，没有则为去掉占位符的前半部分
/// - `{1|literal}` 且没有第二个值 → `literal`
pub fn fill_pattern(pattern: &str, primary: &str, second: Option<&str>) -> String {
    if !is_template(pattern) {
        return pattern.to_string();
    }

    let (head, fallback) = match pattern.split_once("||") {
        Some((head, fallback)) => (head.trim(), Some(fallback.trim())),
        None => (pattern.trim(), None),
    };

    if primary.is_empty() {
        return fallback.unwrap_or(head).to_string();
    }

    let mut out = head.replace("{0}", primary);

    if SECOND_PLACEHOLDER.is_match(&out) {
        out = match second {
            Some(second) => SECOND_PLACEHOLDER
                .replace_all(&out, NoExpand(second))
                .into_owned(),
            None => {
                let has_inline_default = SECOND_PLACEHOLDER
                    .captures(&out)
                    .is_some_and(|caps| caps.get(1).is_some());
                if !has_inline_default {
                    if let Some(fallback) = fallback {
                        return fallback.to_string();
                    }
                }
                SECOND_PLACEHOLDER
                    .replace_all(&out, |caps: &regex::Captures| {
                        caps.get(1)
                            .map(|m| m.as_str().to_string())
                            .unwrap_or_default()
                    })
                    .into_owned()
            }
        };
        out = out.trim().to_string();
    }

    out
}

/// 去掉一层 `[...]`、`(...)` 或 `{...}`
pub fn unwrap_arbitrary(raw: &str) -> Option<&str> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .or_else(|| raw.strip_prefix('(').and_then(|s| s.strip_suffix(')')))
        .or_else(|| raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')))?;
    Some(inner)
}

/// `_` → 空格，`\_` → 下划线本身
pub fn underscores_to_spaces(text: &str) -> String {
    text.replace("\\_", ESCAPED_UNDERSCORE)
        .replace('_', " ")
        .replace(ESCAPED_UNDERSCORE, "_")
}

/// 拆分 `(label:value)` / `[label:value]`
pub fn extract_label(raw: &str) -> Option<(&str, &str)> {
    let caps = LABELED_VALUE.captures(raw)?;
    let key = caps.get(2)?.as_str();
    let value = caps.get(3)?.as_str();
    Some((key, value))
}
