//! 将解析后的类名映射为 CSS 声明

use crate::value::{extract_label, fill_pattern, ValueInput, ValueResolver};
use gale_core::case::camel_to_kebab;
use gale_core::{
    ConditionalDescriptor, Config, Declaration, PropertyDescriptor, PropertyParams,
    PropertyTarget, Syntax, ValueTemplate,
};
use gale_parse::ParsedClass;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// 属性字符串本身就是完整声明的标记
pub const DECLARATION_MARKER: &str = "value:";

static NUMBER_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:calc\(.*\)|-?\d*\.?\d+)$").expect("valid number regex"));

static SIZE_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^-?\d*\.?\d+(?:px|em|rem|%|ex|ch|vw|vh|vmin|vmax|svw|svh|lvw|lvh|dvw|dvh|cqw|cqh|cm|mm|in|pt|pc|q)$",
    )
    .expect("valid size regex")
});

/// 解析结果写入的 CSS
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rules", rename_all = "camelCase")]
pub enum CssRules {
    /// 单个属性，值在 [`ProcessedStyle::value`]
    Property(String),
    /// 多个属性共享 [`ProcessedStyle::value`]
    Properties(Vec<String>),
    /// 完整声明，[`ProcessedStyle::value`] 为 `None`
    Declarations(Vec<Declaration>),
}

/// 单个类名的解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedStyle {
    /// 用作选择器的类名（未转义）
    pub class_name: String,
    pub css_rules: CssRules,
    pub value: Option<String>,
    pub prefix: Option<String>,
    /// 由别名展开而来，`class_name` 为别名本身
    pub from_alias: bool,
}

impl ProcessedStyle {
    fn new(parsed: &ParsedClass, css_rules: CssRules, value: Option<String>) -> Self {
        Self {
            class_name: parsed.raw.clone(),
            css_rules,
            value,
            prefix: parsed.prefix.clone(),
            from_alias: false,
        }
    }

    /// 展开为 `property: value` 声明
    pub fn declarations(&self) -> Vec<Declaration> {
        let value = self.value.clone().unwrap_or_default();
        match &self.css_rules {
            CssRules::Property(p) => vec![Declaration::new(p.clone(), value)],
            CssRules::Properties(ps) => ps
                .iter()
                .map(|p| Declaration::new(p.clone(), value.clone()))
                .collect(),
            CssRules::Declarations(decls) => decls.clone(),
        }
    }
}

/// `value` 是否满足条件描述的语法
pub fn syntax_accepts(syntax: &Syntax, value: &str) -> bool {
    match syntax {
        Syntax::Number => NUMBER_SYNTAX.is_match(value),
        Syntax::Size => SIZE_SYNTAX.is_match(value),
        Syntax::Value => true,
        Syntax::OneOf(options) => options.iter().any(|o| o == value),
    }
}

/// 规则解析器
#[derive(Debug, Clone, Copy)]
pub struct RuleResolver<'a> {
    config: &'a Config,
}

impl<'a> RuleResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// 解析单个类名，`None` 表示不生成规则
    pub fn resolve(&self, parsed: &ParsedClass) -> Option<ProcessedStyle> {
        if parsed.is_property_list() {
            return self.resolve_property_list(parsed);
        }

        if self.config.is_named_class(&parsed.utility) {
            return self.process_custom_class(parsed);
        }

        let Some(descriptor) = self.config.property.get(&parsed.utility) else {
            log::debug!("unknown utility `{}` in `{}`", parsed.utility, parsed.raw);
            return None;
        };

        match descriptor {
            PropertyDescriptor::Conditional(entries) => self.resolve_conditional(parsed, entries),
            PropertyDescriptor::Template {
                property,
                value,
                group,
            } => {
                let values = ValueResolver::new(self.config, &parsed.utility, group.as_deref());
                let (params, resolved) = self.params(parsed, &values);
                emit(parsed, &values, property, value.as_ref(), &params, &resolved)
            }
            PropertyDescriptor::Property(p) => {
                let values = ValueResolver::new(self.config, &parsed.utility, None);
                let value = plain_value(parsed, &values);
                finish(parsed, vec![p.clone()], value)
            }
            PropertyDescriptor::Properties(ps) => {
                let values = ValueResolver::new(self.config, &parsed.utility, None);
                let value = plain_value(parsed, &values);
                finish(parsed, ps.clone(), value)
            }
            PropertyDescriptor::Func(f) => {
                let values = ValueResolver::new(self.config, &parsed.utility, None);
                let (mut params, _) = self.params(parsed, &values);
                params.resolved = plain_value(parsed, &values);
                let property = f(&params);
                finish(parsed, vec![property], params.resolved)
            }
        }
    }

    /// `[propA,--var,marginTop]-value`：每个条目使用同一个值
    fn resolve_property_list(&self, parsed: &ParsedClass) -> Option<ProcessedStyle> {
        let inner = &parsed.utility[1..parsed.utility.len() - 1];
        let values = ValueResolver::new(self.config, "", None);
        let value = values.resolve(&parsed.value, &parsed.unit);
        if value.is_empty() {
            log::debug!("`{}` has no value for its property list", parsed.raw);
            return None;
        }

        let declarations: Vec<Declaration> = inner
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .flat_map(|entry| self.list_entry_properties(entry))
            .map(|property| Declaration::new(property, value.clone()))
            .collect();

        if declarations.is_empty() {
            return None;
        }
        Some(ProcessedStyle::new(
            parsed,
            CssRules::Declarations(declarations),
            None,
        ))
    }

    fn list_entry_properties(&self, entry: &str) -> Vec<String> {
        if entry.starts_with("--") {
            return vec![entry.to_string()];
        }
        match self.config.property.get(entry) {
            Some(PropertyDescriptor::Property(p)) => vec![camel_to_kebab(p)],
            Some(PropertyDescriptor::Properties(ps)) => ps.iter().map(|p| camel_to_kebab(p)).collect(),
            Some(PropertyDescriptor::Template {
                property: PropertyTarget::Name(p),
                ..
            }) => vec![camel_to_kebab(p)],
            Some(PropertyDescriptor::Template {
                property: PropertyTarget::Names(ps),
                ..
            }) => ps.iter().map(|p| camel_to_kebab(p)).collect(),
            _ => vec![camel_to_kebab(entry)],
        }
    }

    /// 条件描述列表
    ///
    /// 有匹配的标签时只保留对应 `for` 的条目（强制接受），否则保留全部条目；
    /// `<value>` 语法排在最后，第一个语法接受该值的条目胜出。
    fn resolve_conditional(
        &self,
        parsed: &ParsedClass,
        entries: &[ConditionalDescriptor],
    ) -> Option<ProcessedStyle> {
        let values = ValueResolver::new(self.config, &parsed.utility, None);
        let (params, resolved) = self.params(parsed, &values);

        let labeled: Vec<&ConditionalDescriptor> = match params.key.as_deref() {
            Some(key) => entries
                .iter()
                .filter(|e| e.for_key.as_deref() == Some(key))
                .collect(),
            None => Vec::new(),
        };
        let label_matched = !labeled.is_empty();
        let mut candidates = if label_matched {
            labeled
        } else {
            entries.iter().collect()
        };

        // 稳定排序，各半内保持声明顺序
        candidates.sort_by_key(|e| e.syntax.is_catch_all());

        let Some(entry) = candidates
            .into_iter()
            .find(|e| label_matched || syntax_accepts(&e.syntax, &resolved))
        else {
            log::debug!("no conditional entry of `{}` accepts `{}`", parsed.utility, resolved);
            return None;
        };

        emit(parsed, &values, &entry.property, entry.value.as_ref(), &params, &resolved)
    }

    /// 命名类：每个包含该类名的 CSS 属性分组各生成一条声明
    fn process_custom_class(&self, parsed: &ParsedClass) -> Option<ProcessedStyle> {
        let values = ValueResolver::new(self.config, &parsed.utility, None);
        let input = ValueInput {
            value: &parsed.value,
            unit: &parsed.unit,
            second_value: parsed.second_value.as_deref(),
            second_unit: parsed.second_unit.as_deref(),
        };

        let declarations: Vec<Declaration> = self
            .config
            .named_class_templates(&parsed.utility)
            .map(|(property, template)| {
                Declaration::new(
                    camel_to_kebab(property),
                    values.parse_value_pattern(template, &input),
                )
            })
            .filter(|decl| !decl.value.is_empty())
            .collect();

        if declarations.is_empty() {
            return None;
        }
        Some(ProcessedStyle::new(
            parsed,
            CssRules::Declarations(declarations),
            None,
        ))
    }

    /// 构建函数参数和解析后的主值（处理内联的 `(label:value)`）
    fn params(&self, parsed: &ParsedClass, values: &ValueResolver<'_>) -> (PropertyParams, String) {
        let (key, raw, resolved) = match extract_label(&parsed.value) {
            Some((key, inner)) => (
                Some(key.to_string()),
                inner.to_string(),
                values.resolve_inline(inner),
            ),
            None => (
                None,
                parsed.value.clone(),
                values.resolve(&parsed.value, &parsed.unit),
            ),
        };

        let params = PropertyParams {
            value: raw,
            resolved: resolved.clone(),
            unit: parsed.unit.clone(),
            second_value: parsed.second_value.clone(),
            second_unit: parsed.second_unit.clone(),
            key,
        };
        (params, resolved)
    }
}

/// 计算属性目标和值模板
fn emit(
    parsed: &ParsedClass,
    values: &ValueResolver<'_>,
    target: &PropertyTarget,
    template: Option<&ValueTemplate>,
    params: &PropertyParams,
    resolved: &str,
) -> Option<ProcessedStyle> {
    let value = match template {
        Some(ValueTemplate::Pattern(pattern)) => {
            let second = params
                .second_value
                .as_deref()
                .map(|sec| values.resolve_second(sec, params.second_unit.as_deref()));
            fill_pattern(pattern, resolved, second.as_deref())
        }
        Some(ValueTemplate::Func(f)) => f(params),
        None => resolved.to_string(),
    };

    let properties = match target {
        PropertyTarget::Name(p) => vec![p.clone()],
        PropertyTarget::Names(ps) => ps.clone(),
        PropertyTarget::Func(f) => vec![f(params)],
    };
    finish(parsed, properties, value)
}

/// 无模板描述的值
///
/// 有第二个值时：两个无单位数字转为百分比（`1/2` → `50%`），
/// 其余转为 `color-mix()` 透明度。
fn plain_value(parsed: &ParsedClass, values: &ValueResolver<'_>) -> String {
    let resolved = values.resolve(&parsed.value, &parsed.unit);
    let Some(second) = parsed.second_value.as_deref() else {
        return resolved;
    };

    let second_unit = parsed.second_unit.as_deref().unwrap_or_default();
    if parsed.unit.is_empty() && second_unit.is_empty() {
        if let Some(percent) = fraction_percent(&parsed.value, second) {
            return percent;
        }
    }

    if resolved.is_empty() {
        return resolved;
    }

    let amount = if !second_unit.is_empty() {
        format!("{}{}", second, second_unit)
    } else if second.parse::<f64>().is_ok() {
        format!("{}%", second)
    } else {
        values.resolve_second(second, None)
    };
    format!("color-mix(in srgb, {} {}, transparent)", resolved, amount)
}

/// `1`/`2` → `50%`, `1`/`3` → `33.333333%`
fn fraction_percent(numerator: &str, denominator: &str) -> Option<String> {
    let n: f64 = numerator.parse().ok()?;
    let d: f64 = denominator.parse().ok()?;
    if d == 0.0 {
        return None;
    }
    let percent = format!("{:.6}", n / d * 100.0);
    let percent = percent.trim_end_matches('0').trim_end_matches('.');
    Some(format!("{}%", percent))
}

/// 由属性名和值生成结果，处理 `value:` 标记
fn finish(parsed: &ParsedClass, properties: Vec<String>, value: String) -> Option<ProcessedStyle> {
    if properties
        .iter()
        .any(|p| p.starts_with(DECLARATION_MARKER))
    {
        let declarations: Vec<Declaration> = properties
            .iter()
            .filter_map(|p| p.strip_prefix(DECLARATION_MARKER))
            .flat_map(|text| text.split(';'))
            .filter_map(Declaration::parse)
            .collect();
        if declarations.is_empty() {
            return None;
        }
        return Some(ProcessedStyle::new(
            parsed,
            CssRules::Declarations(declarations),
            None,
        ));
    }

    if value.is_empty() {
        log::debug!("`{}` resolved to an empty value", parsed.raw);
        return None;
    }

    let mut properties: Vec<String> = properties.iter().map(|p| camel_to_kebab(p)).collect();
    let rules = if properties.len() == 1 {
        CssRules::Property(properties.remove(0))
    } else {
        CssRules::Properties(properties)
    };
    Some(ProcessedStyle::new(parsed, rules, Some(value)))
}
