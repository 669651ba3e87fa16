//! 变体前缀 → 选择器 / at-rule 包装
//!
//! 查找顺序：配置的变体、断点、内置伪类、媒体状态、参数化变体。

use crate::value::{underscores_to_spaces, unwrap_arbitrary};
use gale_core::Config;
use phf::{phf_map, phf_set};

/// 无需配置即可识别的伪类
static PSEUDO_CLASSES: phf::Set<&'static str> = phf_set! {
    "hover", "focus", "active", "visited", "target", "link",
    "focus-within", "focus-visible",
    "disabled", "enabled", "checked", "indeterminate", "default",
    "required", "optional", "valid", "invalid", "in-range", "out-of-range",
    "placeholder-shown", "autofill", "read-only", "read-write",
    "empty", "first-child", "last-child", "only-child",
    "first-of-type", "last-of-type", "only-of-type",
};

/// 简写 → 完整伪类
static PSEUDO_REMAP: phf::Map<&'static str, &'static str> = phf_map! {
    "first" => "first-child",
    "last" => "last-child",
    "only" => "only-child",
    "odd" => "nth-child(odd)",
    "even" => "nth-child(even)",
    "open" => "is([open], :popover-open)",
};

static PSEUDO_ELEMENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "before" => "before",
    "after" => "after",
    "placeholder" => "placeholder",
    "selection" => "selection",
    "marker" => "marker",
    "backdrop" => "backdrop",
    "first-line" => "first-line",
    "first-letter" => "first-letter",
    "file" => "file-selector-button",
};

/// 按名称使用的媒体特性
static MEDIA_STATES: phf::Map<&'static str, &'static str> = phf_map! {
    "dark" => "@media (prefers-color-scheme: dark)",
    "light" => "@media (prefers-color-scheme: light)",
    "motion-safe" => "@media (prefers-reduced-motion: no-preference)",
    "motion-reduce" => "@media (prefers-reduced-motion: reduce)",
    "contrast-more" => "@media (prefers-contrast: more)",
    "contrast-less" => "@media (prefers-contrast: less)",
    "portrait" => "@media (orientation: portrait)",
    "landscape" => "@media (orientation: landscape)",
    "print" => "@media print",
    "forced-colors" => "@media (forced-colors: active)",
    "pointer-fine" => "@media (pointer: fine)",
    "pointer-coarse" => "@media (pointer: coarse)",
};

/// 变体前缀对规则的包装方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapper {
    /// `.sel:name`
    PseudoClass(String),
    /// `&` 模板，`&` 代表选择器
    Selector(String),
    /// `@media ...`, `@container ...`, `@supports ...` prelude
    AtRule(String),
    /// 含 `@slot` 或 `@class` + `@rules` 标记的 at-rule 模板
    Template(String),
}

impl Wrapper {
    /// 包装为顶层规则
    ///
    /// `selector` 已转义且带前导 `.`。模板含 `@class` 但没有 `@rules` 时返回 `None`。
    ///
    /// ```
    /// use gale_engine::variant::Wrapper;
    ///
    /// let hover = Wrapper::PseudoClass("hover".into());
    /// assert_eq!(
    ///     hover.wrap_flat(".hover\\:bg-blue", "background: blue;").unwrap(),
    ///     ".hover\\:bg-blue:hover { background: blue; }"
    /// );
    /// ```
    pub fn wrap_flat(&self, selector: &str, block: &str) -> Option<String> {
        match self {
            Wrapper::PseudoClass(name) => Some(format!("{}:{} {{ {} }}", selector, name, block)),
            Wrapper::Selector(template) => {
                Some(format!("{} {{ {} }}", template.replace('&', selector), block))
            }
            Wrapper::AtRule(prelude) => {
                Some(format!("{} {{ {} {{ {} }} }}", prelude, selector, block))
            }
            Wrapper::Template(template) => {
                fill_template(template, selector, &format!("{} {{ {} }}", selector, block), block)
            }
        }
    }

    /// 包装为父规则内的嵌套块（CSS nesting）
    pub fn wrap_nested(&self, block: &str) -> Option<String> {
        match self {
            Wrapper::PseudoClass(name) => Some(format!("&:{} {{ {} }}", name, block)),
            Wrapper::Selector(template) => Some(format!("{} {{ {} }}", template, block)),
            Wrapper::AtRule(prelude) => Some(format!("{} {{ {} }}", prelude, block)),
            Wrapper::Template(template) => fill_template(template, "&", block, block),
        }
    }
}

/// 填充 at-rule 模板
///
/// - `@slot`：整条规则（选择器 + 声明块）
/// - `@class` + `@rules`：分别填入选择器和声明
/// - 只有 `@rules`：同 `@slot`，声明不能脱离选择器单独出现
fn fill_template(template: &str, selector: &str, rule: &str, block: &str) -> Option<String> {
    if template.contains("@slot") {
        return Some(template.replace("@slot", rule));
    }
    if template.contains("@class") {
        if !template.contains("@rules") {
            log::debug!("variant template `{}` has @class without @rules", template);
            return None;
        }
        return Some(template.replace("@class", selector).replace("@rules", block));
    }
    Some(template.replace("@rules", rule))
}

/// 变体解析器
#[derive(Debug, Clone, Copy)]
pub struct VariantResolver<'a> {
    config: &'a Config,
}

impl<'a> VariantResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn resolve(&self, prefix: &str) -> Option<Wrapper> {
        if let Some(template) = self.config.variants.get(prefix) {
            return Some(configured(template));
        }

        if let Some(bp) = self.config.breakpoint(prefix) {
            return bp
                .media_condition()
                .map(|condition| Wrapper::AtRule(format!("@media {}", condition)));
        }

        if PSEUDO_CLASSES.contains(prefix) {
            return Some(Wrapper::PseudoClass(prefix.to_string()));
        }
        if let Some(css) = PSEUDO_REMAP.get(prefix) {
            return Some(Wrapper::PseudoClass(css.to_string()));
        }
        if let Some(css) = PSEUDO_ELEMENTS.get(prefix) {
            return Some(Wrapper::Selector(format!("&::{}", css)));
        }
        if let Some(rule) = MEDIA_STATES.get(prefix) {
            return Some(Wrapper::AtRule(rule.to_string()));
        }

        if let Some(wrapper) = self.parameterized(prefix) {
            return Some(wrapper);
        }

        if let Some(inner) = unwrap_arbitrary(prefix) {
            return Some(arbitrary(inner));
        }

        log::debug!("unknown variant prefix `{}`", prefix);
        None
    }

    /// `not-[..]`, `has-[..]`, `nth-(..)`, `min-[..]`, `max-[..]`,
    /// `@min-[..]`, `@max-[..]`, `@<breakpoint>`, `supports-[..]`
    fn parameterized(&self, prefix: &str) -> Option<Wrapper> {
        if let Some(name) = prefix.strip_prefix('@') {
            if let Some(arg) = argument(name, "min-") {
                return Some(Wrapper::AtRule(format!("@container (min-width: {})", arg)));
            }
            if let Some(arg) = argument(name, "max-") {
                return Some(Wrapper::AtRule(format!("@container (max-width: {})", arg)));
            }
            let condition = self.config.breakpoint(name)?.media_condition()?;
            return Some(Wrapper::AtRule(format!("@container {}", condition)));
        }

        let pseudo_fns = [
            ("not-", "not"),
            ("has-", "has"),
            ("nth-last-", "nth-last-child"),
            ("nth-", "nth-child"),
        ];
        for (head, css) in pseudo_fns {
            if let Some(arg) = argument(prefix, head) {
                return Some(Wrapper::PseudoClass(format!("{}({})", css, arg)));
            }
        }

        if let Some(arg) = argument(prefix, "min-") {
            return Some(Wrapper::AtRule(format!("@media (min-width: {})", arg)));
        }
        if let Some(arg) = argument(prefix, "max-") {
            return Some(Wrapper::AtRule(format!("@media (max-width: {})", arg)));
        }
        if let Some(arg) = argument(prefix, "supports-") {
            return Some(Wrapper::AtRule(format!("@supports ({})", arg)));
        }
        None
    }
}

/// `head[..]` / `head(..)` 的参数，下划线转为空格
fn argument(prefix: &str, head: &str) -> Option<String> {
    let rest = prefix.strip_prefix(head)?;
    if !(rest.starts_with('[') || rest.starts_with('(')) {
        return None;
    }
    unwrap_arbitrary(rest).map(underscores_to_spaces)
}

fn configured(template: &str) -> Wrapper {
    let template = template.trim();
    if template.starts_with('@') {
        if template.contains("@slot") || template.contains("@class") || template.contains("@rules") {
            return Wrapper::Template(template.to_string());
        }
        return Wrapper::AtRule(template.to_string());
    }
    if template.contains('&') {
        return Wrapper::Selector(template.to_string());
    }
    if template.starts_with(':') {
        return Wrapper::Selector(format!("&{}", template));
    }
    Wrapper::PseudoClass(template.to_string())
}

/// 单独的 `[..]`、`(..)` 或 `{..}` 前缀
fn arbitrary(inner: &str) -> Wrapper {
    let text = underscores_to_spaces(inner);
    if text.starts_with('@') {
        return Wrapper::AtRule(text);
    }
    if text.contains('&') {
        Wrapper::Selector(text)
    } else {
        Wrapper::Selector(format!("&{}", text))
    }
}
