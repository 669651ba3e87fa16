use crate::variant::VariantResolver;
use gale_core::merge::merge_declarations;
use gale_core::types::format_block;
use gale_core::Declaration;
use gale_parse::escape;
use indexmap::IndexMap;

/// CSS 类上下文 - 收集某个选择器类名的所有声明
///
/// 按变体前缀分组，相同前缀的声明合并到一起。别名生成的上下文使用嵌套输出，
/// 变体规则写在基础规则内部（`&:hover { ... }`）。
#[derive(Debug, Clone)]
pub struct ClassContext {
    /// 未转义的类名
    pub class_name: String,
    /// 是否以 CSS 嵌套形式输出
    pub nested: bool,
    /// prefix -> declarations，`None` 为基础规则
    groups: IndexMap<Option<String>, Vec<Declaration>>,
}

impl ClassContext {
    pub fn new(class_name: impl Into<String>, nested: bool) -> Self {
        Self {
            class_name: class_name.into(),
            nested,
            groups: IndexMap::new(),
        }
    }

    /// 写入声明到指定的前缀组
    pub fn write(&mut self, prefix: Option<&str>, declarations: Vec<Declaration>) {
        self.groups
            .entry(prefix.map(str::to_string))
            .or_default()
            .extend(declarations);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    pub fn selector(&self) -> String {
        format!(".{}", escape(&self.class_name))
    }

    /// 生成 CSS 规则
    ///
    /// 平铺模式下每个前缀组一条规则；嵌套模式下只有一条规则。
    /// 变体无法解析的组会被丢弃。
    pub fn to_css(&self, variants: &VariantResolver<'_>) -> Vec<String> {
        if self.nested {
            return self.to_nested_css(variants).into_iter().collect();
        }

        let selector = self.selector();
        let mut rules = Vec::new();

        for (prefix, decls) in &self.groups {
            if decls.is_empty() {
                continue;
            }
            let block = format_block(&merge_declarations(decls.iter().cloned()));

            let rule = match prefix {
                None => Some(format!("{} {{ {} }}", selector, block)),
                Some(prefix) => variants
                    .resolve(prefix)
                    .and_then(|wrapper| wrapper.wrap_flat(&selector, &block)),
            };

            match rule {
                Some(rule) => rules.push(rule),
                None => log::debug!("dropped `{}` group of `{}`", prefix.as_deref().unwrap_or_default(), self.class_name),
            }
        }

        rules
    }

    fn to_nested_css(&self, variants: &VariantResolver<'_>) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(decls) = self.groups.get(&None) {
            if !decls.is_empty() {
                parts.push(format_block(&merge_declarations(decls.iter().cloned())));
            }
        }

        for (prefix, decls) in &self.groups {
            let Some(prefix) = prefix else { continue };
            if decls.is_empty() {
                continue;
            }
            let block = format_block(&merge_declarations(decls.iter().cloned()));
            match variants
                .resolve(prefix)
                .and_then(|wrapper| wrapper.wrap_nested(&block))
            {
                Some(nested) => parts.push(nested),
                None => log::debug!("dropped `{}` group of alias `{}`", prefix, self.class_name),
            }
        }

        if parts.is_empty() {
            return None;
        }
        Some(format!("{} {{ {} }}", self.selector(), parts.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gale_core::{Breakpoint, Config};
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        Config::new()
            .with_breakpoint(Breakpoint::min("md", 768.0))
            .with_variant("hover", "&:hover")
    }

    #[test]
    fn test_flat_base_rule() {
        let config = config();
        let mut ctx = ClassContext::new("bg-red", false);
        ctx.write(None, vec![Declaration::new("background", "red")]);
        assert_eq!(
            ctx.to_css(&VariantResolver::new(&config)),
            vec![".bg-red { background: red; }"]
        );
    }

    #[test]
    fn test_flat_breakpoint_rule() {
        let config = config();
        let mut ctx = ClassContext::new("md:bg-blue", false);
        ctx.write(Some("md"), vec![Declaration::new("background", "blue")]);
        assert_eq!(
            ctx.to_css(&VariantResolver::new(&config)),
            vec!["@media (min-width: 768px) { .md\\:bg-blue { background: blue; } }"]
        );
    }

    #[test]
    fn test_nested_alias_rule() {
        let config = config();
        let mut ctx = ClassContext::new("btn", true);
        ctx.write(None, vec![Declaration::new("background", "red")]);
        ctx.write(Some("hover"), vec![Declaration::new("background", "blue")]);
        ctx.write(None, vec![Declaration::new("margin", "10px")]);
        assert_eq!(
            ctx.to_css(&VariantResolver::new(&config)),
            vec![".btn { background: red; margin: 10px; &:hover { background: blue; } }"]
        );
    }

    #[test]
    fn test_later_declaration_wins() {
        let config = config();
        let mut ctx = ClassContext::new("x", true);
        ctx.write(None, vec![Declaration::new("color", "red")]);
        ctx.write(None, vec![Declaration::new("margin", "0")]);
        ctx.write(None, vec![Declaration::new("color", "blue")]);
        assert_eq!(
            ctx.to_css(&VariantResolver::new(&config)),
            vec![".x { color: blue; margin: 0; }"]
        );
    }

    #[test]
    fn test_unknown_variant_group_dropped() {
        let config = config();
        let mut ctx = ClassContext::new("nope:bg-red", false);
        ctx.write(Some("nope"), vec![Declaration::new("background", "red")]);
        assert!(ctx.to_css(&VariantResolver::new(&config)).is_empty());
        assert!(!ctx.is_empty());
    }
}
