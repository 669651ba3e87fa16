use crate::pattern::{ClassPattern, PatternError};
use crate::types::ParsedClass;
use gale_core::Config;
use std::collections::HashSet;

/// 类名解析器
///
/// 持有根据配置构建的正则和命名类集合。构建后只读，可在线程间共享。
#[derive(Debug, Clone)]
pub struct ClassParser {
    pattern: ClassPattern,
    named: HashSet<String>,
    reserved: Vec<char>,
}

impl ClassParser {
    /// 为配置中的所有 utility-type 和命名类构建解析器，safelist 作为低优先级的候选类型
    pub fn new(config: &Config) -> Result<Self, PatternError> {
        let named: HashSet<String> = config
            .classes
            .values()
            .flat_map(|bucket| bucket.keys().cloned())
            .collect();

        let types = config
            .property
            .keys()
            .map(String::as_str)
            .chain(named.iter().map(String::as_str));
        let pattern = ClassPattern::build(types, config.safelist.iter().map(String::as_str))?;

        Ok(Self {
            pattern,
            named,
            reserved: config.reserved_variant_chars.clone(),
        })
    }

    pub fn pattern(&self) -> &ClassPattern {
        &self.pattern
    }

    /// 解析单个 class-name
    ///
    /// 1. 整个类名（或冒号后的尾部）是已注册的命名类 → 直接返回，值为空
    /// 2. 否则使用正则拆分
    /// 3. 都不匹配 → None
    ///
    /// ```
    /// use gale_core::Config;
    /// use gale_parse::ClassParser;
    ///
    /// let config = Config::new().with_property("bg", gale_core::PropertyDescriptor::Property("background".into()));
    /// let parser = ClassParser::new(&config).unwrap();
    /// let parsed = parser.parse("hover:bg-red-500/40").unwrap();
    /// assert_eq!(parsed.prefix.as_deref(), Some("hover"));
    /// assert_eq!(parsed.utility, "bg");
    /// assert_eq!(parsed.value, "red-500");
    /// assert_eq!(parsed.second_value.as_deref(), Some("40"));
    /// ```
    pub fn parse(&self, class_name: &str) -> Option<ParsedClass> {
        if class_name.is_empty() {
            return None;
        }

        if let Some(parsed) = self.parse_named(class_name) {
            return Some(parsed);
        }

        let mut m = self.pattern.captures(class_name);
        // 保留字符不作为前缀分隔：整个类名不拆前缀再匹配一次
        if m.as_ref().and_then(|m| m.prefix).is_some_and(|prefix| self.is_reserved(prefix)) {
            m = self.pattern.captures_unprefixed(class_name);
        }
        let Some(m) = m else {
            log::debug!("no pattern match for `{}`", class_name);
            return None;
        };

        let mut parsed = ParsedClass::new(class_name, m.utility).with_value(m.value, m.unit);
        if let Some(prefix) = m.prefix {
            parsed = parsed.with_prefix(prefix);
        }
        if let Some(second) = m.second_value {
            parsed = parsed.with_second(second, m.second_unit.map(str::to_string));
        }
        Some(parsed)
    }

    /// 在正则拆分之前按字面查找命名类
    fn parse_named(&self, class_name: &str) -> Option<ParsedClass> {
        if self.named.contains(class_name) {
            return Some(ParsedClass::new(class_name, class_name));
        }

        let (prefix, tail) = split_variant(class_name)?;
        if self.named.contains(tail) && !self.is_reserved(prefix) {
            return Some(ParsedClass::new(class_name, tail).with_prefix(prefix));
        }
        None
    }

    fn is_reserved(&self, prefix: &str) -> bool {
        prefix.chars().any(|c| self.reserved.contains(&c))
    }
}

/// 在括号外的最后一个冒号处拆分 `prefix:rest`
pub fn split_variant(class_name: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    let mut split = None;

    for (i, ch) in class_name.char_indices() {
        match ch {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth -= 1,
            ':' if depth == 0 => split = Some(i),
            _ => {}
        }
    }

    let i = split?;
    let (prefix, rest) = (&class_name[..i], &class_name[i + 1..]);
    if prefix.is_empty() || rest.is_empty() {
        return None;
    }
    Some((prefix, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gale_core::PropertyDescriptor;

    fn parser() -> ClassParser {
        let config = Config::new()
            .with_property("p", PropertyDescriptor::Property("padding".into()))
            .with_property("pt", PropertyDescriptor::Property("padding-top".into()))
            .with_property("bg", PropertyDescriptor::Property("background".into()))
            .with_property("i", PropertyDescriptor::Property("inset".into()))
            .with_class("alignItems", "items-center", "center")
            .with_class("display", "flex", "flex");
        ClassParser::new(&config).unwrap()
    }

    #[test]
    fn test_simple_class() {
        let parsed = parser().parse("bg-red").unwrap();
        assert_eq!(parsed.utility, "bg");
        assert_eq!(parsed.value, "red");
        assert_eq!(parsed.unit, "");
        assert_eq!(parsed.prefix, None);
        assert_eq!(parsed.raw, "bg-red");
    }

    #[test]
    fn test_longest_match_priority() {
        let parsed = parser().parse("pt-4px").unwrap();
        assert_eq!(parsed.utility, "pt");
        assert_eq!(parsed.value, "4");
        assert_eq!(parsed.unit, "px");
    }

    #[test]
    fn test_named_class_short_circuit() {
        let parsed = parser().parse("items-center").unwrap();
        assert_eq!(parsed.utility, "items-center");
        assert_eq!(parsed.value, "");
    }

    #[test]
    fn test_named_class_with_prefix() {
        let parsed = parser().parse("md:flex").unwrap();
        assert_eq!(parsed.prefix.as_deref(), Some("md"));
        assert_eq!(parsed.utility, "flex");
    }

    #[test]
    fn test_named_class_with_trailing_suffix() {
        // longest named class wins over `i` + `tems-center-hehe`
        let parsed = parser().parse("items-center-hehe").unwrap();
        assert_eq!(parsed.utility, "items-center");
        assert_eq!(parsed.value, "hehe");
    }

    #[test]
    fn test_unknown_class() {
        assert!(parser().parse("color-red").is_none());
        assert!(parser().parse("").is_none());
    }

    #[test]
    fn test_reserved_variant_chars() {
        let config = Config::new()
            .with_property("bg", PropertyDescriptor::Property("background".into()))
            .with_reserved_variant_chars(['@']);
        let parser = ClassParser::new(&config).unwrap();
        assert!(parser.parse("@md:bg-red").is_none());
        assert!(parser.parse("md:bg-red").is_some());
    }

    #[test]
    fn test_reserved_char_keeps_class_whole() {
        let config = Config::new()
            .with_property("bg", PropertyDescriptor::Property("background".into()))
            .with_safelist(["@md:bg"]);

        let parsed = ClassParser::new(&config).unwrap().parse("@md:bg").unwrap();
        assert_eq!(parsed.prefix.as_deref(), Some("@md"));
        assert_eq!(parsed.utility, "bg");

        let config = config.with_reserved_variant_chars(['@']);
        let parsed = ClassParser::new(&config).unwrap().parse("@md:bg").unwrap();
        assert_eq!(parsed.prefix, None);
        assert_eq!(parsed.utility, "@md:bg");
    }

    #[test]
    fn test_split_variant() {
        assert_eq!(split_variant("hover:flex"), Some(("hover", "flex")));
        assert_eq!(split_variant("(&:hover):flex"), Some(("(&:hover)", "flex")));
        assert_eq!(split_variant("flex"), None);
        assert_eq!(split_variant(":flex"), None);
    }
}
