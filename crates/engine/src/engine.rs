use crate::alias::expand_alias;
use crate::context::ClassContext;
use crate::dom::DomBinding;
use crate::rule::{ProcessedStyle, RuleResolver};
use crate::variant::VariantResolver;
use gale_core::normalize::normalize_classes;
use gale_core::{Config, ConfigError, PropertyDescriptor};
use gale_parse::{ClassParser, ParsedClass, PatternError};
use indexmap::IndexMap;

/// 引擎构建错误
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Input accepted wherever a list of class-names is expected: a
/// whitespace separated string or a list of such strings.
pub trait ClassList {
    /// Normalized tokens, duplicates removed, first-seen order kept.
    fn class_tokens(&self) -> Vec<String>;
}

impl ClassList for str {
    fn class_tokens(&self) -> Vec<String> {
        normalize_classes([self])
    }
}

impl ClassList for String {
    fn class_tokens(&self) -> Vec<String> {
        self.as_str().class_tokens()
    }
}

impl<S: AsRef<str>> ClassList for [S] {
    fn class_tokens(&self) -> Vec<String> {
        normalize_classes(self)
    }
}

impl<S: AsRef<str>> ClassList for Vec<S> {
    fn class_tokens(&self) -> Vec<String> {
        self.as_slice().class_tokens()
    }
}

impl<S: AsRef<str>, const N: usize> ClassList for [S; N] {
    fn class_tokens(&self) -> Vec<String> {
        self.as_slice().class_tokens()
    }
}

/// 原子类引擎
///
/// 持有只读配置和由配置构建的解析器，可在线程间共享。
/// 注册新的 utility 会消耗当前引擎并返回重新构建的引擎。
///
/// # 示例
///
/// ```
/// use gale_core::{Config, PropertyDescriptor};
/// use gale_engine::Engine;
///
/// let config = Config::new().with_property("bg", PropertyDescriptor::Property("background".into()));
/// let engine = Engine::new(config).unwrap();
/// assert_eq!(engine.render("bg-red"), ".bg-red { background: red; }");
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    parser: ClassParser,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        let parser = ClassParser::new(&config)?;
        Ok(Self { config, parser })
    }

    /// 从 JSON 配置创建引擎
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Self::new(Config::from_json(json)?)
    }

    /// Registers a utility-type and rebuilds the pattern.
    pub fn with_property(
        self,
        name: impl Into<String>,
        descriptor: PropertyDescriptor,
    ) -> Result<Self, EngineError> {
        Self::new(self.config.with_property(name, descriptor))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn parser(&self) -> &ClassParser {
        &self.parser
    }

    pub fn parse(&self, class_name: &str) -> Option<ParsedClass> {
        self.parser.parse(class_name)
    }

    pub fn expand_alias(&self, name: &str) -> Vec<String> {
        expand_alias(&self.config.aliases, name)
    }

    /// Resolves a single class-name, without alias expansion.
    pub fn resolve(&self, class_name: &str) -> Option<ProcessedStyle> {
        let parsed = self.parse(class_name)?;
        let style = RuleResolver::new(&self.config).resolve(&parsed)?;
        log::trace!("{} -> {:?}", class_name, style.css_rules);
        Some(style)
    }

    /// Resolves every class-name of the list. Aliases expand into styles
    /// that keep the alias as their class-name. Unresolvable class-names
    /// are dropped.
    pub fn process<C: ClassList + ?Sized>(&self, classes: &C) -> Vec<ProcessedStyle> {
        self.process_tokens(classes.class_tokens())
    }

    fn process_tokens(&self, tokens: Vec<String>) -> Vec<ProcessedStyle> {
        let mut styles = Vec::new();
        for token in tokens {
            if !self.config.aliases.contains_key(&token) {
                styles.extend(self.resolve(&token));
                continue;
            }
            for expanded in self.expand_alias(&token) {
                if let Some(mut style) = self.resolve(&expanded) {
                    style.class_name = token.clone();
                    style.from_alias = true;
                    styles.push(style);
                }
            }
        }
        styles
    }

    /// Generated CSS rules, safelist first, one string per rule.
    pub fn rules_data<C: ClassList + ?Sized>(&self, classes: &C) -> Vec<String> {
        let tokens = normalize_classes(
            self.config
                .safelist
                .iter()
                .map(String::as_str)
                .chain(classes.class_tokens().iter().map(String::as_str)),
        );

        let mut contexts: IndexMap<String, ClassContext> = IndexMap::new();
        for style in self.process_tokens(tokens) {
            let declarations = style.declarations();
            contexts
                .entry(style.class_name.clone())
                .or_insert_with(|| ClassContext::new(style.class_name.clone(), style.from_alias))
                .write(style.prefix.as_deref(), declarations);
        }

        let variants = VariantResolver::new(&self.config);
        contexts
            .values()
            .flat_map(|ctx| ctx.to_css(&variants))
            .collect()
    }

    /// Stylesheet text, rules joined by newlines.
    pub fn render<C: ClassList + ?Sized>(&self, classes: &C) -> String {
        self.rules_data(classes).join("\n")
    }

    /// Element bindings for applying the classes directly to one element.
    pub fn dom_bindings<C: ClassList + ?Sized>(&self, classes: &C) -> Vec<DomBinding> {
        self.process(classes)
            .iter()
            .filter_map(|style| DomBinding::from_style(style, &self.config))
            .collect()
    }
}
