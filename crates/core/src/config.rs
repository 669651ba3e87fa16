//! Engine configuration: the utility, value and class registries plus
//! aliases, breakpoints and variants.
//!
//! Everything except function-valued descriptors can be loaded from JSON.
//! Functions are attached through the `with_*` builder methods.

use crate::types::Breakpoint;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// Parameters handed to function-valued properties and value templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyParams {
    /// Raw value as written in the class-name, after label extraction.
    pub value: String,
    /// Value after named-value / arbitrary-value resolution.
    pub resolved: String,
    pub unit: String,
    pub second_value: Option<String>,
    pub second_unit: Option<String>,
    /// Label from an inline `(label:value)` or `[label:value]` form.
    pub key: Option<String>,
}

pub type PropertyFn = Arc<dyn Fn(&PropertyParams) -> String + Send + Sync>;

/// Where a descriptor writes its value.
#[derive(Clone)]
pub enum PropertyTarget {
    Name(String),
    Names(Vec<String>),
    Func(PropertyFn),
}

/// How a descriptor computes its value.
#[derive(Clone)]
pub enum ValueTemplate {
    /// Template string with `{0}`, `{1}`, `{1|default}` and `||` fallback.
    Pattern(String),
    Func(PropertyFn),
}

/// Value predicate used by conditional descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Syntax {
    /// `<number>`: `calc(...)` or a signed decimal
    Number,
    /// `<size>`: a decimal followed by a CSS length unit
    Size,
    /// `<value>`: accepts anything, always tried last
    Value,
    /// `<a|b|c>`: exact membership
    OneOf(Vec<String>),
}

impl Syntax {
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Syntax::Value)
    }
}

impl From<&str> for Syntax {
    fn from(s: &str) -> Self {
        let inner = s
            .trim()
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(s.trim());
        match inner {
            "number" => Syntax::Number,
            "size" => Syntax::Size,
            "value" | "" => Syntax::Value,
            options => Syntax::OneOf(options.split('|').map(|o| o.trim().to_string()).collect()),
        }
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Syntax::Value
    }
}

/// One entry of a conditional descriptor list.
#[derive(Clone)]
pub struct ConditionalDescriptor {
    /// Label this entry answers to (`p-(x:20px)` selects `for: "x"`).
    pub for_key: Option<String>,
    pub syntax: Syntax,
    pub property: PropertyTarget,
    pub value: Option<ValueTemplate>,
}

/// How a utility-type maps onto CSS.
#[derive(Clone)]
pub enum PropertyDescriptor {
    /// `bg` → `background`
    Property(String),
    /// `size` → `width` + `height`, same value for each
    Properties(Vec<String>),
    /// property name computed from the parameters
    Func(PropertyFn),
    /// `{property, value?, group?}`
    Template {
        property: PropertyTarget,
        value: Option<ValueTemplate>,
        /// Value-registry scope used instead of the utility-type name.
        group: Option<String>,
    },
    /// First entry whose syntax accepts the value wins.
    Conditional(Vec<ConditionalDescriptor>),
}

impl PropertyDescriptor {
    pub fn template(property: impl Into<String>, value: impl Into<String>) -> Self {
        PropertyDescriptor::Template {
            property: PropertyTarget::Name(property.into()),
            value: Some(ValueTemplate::Pattern(value.into())),
            group: None,
        }
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&PropertyParams) -> String + Send + Sync + 'static,
    {
        PropertyDescriptor::Func(Arc::new(f))
    }

    /// Value-registry scope for this descriptor, if it declares one.
    pub fn group(&self) -> Option<&str> {
        match self {
            PropertyDescriptor::Template { group, .. } => group.as_deref(),
            _ => None,
        }
    }
}

/// A value-registry entry: a global named value, or a map scoped to the
/// utility-type (or group) with the same name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ValueEntry {
    Value(String),
    Scoped(IndexMap<String, String>),
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("breakpoint `{name}` has neither `min` nor `max`")]
    EmptyBreakpoint { name: String },
}

/// Engine configuration.
///
/// Immutable once handed to an engine. Any runtime registration goes
/// through a builder that produces a new engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// utility-type → descriptor
    pub property: IndexMap<String, PropertyDescriptor>,
    /// value-name → value, or utility-type → (value-name → value)
    pub values: IndexMap<String, ValueEntry>,
    /// CSS property → (class-name → value or template)
    pub classes: IndexMap<String, IndexMap<String, String>>,
    /// alias → space separated class-names
    pub aliases: IndexMap<String, String>,
    pub breakpoints: Vec<Breakpoint>,
    /// prefix → selector template
    pub variants: IndexMap<String, String>,
    pub safelist: Vec<String>,
    pub reserved_variant_chars: Vec<char>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 字符串加载配置并校验
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for bp in &self.breakpoints {
            if bp.min.is_none() && bp.max.is_none() {
                return Err(ConfigError::EmptyBreakpoint {
                    name: bp.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn with_property(mut self, name: impl Into<String>, descriptor: PropertyDescriptor) -> Self {
        self.property.insert(name.into(), descriptor);
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values
            .insert(name.into(), ValueEntry::Value(value.into()));
        self
    }

    /// Adds a value visible only to `scope` (a utility-type or group name).
    pub fn with_scoped_value(
        mut self,
        scope: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let entry = self
            .values
            .entry(scope.into())
            .or_insert_with(|| ValueEntry::Scoped(IndexMap::new()));
        if matches!(*entry, ValueEntry::Value(_)) {
            *entry = ValueEntry::Scoped(IndexMap::new());
        }
        if let ValueEntry::Scoped(map) = entry {
            map.insert(name.into(), value.into());
        }
        self
    }

    pub fn with_class(
        mut self,
        css_property: impl Into<String>,
        class_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.classes
            .entry(css_property.into())
            .or_default()
            .insert(class_name.into(), value.into());
        self
    }

    pub fn with_alias(mut self, name: impl Into<String>, classes: impl Into<String>) -> Self {
        self.aliases.insert(name.into(), classes.into());
        self
    }

    pub fn with_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoints.push(breakpoint);
        self
    }

    pub fn with_variant(mut self, prefix: impl Into<String>, template: impl Into<String>) -> Self {
        self.variants.insert(prefix.into(), template.into());
        self
    }

    pub fn with_safelist<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.safelist.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn with_reserved_variant_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.reserved_variant_chars.extend(chars);
        self
    }

    /// Named value from the global part of the registry.
    pub fn global_value(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ValueEntry::Value(v) => Some(v.as_str()),
            ValueEntry::Scoped(_) => None,
        }
    }

    /// Named value scoped to a utility-type or group.
    pub fn scoped_value(&self, scope: &str, name: &str) -> Option<&str> {
        match self.values.get(scope)? {
            ValueEntry::Scoped(map) => map.get(name).map(String::as_str),
            ValueEntry::Value(_) => None,
        }
    }

    pub fn breakpoint(&self, name: &str) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|bp| bp.name == name)
    }

    /// Whether `class_name` is a key in any class bucket.
    pub fn is_named_class(&self, class_name: &str) -> bool {
        self.classes
            .values()
            .any(|bucket| bucket.contains_key(class_name))
    }

    /// Every (CSS property, template) pair registered for `class_name`.
    pub fn named_class_templates<'a>(
        &'a self,
        class_name: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.classes.iter().filter_map(move |(property, bucket)| {
            bucket
                .get(class_name)
                .map(|template| (property.as_str(), template.as_str()))
        })
    }
}

// ── serde 镜像类型 ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Name(String),
    Names(Vec<String>),
}

impl From<RawTarget> for PropertyTarget {
    fn from(raw: RawTarget) -> Self {
        match raw {
            RawTarget::Name(n) => PropertyTarget::Name(n),
            RawTarget::Names(ns) => PropertyTarget::Names(ns),
        }
    }
}

#[derive(Deserialize)]
struct RawConditional {
    #[serde(rename = "for", default)]
    for_key: Option<String>,
    #[serde(default)]
    syntax: Option<String>,
    property: RawTarget,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDescriptor {
    Property(String),
    Properties(Vec<String>),
    Conditional(Vec<RawConditional>),
    Template {
        property: RawTarget,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        group: Option<String>,
    },
}

impl From<RawDescriptor> for PropertyDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        match raw {
            RawDescriptor::Property(p) => PropertyDescriptor::Property(p),
            RawDescriptor::Properties(ps) => PropertyDescriptor::Properties(ps),
            RawDescriptor::Conditional(entries) => PropertyDescriptor::Conditional(
                entries
                    .into_iter()
                    .map(|e| ConditionalDescriptor {
                        for_key: e.for_key,
                        syntax: e.syntax.as_deref().map(Syntax::from).unwrap_or_default(),
                        property: e.property.into(),
                        value: e.value.map(ValueTemplate::Pattern),
                    })
                    .collect(),
            ),
            RawDescriptor::Template {
                property,
                value,
                group,
            } => PropertyDescriptor::Template {
                property: property.into(),
                value: value.map(ValueTemplate::Pattern),
                group,
            },
        }
    }
}

impl<'de> Deserialize<'de> for PropertyDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawDescriptor::deserialize(deserializer).map(Into::into)
    }
}

// Closures have no Debug; print a placeholder instead.

impl fmt::Debug for PropertyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyTarget::Name(n) => f.debug_tuple("Name").field(n).finish(),
            PropertyTarget::Names(ns) => f.debug_tuple("Names").field(ns).finish(),
            PropertyTarget::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl fmt::Debug for ValueTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueTemplate::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            ValueTemplate::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl fmt::Debug for ConditionalDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalDescriptor")
            .field("for_key", &self.for_key)
            .field("syntax", &self.syntax)
            .field("property", &self.property)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDescriptor::Property(p) => f.debug_tuple("Property").field(p).finish(),
            PropertyDescriptor::Properties(ps) => f.debug_tuple("Properties").field(ps).finish(),
            PropertyDescriptor::Func(_) => f.write_str("Func(..)"),
            PropertyDescriptor::Template {
                property,
                value,
                group,
            } => f
                .debug_struct("Template")
                .field("property", property)
                .field("value", value)
                .field("group", group)
                .finish(),
            PropertyDescriptor::Conditional(entries) => {
                f.debug_tuple("Conditional").field(entries).finish()
            }
        }
    }
}
