use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use gale_core::types::format_block;
use gale_core::Config;
use gale_engine::{CssRules, Engine, ProcessedStyle};

// ── JS 侧 serde 镜像类型 ──────────────────────────────────────

/// `"a b c"` 或 `["a b", "c"]`
#[derive(Deserialize)]
#[serde(untagged)]
enum JsClassList {
    One(String),
    Many(Vec<String>),
}

impl JsClassList {
    fn into_vec(self) -> Vec<String> {
        match self {
            JsClassList::One(s) => vec![s],
            JsClassList::Many(list) => list,
        }
    }
}

/// 属性名、属性名列表，或完整的 `property: value` 文本（此时 value 为 null）
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
enum JsCssRules {
    Property(String),
    Properties(Vec<String>),
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct JsProcessedStyle {
    class_name: String,
    css_rules: JsCssRules,
    value: Option<String>,
    prefix: Option<String>,
}

impl From<ProcessedStyle> for JsProcessedStyle {
    fn from(style: ProcessedStyle) -> Self {
        let css_rules = match style.css_rules {
            CssRules::Property(p) => JsCssRules::Property(p),
            CssRules::Properties(ps) => JsCssRules::Properties(ps),
            CssRules::Declarations(decls) => JsCssRules::Property(format_block(&decls)),
        };
        JsProcessedStyle {
            class_name: style.class_name,
            css_rules,
            value: style.value,
            prefix: style.prefix,
        }
    }
}

// ── 类型转换 ──────────────────────────────────────────────────

fn parse_config(config: JsValue) -> Result<Config, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(Config::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

fn parse_classes(classes: JsValue) -> Result<Vec<String>, JsError> {
    let list: JsClassList = serde_wasm_bindgen::from_value(classes)
        .map_err(|e| JsError::new(&format!("Invalid class list: {}", e)))?;
    Ok(list.into_vec())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ── WASM 导出 ─────────────────────────────────────────────────

/// 初始化 panic hook（自动调用）
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 原子类引擎
///
/// 函数形式的属性描述无法从 JS 传入，只支持可序列化的配置。
#[wasm_bindgen]
pub struct WasmEngine {
    inner: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    /// @param config - 配置对象（`property`、`values`、`classes` 等），可选
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmEngine, JsError> {
        let config = parse_config(config)?;
        let inner = Engine::new(config).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(WasmEngine { inner })
    }

    /// 解析单个类名
    ///
    /// @returns `{ prefix, utility, value, unit, secondValue, secondUnit, raw }` 或 null
    pub fn parse(&self, class_name: &str) -> Result<JsValue, JsError> {
        match self.inner.parse(class_name) {
            Some(parsed) => to_js(&parsed),
            None => Ok(JsValue::NULL),
        }
    }

    /// @param classes - 空白分隔的字符串或字符串数组
    /// @returns `[{ className, cssRules, value, prefix }]`
    pub fn process(&self, classes: JsValue) -> Result<JsValue, JsError> {
        let styles: Vec<JsProcessedStyle> = self
            .inner
            .process(&parse_classes(classes)?)
            .into_iter()
            .map(Into::into)
            .collect();
        to_js(&styles)
    }

    /// 生成样式表文本
    pub fn render(&self, classes: JsValue) -> Result<String, JsError> {
        Ok(self.inner.render(&parse_classes(classes)?))
    }

    /// 生成的规则列表（safelist 在前）
    #[wasm_bindgen(js_name = "rulesData")]
    pub fn rules_data(&self, classes: JsValue) -> Result<JsValue, JsError> {
        to_js(&self.inner.rules_data(&parse_classes(classes)?))
    }
}

/// 将类名转义为 CSS 选择器
#[wasm_bindgen]
pub fn escape(text: &str) -> String {
    gale_parse::escape(text)
}

/// `escape` 的逆操作
#[wasm_bindgen]
pub fn unescape(text: &str) -> String {
    gale_parse::unescape(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gale_core::PropertyDescriptor;

    fn engine() -> Engine {
        let config = Config::new()
            .with_property("bg", PropertyDescriptor::Property("background".into()))
            .with_property(
                "size",
                PropertyDescriptor::Properties(vec!["width".into(), "height".into()]),
            )
            .with_class("display", "flex", "flex");
        Engine::new(config).unwrap()
    }

    #[test]
    fn test_js_style_shapes() {
        let styles: Vec<JsProcessedStyle> = engine()
            .process("hover:bg-red size-2px flex")
            .into_iter()
            .map(Into::into)
            .collect();

        let json = serde_json::to_value(&styles).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "className": "hover:bg-red", "cssRules": "background", "value": "red", "prefix": "hover" },
                { "className": "size-2px", "cssRules": ["width", "height"], "value": "2px", "prefix": null },
                { "className": "flex", "cssRules": "display: flex;", "value": null, "prefix": null }
            ])
        );
    }

    #[test]
    fn test_class_list_shapes() {
        let one: JsClassList = serde_json::from_str(r#""a b""#).unwrap();
        assert_eq!(one.into_vec(), vec!["a b"]);
        let many: JsClassList = serde_json::from_str(r#"["a", "b c"]"#).unwrap();
        assert_eq!(many.into_vec(), vec!["a", "b c"]);
    }
}
