use crate::types::Declaration;
use indexmap::IndexMap;

/// 合并同一规则块内的 CSS 声明
///
/// - 同名属性后者覆盖前者
/// - 属性保留首次出现的位置（IndexMap 保序）
pub fn merge_declarations(decls: impl IntoIterator<Item = Declaration>) -> Vec<Declaration> {
    let mut map: IndexMap<String, String> = IndexMap::new();

    for decl in decls {
        map.insert(decl.property, decl.value);
    }

    map.into_iter()
        .map(|(property, value)| Declaration { property, value })
        .collect()
}
