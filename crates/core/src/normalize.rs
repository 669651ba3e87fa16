use indexmap::IndexSet;

/// 规范化类名列表
///
/// 1. 按空白拆分每个输入
/// 2. 去除空字符串
/// 3. 去重，保留首次出现的顺序（生成的规则顺序跟随输入）
pub fn normalize_classes<I, S>(inputs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: IndexSet<String> = IndexSet::new();

    for input in inputs {
        for token in input.as_ref().split_whitespace() {
            unique.insert(token.to_string());
        }
    }

    unique.into_iter().collect()
}
