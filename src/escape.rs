/// 转义正则表达式元字符, 使得到的模式只匹配 `text` 本身.
#[must_use]
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        match c {
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
            | '#' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\x0C' => escaped.push_str("\\f"),
            c => escaped.push(c),
        }
    }
    escaped
}
