//! PHP literal formatting, matching the layout of PHP's own `var_export`.

use serde_json::Value;

/// `'it\'s'`
pub fn php_string_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn php_float_literal(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Default value of a generated parameter, e.g. `= array()` or `= 'PLAIN'`.
///
/// Objects lose their keys, the same way the generated client has always received them.
pub fn php_default_value(value: &Value) -> String {
    match value {
        Value::Null => String::from("NULL"),
        Value::Bool(boolean) => boolean.to_string(),
        Value::Number(number) => match (number.as_i64(), number.as_u64(), number.as_f64()) {
            (Some(int), _, _) => int.to_string(),
            (None, Some(uint), _) => uint.to_string(),
            (None, None, Some(float)) => php_float_literal(float),
            _ => number.to_string(),
        },
        Value::String(string) => php_string_literal(string),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(php_default_value).collect();
            format!("array({})", items.join(", "))
        }
        Value::Object(fields) => {
            let items: Vec<String> = fields.values().map(php_default_value).collect();
            format!("array({})", items.join(", "))
        }
    }
}

/// Multi-line `array(...)` with one `key => value,` entry per line.
///
/// Keys and values are already PHP literals. Indentation of the entries is relative, the
/// caller's emitter adds the surrounding depth.
pub fn php_array(entries: &[(String, String)]) -> String {
    let mut code = String::from("array(\n");
    for (key, value) in entries {
        code.push_str(&format!("    {key} => {value},\n"));
    }
    code.push(')');
    code
}

/// A list array, keyed `0 => ..., 1 => ...` like `var_export` prints it.
pub fn php_list(values: &[String]) -> String {
    let entries: Vec<(String, String)> = values
        .iter()
        .enumerate()
        .map(|(index, value)| (index.to_string(), value.clone()))
        .collect();

    php_array(&entries)
}
