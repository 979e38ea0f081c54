//! The variables handed to templates.

use serde_json::{Map, Value};

/// Template variables, by name.
pub type Args = Map<String, Value>;

/// Shallow merge, entries in `over` win.
pub fn merge_args(base: &Args, over: &Args) -> Args {
    let mut merged = base.clone();
    for (k, v) in over {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

/// Build `Args` from a JSON object literal; anything else gives
/// empty `Args`.
pub fn args_from_value(v: Value) -> Args {
    match v {
        Value::Object(map) => map,
        _ => Args::new(),
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn t_merge_args() {
        let base = args_from_value(json!({"title": "Hi", "lang": "en"}));
        let over = args_from_value(json!({"title": "Hello", "user": {"name": "x"}}));
        let merged = merge_args(&base, &over);
        assert_eq!(Value::Object(merged),
                   json!({"title": "Hello", "lang": "en", "user": {"name": "x"}}));
        assert!(args_from_value(json!([1, 2])).is_empty());
    }
}
