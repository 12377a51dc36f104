use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lightweight expression AST used for `visible_if` and group-rule conditions.
///
/// Paths are JSON pointers into the serialized `AnswersRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expr {
    IsSet { path: String },
    And { expressions: Vec<Expr> },
}

impl Expr {
    pub fn is_set(path: &str) -> Self {
        Expr::IsSet { path: path.into() }
    }

    pub fn all(expressions: impl IntoIterator<Item = Expr>) -> Self {
        Expr::And {
            expressions: expressions.into_iter().collect(),
        }
    }

    /// Evaluates the expression; `None` when a path does not resolve.
    pub fn evaluate(&self, ctx: &Value) -> Option<bool> {
        match self {
            Expr::IsSet { path } => ctx.pointer(path).map(value_is_set),
            Expr::And { expressions } => {
                for expr in expressions {
                    match expr.evaluate(ctx) {
                        Some(true) => continue,
                        Some(false) => return Some(false),
                        None => return None,
                    }
                }
                Some(true)
            }
        }
    }
}

/// A flag counts as set when true, a text field when it has non-blank content.
pub fn value_is_set(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.trim().is_empty(),
        Value::Null => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn and_short_circuits_on_false() {
        let ctx = json!({ "a": false, "b": true });
        let expr = Expr::all([Expr::is_set("/a"), Expr::is_set("/missing")]);
        assert_eq!(expr.evaluate(&ctx), Some(false));
        let expr = Expr::all([Expr::is_set("/b"), Expr::is_set("/missing")]);
        assert_eq!(expr.evaluate(&ctx), None);
    }

    #[test]
    fn is_set_treats_blank_text_as_unset() {
        let ctx = json!({ "text": "   ", "flag": true });
        assert_eq!(Expr::is_set("/text").evaluate(&ctx), Some(false));
        assert_eq!(Expr::is_set("/flag").evaluate(&ctx), Some(true));
    }
}
