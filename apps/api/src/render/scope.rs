//! Rendering scopes: a chain of variable frames, innermost first.

use serde_json::{Map, Value};

use super::parser::CURRENT_ITEM;

#[derive(Debug)]
enum Frame<'a> {
    /// The top-level data record. Non-object data binds nothing.
    Root(&'a Value),
    /// Fields of an object element inside an iteration block.
    Fields(&'a Map<String, Value>),
    /// A scalar element bound to `{{{this}}}`.
    Item(Value),
}

/// A variable scope. Child scopes shadow their parent without copying or mutating it.
#[derive(Debug)]
pub struct Scope<'a> {
    frame: Frame<'a>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn root(data: &'a Value) -> Self {
        Scope {
            frame: Frame::Root(data),
            parent: None,
        }
    }

    /// A child scope whose fields shadow this one.
    pub fn with_fields<'b>(&'b self, fields: &'b Map<String, Value>) -> Scope<'b> {
        Scope {
            frame: Frame::Fields(fields),
            parent: Some(self),
        }
    }

    /// A child scope binding the current iteration element.
    pub fn with_item<'b>(&'b self, item: Value) -> Scope<'b> {
        Scope {
            frame: Frame::Item(item),
            parent: Some(self),
        }
    }

    /// Looks `key` up from the innermost frame outwards.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let local = match &self.frame {
            Frame::Root(data) => data.as_object().and_then(|m| m.get(key)),
            Frame::Fields(fields) => fields.get(key),
            Frame::Item(item) => (key == CURRENT_ITEM).then_some(item),
        };

        local.or_else(|| self.parent.and_then(|p| p.lookup(key)))
    }
}

/// Whether a conditional bound to `value` renders its body.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
    }
}

/// The text a scalar placeholder is replaced with; `None` for non-scalars.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        // f64 Display drops an integral fraction: 3.0 renders as "3".
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
