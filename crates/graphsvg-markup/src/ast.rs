use std::fmt;

/// A parsed `.graph` document: one root node.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

/// `name arg, arg key: value { key: value  child ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    /// Positional arguments, in order.
    pub args: Vec<Value>,
    /// Properties from the header and the block, in source order.
    pub props: Vec<Prop>,
    pub children: Vec<Node>,
    /// 1-based position of the node name.
    pub line: usize,
    pub col: usize,
}

impl Node {
    /// Last property named `key` (later ones win).
    pub fn prop(&self, key: &str) -> Option<&Prop> {
        self.props.iter().rev().find(|p| p.key == key)
    }
}

/// `key: value, value ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub key: String,
    pub values: Vec<Value>,
}

impl Prop {
    /// The single value of a one-value property.
    pub fn single(&self) -> Option<&Value> {
        match self.values.as_slice() {
            [v] => Some(v),
            _ => None,
        }
    }

    /// All values as numbers, or `None` if any is not a number.
    pub fn numbers(&self) -> Option<Vec<f64>> {
        self.values.iter().map(Value::as_number).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    /// Backtick expression, uninterpreted.
    Expr(String),
    Ident(String),
    /// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`, as written.
    Color(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Expr(_) => "expression",
            Value::Ident(_) => "identifier",
            Value::Color(_) => "color",
        }
    }
}

/// Renders the value as it would appear in an attribute.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) | Value::Expr(s) | Value::Ident(s) | Value::Color(s) => f.write_str(s),
        }
    }
}
