//! GraphQL document model
//!
//! Builders assemble a [`Document`] out of [`Field`] trees instead of
//! concatenating strings, so every query renders with the same layout and
//! arguments are always escaped.

pub mod builders;
pub mod state;

pub use builders::*;
pub use state::*;

use std::fmt;

/// GraphQL argument value
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Str(String),
    Bool(bool),
    /// Bare enum literal, rendered unquoted
    Enum(String),
    /// `$name` reference to an operation variable
    Variable(String),
    List(Vec<ArgValue>),
    Object(Vec<(String, ArgValue)>),
}

impl ArgValue {
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            // JSON string escaping is valid GraphQL string escaping
            Self::Str(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Enum(e) => f.write_str(e),
            Self::Variable(v) => write!(f, "${v}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// One selection in a selection set
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field {
    pub name: String,
    pub args: Vec<(String, ArgValue)>,
    pub children: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.args.push((name.into(), value));
        self
    }

    pub fn child(mut self, field: Field) -> Self {
        self.children.push(field);
        self
    }

    /// Add several leaf selections at once
    pub fn leaves<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children.extend(names.into_iter().map(Field::new));
        self
    }

    /// `edges { node { .. } }` envelope around the given node selection
    pub fn edges(node: Field) -> Self {
        Field::new("edges").child(node)
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.name, indent = depth * 2)?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            for (i, (name, value)) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}: {value}")?;
            }
            f.write_str(")")?;
        }
        if self.children.is_empty() {
            return f.write_str("\n");
        }
        f.write_str(" {\n")?;
        for child in &self.children {
            child.write(f, depth + 1)?;
        }
        writeln!(f, "{:indent$}}}", "", indent = depth * 2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

/// A complete operation: `query Name($v: Type) { .. }`
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub kind: OperationKind,
    pub name: Option<String>,
    /// `(variable name, GraphQL type)`
    pub variables: Vec<(String, String)>,
    pub fields: Vec<Field>,
}

impl Document {
    pub fn query() -> Self {
        Self {
            kind: OperationKind::Query,
            name: None,
            variables: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn mutation() -> Self {
        Self {
            kind: OperationKind::Mutation,
            ..Self::query()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn variable(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.variables.push((name.into(), ty.into()));
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        if !self.variables.is_empty() {
            f.write_str("(")?;
            for (i, (name, ty)) in self.variables.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "${name}: {ty}")?;
            }
            f.write_str(")")?;
        }
        f.write_str(" {\n")?;
        for field in &self.fields {
            field.write(f, 1)?;
        }
        f.write_str("}\n")
    }
}
