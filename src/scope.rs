use indexmap::IndexMap;
use tracing::trace;

use crate::{
    ast::{Position, SyntaxNode},
    diagnostics::Diagnostic,
};

/// A named binding or reference site.
///
/// Two variables denote the same binding when their names are equal; the
/// position only serves diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub position: Position,
}

impl Variable {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Variable {
            name: name.into(),
            position,
        }
    }
}

impl From<&SyntaxNode> for Variable {
    fn from(node: &SyntaxNode) -> Self {
        Variable::new(node.text.clone(), node.position)
    }
}

/// The flat set of names bound at one point of a query.
///
/// Each name maps to its first binding; later bindings of the same name are
/// ignored. There are no nested scopes: projections replace the contents
/// wholesale through [`Scope::clear`] followed by [`Scope::add`].
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: IndexMap<String, Variable>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn add<I>(&mut self, variables: I)
    where
        I: IntoIterator<Item = Variable>,
    {
        for variable in variables {
            if let Some(first) = self.bindings.get(&variable.name) {
                // TODO: decide whether rebinding a name within one scope is an error
                trace!(
                    name = %variable.name,
                    first = %first.position,
                    again = %variable.position,
                    "name already bound"
                );
                continue;
            }
            self.bindings.insert(variable.name.clone(), variable);
        }
    }

    /// Pushes an undefined-variable diagnostic for every reference whose name
    /// is not bound, and returns how many were pushed.
    pub fn check(&self, references: &[Variable], diagnostics: &mut Vec<Diagnostic>) -> usize {
        let mut errors = 0;
        for reference in references {
            if !self.bindings.contains_key(&reference.name) {
                diagnostics.push(Diagnostic::undefined_variable(
                    reference.name.clone(),
                    reference.position,
                ));
                errors += 1;
            }
        }
        errors
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.bindings.values()
    }
}
