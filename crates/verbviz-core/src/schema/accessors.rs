use super::{Decl, DeclKind, Module, Ref, Schema};

impl Schema {
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }
}

impl Module {
    pub fn decls_of(&self, kind: DeclKind) -> impl Iterator<Item = &Decl> {
        self.decls.iter().filter(move |d| d.kind == kind)
    }

    pub fn verbs(&self) -> impl Iterator<Item = &Decl> {
        self.decls_of(DeclKind::Verb)
    }

    /// Returns the first verb declared under `name`.
    pub fn verb(&self, name: &str) -> Option<&Decl> {
        self.verbs().find(|v| v.name == name)
    }

    pub fn data(&self) -> impl Iterator<Item = &Decl> {
        self.decls_of(DeclKind::Data)
    }
}

impl Decl {
    pub fn is_verb(&self) -> bool {
        self.kind == DeclKind::Verb
    }

    /// All call references across every `calls` metadata entry, in declared order.
    pub fn calls(&self) -> impl Iterator<Item = &Ref> {
        self.metadata
            .iter()
            .filter(|m| m.is_calls())
            .flat_map(|m| m.calls.iter())
    }

    pub fn has_outbound_calls(&self) -> bool {
        self.metadata
            .iter()
            .any(|m| m.is_calls() && !m.calls.is_empty())
    }
}
