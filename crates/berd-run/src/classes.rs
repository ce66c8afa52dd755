//! Class registry, singleton instances, and field histories.
//!
//! Classes are singletons: the first time a class name is referenced its
//! one instance is created, and every later reference yields the same
//! instance. Re-declaring the class discards the instance and all field
//! histories scoped to it.

use berd_par::{ClassDeclAst, FuncDef, MethodDecl};
use berd_util::{FxHashMap, Symbol};
use indexmap::IndexMap;
use std::rc::Rc;

use crate::store::History;
use crate::value::Value;

/// A defined class: the declaration AST plus evaluated static fields.
pub struct ClassDef {
    pub decl: Rc<ClassDeclAst>,
    pub statics: FxHashMap<Symbol, Value>,
    /// Property designated `fallback` for instance reads, if any.
    pub instance_fallback: Option<Symbol>,
    /// Property designated `static fallback`, if any.
    pub static_fallback: Option<Symbol>,
}

impl ClassDef {
    pub fn method(&self, name: Symbol, is_static: bool) -> Option<&MethodDecl> {
        self.decl
            .methods
            .iter()
            .find(|m| m.name == name && m.is_static == is_static)
    }

    pub fn any_method(&self, name: Symbol) -> Option<&MethodDecl> {
        self.decl.methods.iter().find(|m| m.name == name)
    }

    pub fn func_for(&self, name: Symbol) -> Option<Rc<FuncDef>> {
        self.any_method(name).map(|m| Rc::clone(&m.func))
    }
}

/// The singleton instance of a class. Field order follows declaration and
/// insertion order, which keeps display stable.
#[derive(Default)]
pub struct ClassInstance {
    pub fields: IndexMap<Symbol, Value>,
}

/// Histories for object fields, keyed by `(class, field, static?)`.
#[derive(Default)]
pub struct FieldHistories {
    map: FxHashMap<(Symbol, Symbol, bool), History>,
}

impl FieldHistories {
    pub fn seed(&mut self, class: Symbol, field: Symbol, is_static: bool, value: &Value) {
        self.map
            .insert((class, field, is_static), History::seeded(value.clone()));
    }

    pub fn record(&mut self, class: Symbol, field: Symbol, is_static: bool, value: &Value) {
        self.map
            .entry((class, field, is_static))
            .or_insert_with(|| History::seeded(value.clone()))
            .record(value);
    }

    pub fn get_mut(
        &mut self,
        class: Symbol,
        field: Symbol,
        is_static: bool,
    ) -> Option<&mut History> {
        self.map.get_mut(&(class, field, is_static))
    }

    pub fn get(&self, class: Symbol, field: Symbol, is_static: bool) -> Option<&History> {
        self.map.get(&(class, field, is_static))
    }

    pub fn remove(&mut self, class: Symbol, field: Symbol, is_static: bool) {
        self.map.remove(&(class, field, is_static));
    }

    /// Drops every history belonging to `class` (on re-declaration).
    pub fn clear_class(&mut self, class: Symbol) {
        self.map.retain(|(c, _, _), _| *c != class);
    }
}

/// All defined classes and their live instances.
#[derive(Default)]
pub struct ClassRegistry {
    defs: FxHashMap<Symbol, ClassDef>,
    instances: FxHashMap<Symbol, ClassInstance>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a class definition, discarding any previous instance of
    /// the same name.
    pub fn define(&mut self, decl: Rc<ClassDeclAst>, statics: FxHashMap<Symbol, Value>) {
        let instance_fallback = decl
            .properties
            .iter()
            .find(|p| p.is_fallback && !p.is_static)
            .map(|p| p.name);
        let static_fallback = decl
            .properties
            .iter()
            .find(|p| p.is_fallback && p.is_static)
            .map(|p| p.name);
        let name = decl.name;
        self.instances.remove(&name);
        self.defs.insert(
            name,
            ClassDef {
                decl,
                statics,
                instance_fallback,
                static_fallback,
            },
        );
    }

    pub fn def(&self, name: Symbol) -> Option<&ClassDef> {
        self.defs.get(&name)
    }

    pub fn def_mut(&mut self, name: Symbol) -> Option<&mut ClassDef> {
        self.defs.get_mut(&name)
    }

    pub fn is_class(&self, name: Symbol) -> bool {
        self.defs.contains_key(&name)
    }

    pub fn has_instance(&self, name: Symbol) -> bool {
        self.instances.contains_key(&name)
    }

    /// Registers a freshly initialized instance.
    pub fn install_instance(&mut self, name: Symbol, instance: ClassInstance) {
        self.instances.insert(name, instance);
    }

    pub fn instance(&self, name: Symbol) -> Option<&ClassInstance> {
        self.instances.get(&name)
    }

    pub fn instance_mut(&mut self, name: Symbol) -> Option<&mut ClassInstance> {
        self.instances.get_mut(&name)
    }
}
