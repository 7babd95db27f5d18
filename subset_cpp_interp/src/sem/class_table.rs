//! Class symbol table
//!
//! Built before analysis from the program's class definitions: per-class
//! member signatures plus the derived views the analyzer needs (chain
//! lookups, merged field layout, method overload resolution). Building
//! validates the inheritance graph: declared bases, no cycles, default
//! constructors on bases, override return types, and virtual-flag
//! propagation down the chain.

use std::collections::HashMap;

use subset_cpp_parser::{ClassDef, Program, Type};

use crate::sem::error::SemanticError;
use crate::sem::symbols::{ClassSymbol, CtorSymbol, MethodSymbol};

/// Marker for an ambiguous overload pick
#[derive(Debug)]
pub(crate) struct Ambiguous;

/// May a reference parameter of base type `param` bind to an lvalue of
/// base type `arg`? Exact base match, or a class argument derived from
/// the parameter's class (the binding through which virtual dispatch
/// happens).
fn ref_binds(param: &Type, arg: &Type, derives: &impl Fn(&str, &str) -> bool) -> bool {
    if param.same_base(arg) {
        return true;
    }
    match (param.class_name(), arg.class_name()) {
        (Some(base), Some(derived)) => derives(derived, base),
        _ => false,
    }
}

/// Score-based overload selection shared by functions, constructors and
/// methods. A candidate is viable when arity matches, every value
/// parameter's base type equals the argument's base type, and reference
/// parameters get lvalue arguments they can bind to. The candidate with
/// the strictly greatest score wins; a tie at the top is ambiguous.
pub(crate) fn pick_overload<'a, T>(
    candidates: &'a [T],
    param_types: impl Fn(&T) -> &[Type],
    args: &[(Type, bool)],
    derives: impl Fn(&str, &str) -> bool,
    ref_weight: i32,
    value_weight: i32,
) -> Result<Option<&'a T>, Ambiguous> {
    let mut best: Option<&T> = None;
    let mut best_score = i32::MIN;
    let mut tied = false;

    for cand in candidates {
        let params = param_types(cand);
        if params.len() != args.len() {
            continue;
        }

        let mut viable = true;
        let mut score = 0;
        for (param, (arg_base, arg_is_lvalue)) in params.iter().zip(args) {
            if param.is_ref {
                if !*arg_is_lvalue || !ref_binds(param, arg_base, &derives) {
                    viable = false;
                    break;
                }
                score += ref_weight;
            } else {
                if &param.base() != arg_base {
                    viable = false;
                    break;
                }
                score += value_weight;
            }
        }
        if !viable {
            continue;
        }

        if score > best_score {
            best = Some(cand);
            best_score = score;
            tied = false;
        } else if score == best_score {
            tied = true;
        }
    }

    if tied {
        return Err(Ambiguous);
    }
    Ok(best)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mark {
    None,
    Temp,
    Perm,
}

/// Symbol table over every class in the program
#[derive(Debug, Default)]
pub struct ClassTable {
    classes: HashMap<String, ClassSymbol>,
}

impl ClassTable {
    /// Build and validate the table from a program
    pub fn build(program: &Program) -> Result<Self, SemanticError> {
        let mut table = Self::default();
        // Phase 1: names only, so forward references resolve.
        for class in &program.classes {
            table.add_class_name(&class.name)?;
        }
        for class in &program.classes {
            table.fill_class_members(class)?;
        }
        table.check_inheritance()?;
        table.check_overrides_and_virtuals()?;
        Ok(table)
    }

    fn add_class_name(&mut self, name: &str) -> Result<(), SemanticError> {
        if self.classes.contains_key(name) {
            return Err(SemanticError::ClassRedefinition(name.to_string()));
        }
        self.classes.insert(
            name.to_string(),
            ClassSymbol {
                name: name.to_string(),
                ..ClassSymbol::default()
            },
        );
        Ok(())
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&ClassSymbol, SemanticError> {
        self.classes
            .get(name)
            .ok_or_else(|| SemanticError::UnknownClass(name.to_string()))
    }

    /// `derived == base` or `derived` transitively inherits from `base`
    pub fn is_same_or_derived(&self, derived: &str, base: &str) -> bool {
        if derived == base {
            return true;
        }
        let mut cur = self.classes.get(derived);
        while let Some(cs) = cur {
            match &cs.base {
                Some(b) if b == base => return true,
                Some(b) => cur = self.classes.get(b),
                None => break,
            }
        }
        false
    }

    fn fill_class_members(&mut self, def: &ClassDef) -> Result<(), SemanticError> {
        let mut fields = HashMap::new();
        for field in &def.fields {
            // Object fields are value slots; references and void cannot
            // live in them.
            if field.ty.is_ref {
                return Err(SemanticError::ReferenceField {
                    class: def.name.clone(),
                    field: field.name.clone(),
                });
            }
            if field.ty.is_void() {
                return Err(SemanticError::VoidField {
                    class: def.name.clone(),
                    field: field.name.clone(),
                });
            }
            if fields.contains_key(&field.name) {
                return Err(SemanticError::FieldRedefinition {
                    class: def.name.clone(),
                    field: field.name.clone(),
                });
            }
            fields.insert(field.name.clone(), field.ty.clone());
        }

        let mut ctors: Vec<CtorSymbol> = Vec::new();
        for ctor in &def.ctors {
            let param_types: Vec<Type> = ctor.params.iter().map(|p| p.ty.clone()).collect();
            if ctors.iter().any(|e| e.param_types == param_types) {
                return Err(SemanticError::CtorOverloadRedefinition(def.name.clone()));
            }
            ctors.push(CtorSymbol { param_types });
        }
        // No declared constructors: assume a synthetic default.
        if ctors.is_empty() {
            ctors.push(CtorSymbol {
                param_types: Vec::new(),
            });
        }

        let mut methods: HashMap<String, Vec<MethodSymbol>> = HashMap::new();
        for m in &def.methods {
            let sym = MethodSymbol {
                name: m.name.clone(),
                return_type: m.return_type.clone(),
                param_types: m.params.iter().map(|p| p.ty.clone()).collect(),
                is_virtual: m.is_virtual,
            };
            let overloads = methods.entry(m.name.clone()).or_default();
            if overloads.iter().any(|e| e.param_types == sym.param_types) {
                return Err(SemanticError::MethodOverloadRedefinition {
                    class: def.name.clone(),
                    method: m.name.clone(),
                });
            }
            overloads.push(sym);
        }

        let cs = self
            .classes
            .get_mut(&def.name)
            .ok_or_else(|| SemanticError::UnknownClass(def.name.clone()))?;
        cs.base = def.base.clone();
        cs.fields = fields;
        cs.ctors = ctors;
        cs.methods = methods;
        Ok(())
    }

    /// Bases declared, no cycles, every base has a default constructor
    fn check_inheritance(&self) -> Result<(), SemanticError> {
        for (name, cs) in &self.classes {
            if let Some(base) = &cs.base {
                if !self.has_class(base) {
                    return Err(SemanticError::UnknownBaseClass {
                        class: name.clone(),
                        base: base.clone(),
                    });
                }
            }
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for name in self.classes.keys() {
            self.cycle_dfs(name, &mut marks)?;
        }

        for cs in self.classes.values() {
            if let Some(base) = &cs.base {
                let base_cs = self.get(base)?;
                if !base_cs.ctors.iter().any(|c| c.param_types.is_empty()) {
                    return Err(SemanticError::NoDefaultBaseCtor(base.clone()));
                }
            }
        }
        Ok(())
    }

    fn cycle_dfs<'s>(
        &'s self,
        name: &'s str,
        marks: &mut HashMap<&'s str, Mark>,
    ) -> Result<(), SemanticError> {
        match marks.get(name).copied().unwrap_or(Mark::None) {
            // A back edge to a node still on the stack is a cycle.
            Mark::Temp => return Err(SemanticError::InheritanceCycle(name.to_string())),
            Mark::Perm => return Ok(()),
            Mark::None => {}
        }
        marks.insert(name, Mark::Temp);
        if let Some(base) = self.classes.get(name).and_then(|c| c.base.as_deref()) {
            self.cycle_dfs(base, marks)?;
        }
        marks.insert(name, Mark::Perm);
        Ok(())
    }

    /// All exact-signature matches for `name(params)` in `start`'s chain
    fn matches_in_chain(
        &self,
        start: &str,
        name: &str,
        params: &[Type],
    ) -> Vec<&MethodSymbol> {
        let mut found = Vec::new();
        let mut cur = self.classes.get(start);
        while let Some(cs) = cur {
            if let Some(overloads) = cs.methods.get(name) {
                found.extend(
                    overloads
                        .iter()
                        .filter(|cand| cand.param_types == params),
                );
            }
            cur = cs.base.as_deref().and_then(|b| self.classes.get(b));
        }
        found
    }

    /// Override validation and virtual propagation: a derived method whose
    /// name and parameter types match a method anywhere up the chain must
    /// keep the return type, and becomes virtual if any match up the chain
    /// is virtual.
    fn check_overrides_and_virtuals(&mut self) -> Result<(), SemanticError> {
        let names: Vec<String> = self.classes.keys().cloned().collect();
        let mut promotions: Vec<(String, String, usize)> = Vec::new();

        for name in &names {
            let cs = &self.classes[name];
            let Some(base) = cs.base.clone() else { continue };

            for (mname, overloads) in &cs.methods {
                for (idx, dm) in overloads.iter().enumerate() {
                    let ancestors = self.matches_in_chain(&base, mname, &dm.param_types);
                    for bm in &ancestors {
                        if bm.return_type != dm.return_type {
                            return Err(SemanticError::OverrideReturnMismatch {
                                class: name.clone(),
                                method: mname.clone(),
                            });
                        }
                    }
                    if !dm.is_virtual && ancestors.iter().any(|bm| bm.is_virtual) {
                        promotions.push((name.clone(), mname.clone(), idx));
                    }
                }
            }
        }

        for (class, method, idx) in promotions {
            if let Some(m) = self
                .classes
                .get_mut(&class)
                .and_then(|c| c.methods.get_mut(&method))
                .and_then(|v| v.get_mut(idx))
            {
                m.is_virtual = true;
            }
        }
        Ok(())
    }

    // ==================== Chain lookups ====================

    pub fn has_field_in_chain(&self, class: &str, field: &str) -> bool {
        let mut cur = self.classes.get(class);
        while let Some(cs) = cur {
            if cs.fields.contains_key(field) {
                return true;
            }
            cur = cs.base.as_deref().and_then(|b| self.classes.get(b));
        }
        false
    }

    /// Field type resolved through the inheritance chain (derived first)
    pub fn field_type_in_chain(&self, class: &str, field: &str) -> Result<Type, SemanticError> {
        let mut cur = Some(self.get(class)?);
        while let Some(cs) = cur {
            if let Some(ty) = cs.fields.get(field) {
                return Ok(ty.clone());
            }
            cur = match &cs.base {
                Some(b) => Some(self.get(b)?),
                None => None,
            };
        }
        Err(SemanticError::UnknownField {
            class: class.to_string(),
            field: field.to_string(),
        })
    }

    /// Merged field layout for a class: walking upward, the first
    /// occurrence of a field name is kept (derived wins).
    pub fn merged_fields(&self, class: &str) -> Result<HashMap<String, Type>, SemanticError> {
        let mut out = HashMap::new();
        let mut cur = Some(self.get(class)?);
        while let Some(cs) = cur {
            for (name, ty) in &cs.fields {
                out.entry(name.clone()).or_insert_with(|| ty.clone());
            }
            cur = match &cs.base {
                Some(b) => Some(self.get(b)?),
                None => None,
            };
        }
        Ok(out)
    }

    /// Resolve a method call against a static class: walk the chain and
    /// resolve within the first class that has any viable overload.
    /// Classes that merely reuse the name without a viable overload do not
    /// stop the walk; a class with a viable overload hides everything
    /// above it.
    pub fn resolve_method_call(
        &self,
        static_class: &str,
        method: &str,
        args: &[(Type, bool)],
    ) -> Result<&MethodSymbol, SemanticError> {
        let mut cur = Some(self.get(static_class)?);
        while let Some(cs) = cur {
            if let Some(overloads) = cs.methods.get(method) {
                match pick_overload(
                    overloads,
                    |m| m.param_types.as_slice(),
                    args,
                    |d, b| self.is_same_or_derived(d, b),
                    1,
                    0,
                ) {
                    Err(Ambiguous) => {
                        return Err(SemanticError::AmbiguousMethod(method.to_string()))
                    }
                    Ok(Some(best)) => return Ok(best),
                    Ok(None) => {}
                }
            }
            cur = match &cs.base {
                Some(b) => Some(self.get(b)?),
                None => None,
            };
        }
        Err(SemanticError::NoMatchingMethod(method.to_string()))
    }
}
