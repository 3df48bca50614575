// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type name resolution.
//!
//! Type names use the `Namespace.Type, Module` form. The module part is
//! optional; a trailing `[]` on the type part names a sequence of that type.
//! Anything after a second comma (version, culture, ...) is ignored.

use crate::dynamic::{PrimitiveKind, TypeDescriptor, CORE_MODULE};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolves type names to descriptors and exposes module contents.
///
/// Implementations must be shareable across threads; resolution never
/// mutates the registry.
pub trait TypeRegistry: Send + Sync {
    /// Resolve a `Namespace.Type, Module` name.
    fn resolve(&self, type_name: &str) -> Result<Arc<TypeDescriptor>>;

    /// Load the module named `module`.
    fn load_module(&self, module: &str) -> Result<ModuleInfo>;
}

/// Parsed `Namespace.Type, Module` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeName<'a> {
    pub name: &'a str,
    pub module: Option<&'a str>,
}

impl<'a> TypeName<'a> {
    pub fn parse(raw: &'a str) -> Result<Self> {
        let mut parts = raw.splitn(3, ',');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(Error::type_resolution(raw, "type name is empty"));
        }
        let module = parts.next().map(str::trim).filter(|m| !m.is_empty());
        Ok(Self { name, module })
    }

    /// Element name when this names a sequence.
    pub fn element(&self) -> Option<&'a str> {
        self.name.strip_suffix("[]")
    }
}

/// Types registered under one module.
#[derive(Debug, Clone, Default)]
pub struct ModuleInfo {
    pub name: String,
    exported: Vec<Arc<TypeDescriptor>>,
    internal: Vec<Arc<TypeDescriptor>>,
}

impl ModuleInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Publicly visible types, in registration order.
    pub fn exported_types(&self) -> &[Arc<TypeDescriptor>] {
        &self.exported
    }

    /// Names of the exported types.
    pub fn exported_type_names(&self) -> Vec<&str> {
        self.exported.iter().map(|t| t.name.as_str()).collect()
    }

    fn find(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.exported
            .iter()
            .chain(self.internal.iter())
            .find(|t| t.name == name)
    }

    fn insert(&mut self, desc: Arc<TypeDescriptor>, exported: bool) {
        let list = if exported {
            &mut self.exported
        } else {
            &mut self.internal
        };
        match list.iter_mut().find(|t| t.name == desc.name) {
            Some(slot) => *slot = desc,
            None => list.push(desc),
        }
    }
}

/// Static-registration [`TypeRegistry`]: modules mapped to their types.
///
/// A fresh registry contains the `core` module with `core.Object` and every
/// primitive.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleInfo>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Registry holding only the built-in core module.
    #[must_use]
    pub fn new() -> Self {
        let mut core = ModuleInfo::new(CORE_MODULE);
        core.insert(Arc::new(TypeDescriptor::object()), true);
        for kind in PrimitiveKind::ALL {
            core.insert(Arc::new(TypeDescriptor::primitive(kind)), true);
        }
        let mut modules = BTreeMap::new();
        modules.insert(CORE_MODULE.to_string(), core);
        Self { modules }
    }

    /// Create an empty module if it does not exist yet.
    pub fn add_module(&mut self, module: &str) -> &mut ModuleInfo {
        self.modules
            .entry(module.to_string())
            .or_insert_with(|| ModuleInfo::new(module))
    }

    /// Register an exported type under its module (core when unset).
    pub fn register(&mut self, desc: TypeDescriptor) -> Arc<TypeDescriptor> {
        self.insert(desc, true)
    }

    /// Register a type that resolves but is not listed among the exports.
    pub fn register_internal(&mut self, desc: TypeDescriptor) -> Arc<TypeDescriptor> {
        self.insert(desc, false)
    }

    fn insert(&mut self, desc: TypeDescriptor, exported: bool) -> Arc<TypeDescriptor> {
        let desc = Arc::new(desc);
        let module = desc.module.clone().unwrap_or_else(|| CORE_MODULE.to_string());
        log::trace!("register type {} in module {}", desc.name, module);
        self.add_module(&module).insert(Arc::clone(&desc), exported);
        desc
    }

    /// Number of registered modules, core included.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    fn lookup(&self, raw: &str, name: &TypeName<'_>) -> Result<Arc<TypeDescriptor>> {
        if let Some(element) = name.element() {
            let element = self.lookup(
                raw,
                &TypeName {
                    name: element,
                    module: name.module,
                },
            )?;
            return Ok(Arc::new(TypeDescriptor::sequence(element)));
        }

        match name.module {
            Some(module) => {
                let info = self.modules.get(module).ok_or_else(|| {
                    Error::type_resolution(raw, format!("module '{module}' is not loaded"))
                })?;
                info.find(name.name).cloned().ok_or_else(|| {
                    Error::type_resolution(
                        raw,
                        format!("type '{}' does not exist in module '{module}'", name.name),
                    )
                })
            }
            None => self
                .modules
                .get(CORE_MODULE)
                .and_then(|core| core.find(name.name))
                .or_else(|| self.modules.values().find_map(|m| m.find(name.name)))
                .cloned()
                .ok_or_else(|| {
                    Error::type_resolution(raw, format!("type '{}' is not registered", name.name))
                }),
        }
    }
}

impl TypeRegistry for ModuleRegistry {
    fn resolve(&self, type_name: &str) -> Result<Arc<TypeDescriptor>> {
        let parsed = TypeName::parse(type_name)?;
        self.lookup(type_name, &parsed)
    }

    fn load_module(&self, module: &str) -> Result<ModuleInfo> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| Error::ModuleLoad {
                module: module.to_string(),
                reason: "module is not registered".to_string(),
            })
    }
}
