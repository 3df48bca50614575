// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Diagnostics for unresolved type names.
//!
//! When a caller knows which module a type should come from, a resolution
//! failure is expanded with what that module actually exports, which usually
//! reveals a misspelled namespace or a missing registration.

use crate::dynamic::{ModuleInfo, TypeRegistry};
use crate::error::{Error, Result};
use std::fmt;

/// Describe `error` in terms of the contents of `module_hint`.
///
/// The text lists the hinted module's exported type names, or the reason the
/// module could not be loaded, and ends with the original error message.
pub fn explain(error: &Error, module_hint: Option<&str>, types: &dyn TypeRegistry) -> String {
    let module = module_hint.map(|name| {
        let loaded = types.load_module(name);
        if let Err(load) = &loaded {
            log::warn!("diagnostics could not load module {name}: {load}");
        }
        (name, loaded)
    });
    Explanation { error, module }.to_string()
}

struct Explanation<'a> {
    error: &'a Error,
    module: Option<(&'a str, Result<ModuleInfo>)>,
}

impl fmt::Display for Explanation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some((module, Ok(info))) => {
                let names = info.exported_type_names();
                if names.is_empty() {
                    writeln!(f, "Module '{module}' exports no types.")?;
                } else {
                    writeln!(f, "Module '{module}' exports {} types:", names.len())?;
                    for name in names {
                        writeln!(f, "  {name}")?;
                    }
                }
            }
            Some((module, Err(load))) => {
                writeln!(f, "Module '{module}' could not be inspected: {load}")?;
            }
            None => {}
        }
        write!(f, "{}", self.error)
    }
}

/// Wrap a type resolution failure into [`Error::Diagnosed`].
///
/// Other errors, or a missing hint, pass through unchanged.
pub fn enrich(error: Error, module_hint: Option<&str>, types: &dyn TypeRegistry) -> Error {
    match (&error, module_hint) {
        (Error::TypeResolution { .. }, Some(_)) => Error::Diagnosed {
            message: explain(&error, module_hint, types),
            source: Box::new(error),
        },
        _ => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{ModuleRegistry, TypeDescriptorBuilder};

    fn registry() -> ModuleRegistry {
        let mut reg = ModuleRegistry::new();
        for name in ["MyAssembly.Level", "MyAssembly.Enemy"] {
            reg.register(TypeDescriptorBuilder::new(name).module("MyAssembly").build());
        }
        reg.add_module("Empty");
        reg
    }

    #[test]
    fn test_explain_lists_exports() {
        let reg = registry();
        let err = reg.resolve("MyAssembly.Lvl, MyAssembly").expect_err("missing");
        let text = explain(&err, Some("MyAssembly"), &reg);
        assert!(text.starts_with("Module 'MyAssembly' exports 2 types:\n"));
        assert!(text.contains("  MyAssembly.Level\n"));
        assert!(text.contains("  MyAssembly.Enemy\n"));
        assert!(text.ends_with(&err.to_string()));
    }

    #[test]
    fn test_explain_full_text() {
        let reg = registry();
        let err = reg.resolve("MyAssembly.Lvl, MyAssembly").expect_err("missing");
        assert_eq!(
            explain(&err, Some("MyAssembly"), &reg),
            format!("Module 'MyAssembly' exports 2 types:\n  MyAssembly.Level\n  MyAssembly.Enemy\n{err}")
        );
        assert_eq!(explain(&err, None, &reg), err.to_string());
    }

    #[test]
    fn test_explain_reports_load_failure() {
        let reg = registry();
        let err = reg.resolve("Other.Type, Other").expect_err("missing");
        let text = explain(&err, Some("Other"), &reg);
        assert!(text.contains("could not load module 'Other'"));
        assert!(text.ends_with(&err.to_string()));

        let text = explain(&err, Some("Empty"), &reg);
        assert!(text.starts_with("Module 'Empty' exports no types."));
    }

    #[test]
    fn test_enrich_only_wraps_resolution_with_hint() {
        let reg = registry();
        let err = reg.resolve("MyAssembly.Lvl, MyAssembly").expect_err("missing");
        let enriched = enrich(err, Some("MyAssembly"), &reg);
        assert!(matches!(enriched, Error::Diagnosed { .. }));
        assert!(enriched.is_type_resolution());

        let err = reg.resolve("MyAssembly.Lvl, MyAssembly").expect_err("missing");
        assert!(matches!(enrich(err, None, &reg), Error::TypeResolution { .. }));

        let other = Error::MalformedPayload("bad".into());
        assert!(matches!(
            enrich(other, Some("MyAssembly"), &reg),
            Error::MalformedPayload(_)
        ));
    }
}
