//! Deterministic accelerator registry with Vec storage.
//!
//! Tracks which component owns which accelerator: the launcher's global
//! toggle shortcut (`GLOBAL_OWNER`) and per-launcher shortcuts keyed by
//! launcher id. Lookups scan in registration order; `export` is sorted by owner.
//! This is the in-process `ConflictProber`.

use std::collections::BTreeMap;
use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

use super::probe::{ConflictProber, ProbeError};
use super::types::Accelerator;

/// Owner id of the launcher's show/hide shortcut.
pub const GLOBAL_OWNER: &str = "global";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("accelerator {accelerator} is already registered by '{owner}'")]
    Conflict { accelerator: String, owner: String },
    #[error("owner id must not be empty")]
    EmptyOwner,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Binding {
    owner: String,
    accelerator: Accelerator,
}

/// Registry of bound accelerators. Interior mutability so it can be shared
/// with probe threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct AcceleratorRegistry {
    bindings: Mutex<Vec<Binding>>,
}

impl AcceleratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Binding>> {
        self.bindings.lock()
    }

    /// Bind `accelerator` to `owner`, replacing the owner's previous binding.
    ///
    /// Returns the replaced accelerator, if any.
    pub fn register(
        &self,
        owner: &str,
        accelerator: Accelerator,
    ) -> Result<Option<Accelerator>, RegistryError> {
        if owner.trim().is_empty() {
            return Err(RegistryError::EmptyOwner);
        }

        let mut bindings = self.lock();

        if let Some(existing) = bindings
            .iter()
            .find(|b| b.accelerator == accelerator && b.owner != owner)
        {
            return Err(RegistryError::Conflict {
                accelerator: accelerator.to_canonical_string(),
                owner: existing.owner.clone(),
            });
        }

        let previous = match bindings.iter_mut().find(|b| b.owner == owner) {
            Some(binding) => Some(std::mem::replace(&mut binding.accelerator, accelerator)),
            None => {
                bindings.push(Binding {
                    owner: owner.to_string(),
                    accelerator,
                });
                None
            }
        };

        tracing::info!(
            category = "SHORTCUT",
            owner,
            accelerator = %accelerator,
            replaced = ?previous.map(|a| a.to_canonical_string()),
            "Registered accelerator"
        );

        Ok(previous)
    }

    /// Remove the owner's binding.
    pub fn unregister(&self, owner: &str) -> Option<Accelerator> {
        let mut bindings = self.lock();
        let index = bindings.iter().position(|b| b.owner == owner)?;
        let removed = bindings.remove(index).accelerator;
        tracing::info!(
            category = "SHORTCUT",
            owner,
            accelerator = %removed,
            "Unregistered accelerator"
        );
        Some(removed)
    }

    pub fn owner_of(&self, accelerator: &Accelerator) -> Option<String> {
        self.lock()
            .iter()
            .find(|b| b.accelerator == *accelerator)
            .map(|b| b.owner.clone())
    }

    pub fn binding_for(&self, owner: &str) -> Option<Accelerator> {
        self.lock()
            .iter()
            .find(|b| b.owner == owner)
            .map(|b| b.accelerator)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Export bindings as owner -> canonical string for persistence.
    pub fn export(&self) -> BTreeMap<String, String> {
        self.lock()
            .iter()
            .map(|b| (b.owner.clone(), b.accelerator.to_canonical_string()))
            .collect()
    }
}

impl ConflictProber for AcceleratorRegistry {
    fn check_accelerator(&self, candidate: &str) -> Result<bool, ProbeError> {
        // Anything that doesn't parse can't have been registered
        let Ok(accelerator) = Accelerator::parse(candidate) else {
            return Ok(false);
        };
        Ok(self.owner_of(&accelerator).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accel(s: &str) -> Accelerator {
        Accelerator::parse(s).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = AcceleratorRegistry::new();
        let toggle = accel("CommandOrControl+Shift+P");

        assert_eq!(registry.register(GLOBAL_OWNER, toggle), Ok(None));
        assert_eq!(registry.owner_of(&toggle), Some(GLOBAL_OWNER.to_string()));
        assert_eq!(registry.binding_for(GLOBAL_OWNER), Some(toggle));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_replaces_owner_binding() {
        let registry = AcceleratorRegistry::new();
        let first = accel("CommandOrControl+1");
        let second = accel("CommandOrControl+2");

        registry.register("vscode", first).unwrap();
        assert_eq!(registry.register("vscode", second), Ok(Some(first)));
        assert_eq!(registry.owner_of(&first), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_same_accelerator_for_same_owner_is_ok() {
        let registry = AcceleratorRegistry::new();
        let a = accel("Alt+Space");
        registry.register("terminal", a).unwrap();
        assert_eq!(registry.register("terminal", a), Ok(Some(a)));
    }

    #[test]
    fn test_register_conflict_with_other_owner() {
        let registry = AcceleratorRegistry::new();
        let a = accel("CommandOrControl+Shift+P");
        registry.register(GLOBAL_OWNER, a).unwrap();

        let err = registry.register("idea", a).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Conflict {
                accelerator: "CommandOrControl+Shift+P".to_string(),
                owner: GLOBAL_OWNER.to_string(),
            }
        );
        assert_eq!(registry.binding_for("idea"), None);
    }

    #[test]
    fn test_empty_owner_rejected() {
        let registry = AcceleratorRegistry::new();
        assert_eq!(
            registry.register("  ", accel("Alt+A")),
            Err(RegistryError::EmptyOwner)
        );
    }

    #[test]
    fn test_unregister() {
        let registry = AcceleratorRegistry::new();
        let a = accel("Alt+A");
        registry.register("x", a).unwrap();
        assert_eq!(registry.unregister("x"), Some(a));
        assert_eq!(registry.unregister("x"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_probe_matches_normalized_candidates() {
        let registry = AcceleratorRegistry::new();
        registry
            .register(GLOBAL_OWNER, accel("CommandOrControl+Shift+P"))
            .unwrap();

        assert_eq!(
            registry.check_accelerator("CommandOrControl+Shift+P"),
            Ok(true)
        );
        assert_eq!(registry.check_accelerator("shift+ctrl+p"), Ok(true));
        assert_eq!(registry.check_accelerator("CommandOrControl+P"), Ok(false));
        assert_eq!(registry.check_accelerator("garbage"), Ok(false));
    }

    #[test]
    fn test_registry_usable_after_panic_while_locked() {
        let registry = std::sync::Arc::new(AcceleratorRegistry::new());
        registry.register("x", accel("Alt+A")).unwrap();

        let shared = registry.clone();
        let result = std::thread::spawn(move || {
            let _bindings = shared.lock();
            panic!("panicked while holding the bindings lock");
        })
        .join();
        assert!(result.is_err());

        assert_eq!(registry.binding_for("x"), Some(accel("Alt+A")));
        registry.register("y", accel("Alt+B")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_export_preserves_canonical_strings() {
        let registry = AcceleratorRegistry::new();
        registry.register(GLOBAL_OWNER, accel("alt+shift+k")).unwrap();
        let exported = registry.export();
        assert_eq!(
            exported.get(GLOBAL_OWNER).map(String::as_str),
            Some("Shift+Alt+K")
        );
    }
}
