//! Application bootstrap: turns open requests and startup restoration into window manager calls.

use desktop_app_contract::{ModuleId, ModuleRegistry};
use leptos::logging;

use crate::window_manager::{OpenOutcome, WindowManager, WindowManagerError};

/// Opens (or refocuses) the window for the module registered as `raw_id`.
///
/// # Errors
///
/// Returns [`WindowManagerError::InvalidModuleId`] for malformed ids and
/// [`WindowManagerError::ModuleNotRegistered`] when no such module is registered. No window is
/// created in either case.
pub fn open_module(
    manager: &mut WindowManager,
    registry: &ModuleRegistry,
    raw_id: &str,
) -> Result<OpenOutcome, WindowManagerError> {
    let id = ModuleId::new(raw_id).map_err(WindowManagerError::InvalidModuleId)?;
    let module = registry
        .get(&id)
        .ok_or(WindowManagerError::ModuleNotRegistered(id))?;
    Ok(manager.create_or_focus(module))
}

/// Reopens every registered module whose persisted state says it was open, in registration
/// order, minimizing again those saved as minimized.
///
/// Returns the ids that were reopened.
pub fn restore_session(
    manager: &mut WindowManager,
    registry: &ModuleRegistry,
) -> Vec<ModuleId> {
    let mut reopened = Vec::new();
    for module in registry.iter() {
        let Some(saved) = manager.persisted_state(&module.id) else {
            continue;
        };
        if !saved.open || manager.is_open(&module.id) {
            continue;
        }
        manager.create_or_focus(module.clone());
        if saved.minimized {
            manager.minimize(&module.id);
        }
        reopened.push(module.id.clone());
    }
    if !reopened.is_empty() {
        logging::log!("restored {} window(s) from the previous session", reopened.len());
    }
    reopened
}
