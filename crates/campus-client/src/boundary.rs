//! Error boundary around view composition.
//!
//! A panic while building a view is caught and turned into a
//! [`RecoveryScreen`] instead of taking the process down.

use std::any::Any;
use std::panic::{self, UnwindSafe};

use crate::routes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Re-run the failed view.
    Reload,
    ReturnToDashboard,
}

impl RecoveryAction {
    /// Route to open for this action; `None` means stay put and retry.
    pub fn route(self) -> Option<&'static str> {
        match self {
            RecoveryAction::Reload => None,
            RecoveryAction::ReturnToDashboard => Some(routes::DASHBOARD),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryScreen {
    pub message: String,
    pub actions: [RecoveryAction; 2],
}

impl RecoveryScreen {
    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        Self {
            message: panic_message(payload),
            actions: [RecoveryAction::Reload, RecoveryAction::ReturnToDashboard],
        }
    }
}

/// Run `compose`, converting a panic into a recovery screen.
pub fn guard<T, F>(compose: F) -> Result<T, RecoveryScreen>
where
    F: FnOnce() -> T + UnwindSafe,
{
    panic::catch_unwind(compose).map_err(|payload| {
        let screen = RecoveryScreen::from_panic(payload.as_ref());
        tracing::error!(error = %screen.message, "view composition panicked");
        screen
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Something went wrong".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_passes_through() {
        assert_eq!(guard(|| 41 + 1), Ok(42));
    }

    #[test]
    fn panic_becomes_recovery_screen() {
        let screen = guard(|| -> u32 { panic!("missing session row") }).unwrap_err();
        assert_eq!(screen.message, "missing session row");
        assert_eq!(screen.actions[1].route(), Some(routes::DASHBOARD));
        assert_eq!(screen.actions[0].route(), None);
    }

    #[test]
    fn formatted_panic_message_is_kept() {
        let id = 7;
        let screen = guard(|| -> u8 { panic!("class {} vanished", id) }).unwrap_err();
        assert_eq!(screen.message, "class 7 vanished");
    }
}
