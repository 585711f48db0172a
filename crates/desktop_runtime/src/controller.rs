//! Owner of a desktop session: reducer container, effect queue and effect delivery.
//!
//! Presentation layers read [`DesktopController::state`], dispatch [`DesktopAction`] values and
//! drain the queued [`RuntimeEffect`]s into an [`EffectSink`].

use log::warn;

use crate::{
    menus::{context_menu, ContextMenuEntry, ContextMenuTarget},
    model::DesktopState,
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
    seed::{SeedError, SeedTables},
};

/// Executes runtime effects on behalf of the controller (audio, message boxes, crash screen).
pub trait EffectSink {
    fn run_effect(&mut self, effect: RuntimeEffect);
}

impl<F: FnMut(RuntimeEffect)> EffectSink for F {
    fn run_effect(&mut self, effect: RuntimeEffect) {
        self(effect)
    }
}

#[derive(Debug, Clone)]
pub struct DesktopController {
    state: DesktopState,
    seed: SeedTables,
    effects: Vec<RuntimeEffect>,
}

impl DesktopController {
    /// Starts a session from `seed`.
    ///
    /// # Errors
    ///
    /// Returns a [`SeedError`] when the tables do not validate.
    pub fn new(seed: SeedTables) -> Result<Self, SeedError> {
        let state = DesktopState::from_seed(&seed)?;
        Ok(Self {
            state,
            seed,
            effects: Vec::new(),
        })
    }

    /// Starts a session from the tables compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`SeedError`] if the built-in catalog is invalid.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::new(SeedTables::builtin()?)
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn seed(&self) -> &SeedTables {
        &self.seed
    }

    /// Applies one action. The state is only replaced when the reducer succeeds, so a failed
    /// action leaves the session exactly as it was.
    ///
    /// # Errors
    ///
    /// Propagates the [`ReducerError`] after logging it.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<(), ReducerError> {
        let mut next = self.state.clone();
        match reduce_desktop(&mut next, &self.seed, action) {
            Ok(effects) => {
                self.state = next;
                self.effects.extend(effects);
                Ok(())
            }
            Err(err) => {
                warn!("desktop reducer error: {err}");
                Err(err)
            }
        }
    }

    /// Effects queued since the last drain, in emission order.
    pub fn pending_effects(&self) -> &[RuntimeEffect] {
        &self.effects
    }

    pub fn take_effects(&mut self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Drains the queue into `sink` in order.
    pub fn run_effects(&mut self, sink: &mut impl EffectSink) {
        for effect in self.take_effects() {
            sink.run_effect(effect);
        }
    }

    pub fn context_menu(
        &self,
        target: &ContextMenuTarget,
        viewport_height: i32,
    ) -> Vec<ContextMenuEntry> {
        context_menu(&self.state, target, viewport_height)
    }
}
