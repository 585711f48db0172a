//! Boot sequence, sound preference, screensaver idle tracking and the crash screen.
//!
//! Time never comes from a clock here: every transition that cares about time takes the current
//! timestamp in milliseconds from the dispatched action.

use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BootPhase {
    /// Asking whether to enable sound.
    #[default]
    SoundPrompt,
    Bios,
    Booting,
    Desktop,
    /// Terminal until the session is reset.
    Crashed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSession {
    pub phase: BootPhase,
    pub sound_enabled: bool,
    pub screensaver_active: bool,
    pub last_activity_ms: u64,
    pub screensaver_timeout_ms: u64,
}

impl SystemSession {
    pub fn new(screensaver_timeout_ms: u64) -> Self {
        Self {
            phase: BootPhase::SoundPrompt,
            sound_enabled: false,
            screensaver_active: false,
            last_activity_ms: 0,
            screensaver_timeout_ms,
        }
    }

    pub fn is_booted(&self) -> bool {
        self.phase == BootPhase::Desktop
    }

    pub fn is_crashed(&self) -> bool {
        self.phase == BootPhase::Crashed
    }

    /// Records the sound choice and moves on to the BIOS screen. Returns `false` outside the
    /// prompt.
    pub fn answer_sound_prompt(&mut self, enable_sound: bool) -> bool {
        if self.phase != BootPhase::SoundPrompt {
            debug!("ignoring sound prompt answer in {:?}", self.phase);
            return false;
        }
        self.sound_enabled = enable_sound;
        self.phase = BootPhase::Bios;
        true
    }

    /// BIOS screen finished; starts the boot screen.
    pub fn complete_bios(&mut self) -> bool {
        self.advance(BootPhase::Bios, BootPhase::Booting)
    }

    /// Jumps straight to the desktop from the BIOS or boot screen.
    pub fn skip_to_desktop(&mut self, now_ms: u64) -> bool {
        if !matches!(self.phase, BootPhase::Bios | BootPhase::Booting) {
            debug!("ignoring skip to desktop in {:?}", self.phase);
            return false;
        }
        self.enter_desktop(now_ms);
        true
    }

    pub fn complete_boot(&mut self, now_ms: u64) -> bool {
        if self.phase != BootPhase::Booting {
            debug!("ignoring boot completion in {:?}", self.phase);
            return false;
        }
        self.enter_desktop(now_ms);
        true
    }

    /// Pointer or keyboard activity. Returns `true` when it dismissed the screensaver.
    pub fn record_activity(&mut self, now_ms: u64) -> bool {
        self.last_activity_ms = self.last_activity_ms.max(now_ms);
        std::mem::replace(&mut self.screensaver_active, false)
    }

    /// Timer tick. Returns `true` when the screensaver was just shown.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.is_booted() || self.screensaver_active {
            return false;
        }
        let idle = now_ms.saturating_sub(self.last_activity_ms);
        if idle > self.screensaver_timeout_ms {
            debug!("idle for {idle} ms, starting screensaver");
            self.screensaver_active = true;
            return true;
        }
        false
    }

    /// Flips the sound preference and returns the new value.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Terminal until the session is rebuilt.
    pub fn crash(&mut self) {
        debug!("session crashed");
        self.phase = BootPhase::Crashed;
        self.screensaver_active = false;
    }

    fn advance(&mut self, from: BootPhase, to: BootPhase) -> bool {
        if self.phase != from {
            debug!("ignoring {from:?} -> {to:?} transition in {:?}", self.phase);
            return false;
        }
        self.phase = to;
        true
    }

    fn enter_desktop(&mut self, now_ms: u64) {
        self.phase = BootPhase::Desktop;
        self.last_activity_ms = now_ms;
        self.screensaver_active = false;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn booted() -> SystemSession {
        let mut session = SystemSession::new(120_000);
        session.answer_sound_prompt(false);
        session.complete_bios();
        session.complete_boot(1_000);
        session
    }

    #[test]
    fn boot_walks_through_every_phase() {
        let mut session = SystemSession::new(120_000);
        assert!(session.answer_sound_prompt(true));
        assert!(session.sound_enabled);
        assert_eq!(session.phase, BootPhase::Bios);

        assert!(!session.complete_boot(0));
        assert!(session.complete_bios());
        assert_eq!(session.phase, BootPhase::Booting);
        assert!(session.complete_boot(500));
        assert!(session.is_booted());
        assert_eq!(session.last_activity_ms, 500);
        assert!(!session.answer_sound_prompt(false));
    }

    #[test]
    fn skip_jumps_from_bios_to_desktop() {
        let mut session = SystemSession::new(120_000);
        assert!(!session.skip_to_desktop(0));
        session.answer_sound_prompt(false);
        assert!(session.skip_to_desktop(10));
        assert_eq!(session.phase, BootPhase::Desktop);
    }

    #[test]
    fn screensaver_starts_after_timeout_and_activity_dismisses_it() {
        let mut session = booted();
        assert!(!session.tick(121_000));
        assert!(session.tick(121_001));
        assert!(session.screensaver_active);
        assert!(!session.tick(200_000));

        assert!(session.record_activity(200_500));
        assert!(!session.screensaver_active);
        assert!(!session.record_activity(200_600));
        assert!(!session.tick(300_000));
    }

    #[test]
    fn screensaver_never_runs_before_boot() {
        let mut session = SystemSession::new(10);
        assert!(!session.tick(1_000_000));
    }

    #[test]
    fn crash_is_terminal_for_boot_transitions() {
        let mut session = booted();
        session.crash();
        assert!(session.is_crashed());
        assert!(!session.complete_bios());
        assert!(!session.tick(10_000_000));
        assert!(session.toggle_sound());
    }
}
