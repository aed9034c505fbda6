//! Press-and-hold commit gesture.
//!
//! One pointer at a time may hold. A hold starts only over a committable hint,
//! and ends one of three ways: its deadline passes (`poll` hands back the
//! token), the pointer lifts or leaves, or it drifts past the move threshold.

use echoes_core::{Params, Vec2};
use input::{PointerButton, PointerId};
use std::collections::HashSet;
use std::time::Duration;

/// Cancel token for one hold. Each hold gets a fresh token; once a hold ends its
/// token is dead and can never fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoldToken(u64);

/// Why a hold ended without firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Released,
    Cancelled,
    Left,
    Moved,
}

/// Where the hold gesture is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldPhase {
    Idle,
    Holding {
        pointer: PointerId,
        button: PointerButton,
        origin: Vec2,
        deadline: Duration,
        token: HoldToken,
    },
}

/// Press-and-hold state machine. Driven by pointer events and `poll`.
#[derive(Debug)]
pub struct HoldController {
    hold: Duration,
    move_threshold_sq: f32,
    phase: HoldPhase,
    next_token: u64,
}

impl HoldController {
    pub fn new(params: &Params) -> Self {
        Self {
            hold: params.hold(),
            move_threshold_sq: params.hold_move_threshold_sq,
            phase: HoldPhase::Idle,
            next_token: 0,
        }
    }

    /// Current phase, copied out.
    pub fn phase(&self) -> HoldPhase {
        self.phase
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.phase, HoldPhase::Holding { .. })
    }

    /// The pointer holding, if any.
    pub fn holder(&self) -> Option<PointerId> {
        match self.phase {
            HoldPhase::Holding { pointer, .. } => Some(pointer),
            HoldPhase::Idle => None,
        }
    }

    /// Whether the hold in progress has reached its deadline at `now`.
    pub fn is_due(&self, now: Duration) -> bool {
        matches!(self.phase, HoldPhase::Holding { deadline, .. } if now >= deadline)
    }

    /// Whether `token` belongs to the hold in progress.
    pub fn is_live(&self, token: HoldToken) -> bool {
        matches!(self.phase, HoldPhase::Holding { token: t, .. } if t == token)
    }

    /// Start a hold if nothing else is holding and the hint can be committed.
    pub fn press(
        &mut self,
        pointer: PointerId,
        button: PointerButton,
        position: Vec2,
        now: Duration,
        committable: bool,
    ) -> Option<HoldToken> {
        if self.is_holding() {
            log::debug!("Pointer {:?} pressed while another hold is active", pointer);
            return None;
        }
        if !committable {
            return None;
        }
        let token = HoldToken(self.next_token);
        self.next_token += 1;
        self.phase = HoldPhase::Holding {
            pointer,
            button,
            origin: position,
            deadline: now + self.hold,
            token,
        };
        log::debug!("Hold {:?} started by {:?}", token, pointer);
        Some(token)
    }

    /// Cancel the hold if `pointer` drifted too far from where it pressed.
    pub fn moved(&mut self, pointer: PointerId, position: Vec2) -> Option<(HoldToken, CancelReason)> {
        match self.phase {
            HoldPhase::Holding { pointer: p, origin, .. }
                if p == pointer && origin.distance_squared(position) > self.move_threshold_sq =>
            {
                self.cancel(CancelReason::Moved)
            }
            _ => None,
        }
    }

    /// Cancel the hold if `pointer` lifts the button it started with. Other
    /// buttons on the same pointer leave the hold alone.
    pub fn lifted(&mut self, pointer: PointerId, button: PointerButton) -> Option<(HoldToken, CancelReason)> {
        match self.phase {
            HoldPhase::Holding { pointer: p, button: b, .. } if p == pointer && b == button => {
                self.cancel(CancelReason::Released)
            }
            _ => None,
        }
    }

    /// Cancel the hold if `pointer` is the one holding, whatever its buttons.
    pub fn release(&mut self, pointer: PointerId, reason: CancelReason) -> Option<(HoldToken, CancelReason)> {
        match self.phase {
            HoldPhase::Holding { pointer: p, .. } if p == pointer => self.cancel(reason),
            _ => None,
        }
    }

    /// Cancel whatever hold is in progress.
    pub fn cancel(&mut self, reason: CancelReason) -> Option<(HoldToken, CancelReason)> {
        match std::mem::replace(&mut self.phase, HoldPhase::Idle) {
            HoldPhase::Holding { token, .. } => {
                log::debug!("Hold {:?} cancelled: {:?}", token, reason);
                Some((token, reason))
            }
            HoldPhase::Idle => None,
        }
    }

    /// Finish the hold once its deadline has passed, returning its token.
    pub fn poll(&mut self, now: Duration) -> Option<HoldToken> {
        match self.phase {
            HoldPhase::Holding { deadline, token, .. } if now >= deadline => {
                self.phase = HoldPhase::Idle;
                Some(token)
            }
            _ => None,
        }
    }
}

/// Who may place forms instantly, bypassing the hold.
#[derive(Debug, Clone, Default)]
pub struct SpawnPolicy {
    admins: HashSet<String>,
}

impl SpawnPolicy {
    /// Policy admitting exactly the listed wallets.
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `wallet` may place instantly. Signed-out viewers never may.
    pub fn allows(&self, wallet: Option<&str>) -> bool {
        wallet.is_some_and(|w| self.admins.contains(w))
    }
}
