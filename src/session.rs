/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Session controller: input modes, the assignment state machine, and reset rules.
//!
//! # The state machine
//!
//! ```text
//!   Idle ──add──▶ Filling ──add (size == capacity)──▶ Ready ──partition──▶ Assigned
//!    ▲               ▲                                                      │
//!    │               └──────────── remove any token (roles cleared) ────────┘
//!    └── clear / mode switch / capacity change (from any state)
//! ```
//!
//! The phase is never stored. It is derived from the registry size and the
//! `partitioned` flag, so it cannot drift from the token set.
//!
//! # Modes
//!
//! - [`Mode::Continuous`]: persistent contacts. The partition fires the
//!   moment the registry fills. Contacts beyond capacity are tracked as
//!   overflow and reported through [`StatusReport::Excess`].
//! - [`Mode::Discrete`]: tap tokens. Taps add, tapping a token removes, and
//!   the operator triggers [`Session::assign`] explicitly.
//!
//! # Invariants
//!
//! - `is_partitioned()` implies every live token has a role.
//! - `!is_partitioned()` implies no live token has a role.
//! - Right after a partition each role is held by exactly `capacity / 2` tokens.
//! - Any removal while assigned clears every role (no partial re-labelling).
//! - Mode switches and capacity changes always clear the surface.

use alloc::format;
use alloc::string::String;
use core::fmt;

use hashbrown::HashSet;
use rand::RngCore;
use tracing::{debug, error, info};

use crate::arena::Arena;
use crate::error::{validate_capacity, TeamError};
use crate::partition::partition;
use crate::registry::{ContactRegistry, LabelPolicy};
use crate::render::{Notifier, Renderer};
use crate::token::{ContactId, Position};

// ─── Mode ───────────────────────────────────────────────────────────────────

/// Input mode of the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Persistent contacts (fingers held on the surface).
    #[default]
    Continuous,
    /// Discrete taps placing and removing tokens.
    Discrete,
}

impl Mode {
    /// Labelling policy the registry uses in this mode.
    pub fn label_policy(&self) -> LabelPolicy {
        match self {
            Mode::Continuous => LabelPolicy::Positional,
            Mode::Discrete => LabelPolicy::Sequential,
        }
    }

    /// The other mode.
    pub fn toggled(&self) -> Mode {
        match self {
            Mode::Continuous => Mode::Discrete,
            Mode::Discrete => Mode::Continuous,
        }
    }
}

// ─── Config ─────────────────────────────────────────────────────────────────

/// Operator configuration. Read only at session-reset boundaries.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Number of players to split. Positive and even. Default: 10.
    pub capacity: usize,
    /// Starting input mode. Default: [`Mode::Continuous`].
    pub mode: Mode,
    /// Minimum distance from the surface edge for simulated contacts. Default: 90.0.
    pub sim_padding: f32,
}

impl SessionConfig {
    /// Reject a configuration whose capacity cannot be split evenly.
    pub fn validate(&self) -> Result<(), TeamError> {
        validate_capacity(self.capacity).map(|_| ())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            mode: Mode::Continuous,
            sim_padding: 90.0,
        }
    }
}

// ─── Phase & status ─────────────────────────────────────────────────────────

/// Where the session sits in the assignment lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionPhase {
    /// No tokens.
    Idle,
    /// Some tokens, fewer than capacity.
    Filling,
    /// Exactly capacity tokens, not yet split.
    Ready,
    /// Exactly capacity tokens, split into teams.
    Assigned,
}

/// What the status surface should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusReport {
    /// Continuous mode, still collecting contacts.
    Waiting {
        /// Tokens on the surface.
        count: usize,
        /// Target count.
        capacity: usize,
    },
    /// Continuous mode, more contacts are down than the target count.
    ///
    /// Shown ahead of [`StatusReport::Assigned`] while any overflow contact is live.
    Excess {
        /// Tokens on the surface.
        count: usize,
        /// Contacts rejected because the surface was full.
        overflow: usize,
        /// Target count.
        capacity: usize,
    },
    /// Capacity reached, teams not yet assigned.
    Ready {
        /// Target count.
        capacity: usize,
    },
    /// Teams are assigned.
    Assigned {
        /// Tokens playing Offense.
        offense: usize,
        /// Tokens playing Defense.
        defense: usize,
    },
    /// Discrete mode, collecting taps.
    Tapping {
        /// Tokens on the surface.
        count: usize,
        /// Target count.
        capacity: usize,
    },
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StatusReport::Waiting { count, capacity } => {
                write!(f, "Touch mode: waiting for {capacity} fingers ({count}/{capacity})")
            }
            StatusReport::Excess { capacity, .. } => {
                write!(f, "Touch mode: more than {capacity} fingers, keep only {capacity}")
            }
            StatusReport::Ready { capacity } => {
                write!(f, "{capacity} fingers, assigning teams...")
            }
            StatusReport::Assigned { offense, defense } => {
                write!(f, "Teams assigned: {offense} Offense / {defense} Defense")
            }
            StatusReport::Tapping { count, capacity } => {
                write!(f, "Tap mode: tap to add or remove ({count}/{capacity})")
            }
        }
    }
}

// ─── Session ────────────────────────────────────────────────────────────────

/// Orchestrates one local team-picking session.
///
/// Owns the [`ContactRegistry`], the presentation collaborators and the
/// random source. Every method runs to completion synchronously; the host
/// calls them from its input event handlers in delivery order.
///
/// ```rust
/// use rand::rngs::mock::StepRng;
/// use teamtap_core::render::{NoticeLog, RenderLog};
/// use teamtap_core::session::{Session, SessionConfig, SessionPhase};
/// use teamtap_core::token::Position;
///
/// let cfg = SessionConfig { capacity: 2, ..SessionConfig::default() };
/// let mut s = Session::new(cfg, RenderLog::new(), NoticeLog::new(), StepRng::new(0, 1)).unwrap();
/// s.contact_start(1, Position::new(10.0, 10.0)).unwrap();
/// assert_eq!(s.phase(), SessionPhase::Filling);
/// s.contact_start(2, Position::new(50.0, 10.0)).unwrap();
/// assert_eq!(s.phase(), SessionPhase::Assigned);
/// assert_eq!(s.team_counts(), (1, 1));
/// ```
pub struct Session<R, N, G> {
    config: SessionConfig,
    registry: ContactRegistry,
    partitioned: bool,
    overflow: HashSet<u64>,
    renderer: R,
    notifier: N,
    rng: G,
}

impl<R: Renderer, N: Notifier, G: RngCore> Session<R, N, G> {
    /// Start an empty session.
    pub fn new(config: SessionConfig, renderer: R, notifier: N, rng: G) -> Result<Self, TeamError> {
        config.validate()?;
        let registry = ContactRegistry::new(config.capacity, config.mode.label_policy());
        Ok(Self {
            config,
            registry,
            partitioned: false,
            overflow: HashSet::new(),
            renderer,
            notifier,
            rng,
        })
    }

    // ── Continuous input ───────────────────────────────────────────────────

    /// A contact went down at `position`.
    ///
    /// Ignored in discrete mode. At capacity the contact is tracked as
    /// overflow and [`TeamError::CapacityExceeded`] is returned. When this
    /// contact fills the surface the teams are assigned immediately.
    pub fn contact_start(&mut self, contact: u64, position: Position) -> Result<SessionPhase, TeamError> {
        if self.config.mode != Mode::Continuous {
            debug!(contact, "contact start ignored in discrete mode");
            return Ok(self.phase());
        }

        let id = ContactId::Contact(contact);
        match self.registry.add(id, position, &mut self.renderer) {
            Ok(rec) => debug!(contact = %id, label = rec.label, "contact registered"),
            Err(e @ TeamError::CapacityExceeded { .. }) => {
                if self.overflow.insert(contact) {
                    debug!(contact = %id, overflow = self.overflow.len(), "contact beyond capacity");
                }
                return Err(e);
            }
            Err(e) => {
                debug!(contact = %id, error = %e, "contact start ignored");
                return Err(e);
            }
        }

        if self.registry.is_full() && !self.partitioned {
            self.apply_partition();
        }
        Ok(self.phase())
    }

    /// A contact moved. Unknown and overflow contacts are ignored.
    pub fn contact_move(&mut self, contact: u64, position: Position) -> Result<(), TeamError> {
        if self.overflow.contains(&contact) {
            return Ok(());
        }
        let id = ContactId::Contact(contact);
        self.registry
            .move_to(id, position, &mut self.renderer)
            .map(|_| ())
            .inspect_err(|e| debug!(contact = %id, error = %e, "contact move ignored"))
    }

    /// A contact lifted.
    ///
    /// Registered tokens stay on the surface after release; only overflow
    /// tracking is dropped. Returns `true` if the contact was overflow.
    pub fn contact_end(&mut self, contact: u64) -> bool {
        let was_overflow = self.overflow.remove(&contact);
        if was_overflow {
            debug!(contact, remaining = self.overflow.len(), "overflow contact released");
        }
        was_overflow
    }

    /// The input source cancelled a contact. Same as [`contact_end`](Self::contact_end).
    pub fn contact_cancel(&mut self, contact: u64) -> bool {
        self.contact_end(contact)
    }

    // ── Discrete input ─────────────────────────────────────────────────────

    /// Place a tap token. Returns its id, or `None` outside discrete mode.
    ///
    /// When the surface is full the operator is told to remove a token first.
    pub fn tap(&mut self, position: Position) -> Result<Option<ContactId>, TeamError> {
        if self.config.mode != Mode::Discrete {
            return Ok(None);
        }
        match self.registry.add_generated(position, &mut self.renderer) {
            Ok(rec) => {
                debug!(contact = %rec.id, label = rec.label, "tap token placed");
                Ok(Some(rec.id))
            }
            Err(e) => {
                if let TeamError::CapacityExceeded { capacity } = e {
                    self.notifier.notify(&format!(
                        "Already {capacity} tokens. Tap a token to remove."
                    ));
                }
                Err(e)
            }
        }
    }

    /// The operator tapped an existing token. Removes it in discrete mode.
    ///
    /// Returns `Ok(false)` outside discrete mode.
    pub fn tap_token(&mut self, id: ContactId) -> Result<bool, TeamError> {
        if self.config.mode != Mode::Discrete {
            return Ok(false);
        }
        self.remove_token(id).map(|()| true)
    }

    /// Remove one token. Any assignment is revoked in full.
    pub fn remove_token(&mut self, id: ContactId) -> Result<(), TeamError> {
        let rec = self
            .registry
            .remove(id, &mut self.renderer)
            .inspect_err(|e| debug!(contact = %id, error = %e, "remove ignored"))?;
        debug!(contact = %rec.id, label = rec.label, "token removed");
        self.revoke_assignment();
        Ok(())
    }

    /// Operator-triggered assignment (discrete mode).
    ///
    /// Returns `true` only if a partition happened. A second trigger before
    /// any removal is a no-op.
    pub fn assign(&mut self) -> bool {
        if self.config.mode != Mode::Discrete {
            debug!("assign ignored in continuous mode");
            return false;
        }
        if self.registry.len() != self.config.capacity {
            let capacity = self.config.capacity;
            self.notifier
                .notify(&format!("Need exactly {capacity} tokens to assign."));
            return false;
        }
        if self.partitioned {
            debug!("teams already assigned");
            return false;
        }
        self.apply_partition()
    }

    // ── Resets ─────────────────────────────────────────────────────────────

    /// Remove every token and return to [`SessionPhase::Idle`].
    pub fn clear(&mut self) {
        self.registry.clear(&mut self.renderer);
        self.overflow.clear();
        self.partitioned = false;
        info!(capacity = self.config.capacity, "surface cleared");
    }

    /// Switch input mode. Always clears, even when `mode` is unchanged.
    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
        self.reset_registry();
        info!(?mode, "mode switched");
        let hint: String = match mode {
            Mode::Discrete => "Tap anywhere to add tokens. Tap a token to remove.".into(),
            Mode::Continuous => format!("Place up to {} fingers at once.", self.config.capacity),
        };
        self.notifier.notify(&hint);
    }

    /// Switch to the other mode. Returns the new mode.
    pub fn toggle_mode(&mut self) -> Mode {
        let mode = self.config.mode.toggled();
        self.set_mode(mode);
        mode
    }

    /// Change the target count. Clears the surface before it takes effect.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), TeamError> {
        validate_capacity(capacity)?;
        self.config.capacity = capacity;
        self.reset_registry();
        info!(capacity, "capacity changed");
        Ok(())
    }

    // ── Host surface events ────────────────────────────────────────────────

    /// Fill the surface with `capacity` simulated tokens at random spots.
    ///
    /// Clears first. Continuous mode assigns teams straight away; discrete
    /// mode leaves that to [`assign`](Self::assign). Returns the number placed.
    pub fn simulate(&mut self, arena: Arena) -> usize {
        self.clear();
        let padding = self.config.sim_padding;
        let mut placed = 0;
        while !self.registry.is_full() {
            let position = arena.random_point(padding, &mut self.rng);
            match self.registry.add_generated(position, &mut self.renderer) {
                Ok(_) => placed += 1,
                Err(e) => {
                    error!(error = %e, "simulated token rejected");
                    break;
                }
            }
        }
        info!(placed, "simulated contacts placed");
        if self.config.mode == Mode::Continuous && self.registry.is_full() {
            self.apply_partition();
        }
        placed
    }

    /// The surface changed size. Tokens left off-surface move to the centre.
    ///
    /// Returns how many tokens moved.
    pub fn resize(&mut self, arena: Arena) -> usize {
        let moved = self
            .registry
            .reposition(&mut self.renderer, |p| arena.recenter(p));
        if moved > 0 {
            debug!(moved, width = arena.width, height = arena.height, "tokens recentred");
        }
        moved
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Current input mode.
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Current target count.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// `true` once the current token set has been split.
    pub fn is_partitioned(&self) -> bool {
        self.partitioned
    }

    /// Derived lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        let n = self.registry.len();
        if n == 0 {
            SessionPhase::Idle
        } else if n < self.config.capacity {
            SessionPhase::Filling
        } else if self.partitioned {
            SessionPhase::Assigned
        } else {
            SessionPhase::Ready
        }
    }

    /// What the status surface should show.
    pub fn status(&self) -> StatusReport {
        let count = self.registry.len();
        let capacity = self.config.capacity;
        if self.config.mode == Mode::Continuous && !self.overflow.is_empty() {
            return StatusReport::Excess {
                count,
                overflow: self.overflow.len(),
                capacity,
            };
        }
        if self.partitioned {
            let (offense, defense) = self.registry.role_counts();
            return StatusReport::Assigned { offense, defense };
        }
        match self.config.mode {
            Mode::Discrete => StatusReport::Tapping { count, capacity },
            Mode::Continuous if count < capacity => StatusReport::Waiting { count, capacity },
            Mode::Continuous => StatusReport::Ready { capacity },
        }
    }

    /// Whether the operator's assign action would do anything right now.
    pub fn can_assign(&self) -> bool {
        self.config.mode == Mode::Discrete && self.registry.is_full() && !self.partitioned
    }

    /// `(offense, defense)` token counts.
    pub fn team_counts(&self) -> (usize, usize) {
        self.registry.role_counts()
    }

    /// Contacts currently held beyond capacity.
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// The token registry.
    pub fn registry(&self) -> &ContactRegistry {
        &self.registry
    }

    /// The renderer collaborator.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer collaborator.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The notifier collaborator.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Mutable access to the notifier collaborator.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    // ── Internal helpers ───────────────────────────────────────────────────

    /// Split the live tokens and show the result. Returns `true` on success.
    fn apply_partition(&mut self) -> bool {
        let ids = self.registry.ids();
        let split = match partition(ids, self.config.capacity, &mut self.rng) {
            Ok(split) => split,
            Err(e) => {
                error!(error = %e, "partition invariant violated");
                debug_assert!(false, "partition invariant violated: {e}");
                return false;
            }
        };

        for (id, role) in split.assignments() {
            if let Err(e) = self.registry.set_role(*id, role, &mut self.renderer) {
                error!(contact = %id, error = %e, "token vanished during assignment");
            }
        }
        self.partitioned = true;
        let (offense, defense) = self.registry.role_counts();
        info!(offense, defense, "teams assigned");
        self.notifier.notify("Teams assigned: Offense / Defense");
        true
    }

    /// Drop any assignment after the token set changed.
    fn revoke_assignment(&mut self) {
        if self.partitioned {
            let reset = self.registry.reset_roles(&mut self.renderer);
            self.partitioned = false;
            info!(reset, "assignment revoked");
        }
    }

    fn reset_registry(&mut self) {
        self.registry.reconfigure(
            self.config.capacity,
            self.config.mode.label_policy(),
            &mut self.renderer,
        );
        self.overflow.clear();
        self.partitioned = false;
    }
}

#[cfg(feature = "std")]
impl<R: Renderer, N: Notifier> Session<R, N, rand::rngs::StdRng> {
    /// Start a session seeded from the operating system's entropy source.
    pub fn from_entropy(config: SessionConfig, renderer: R, notifier: N) -> Result<Self, TeamError> {
        use rand::SeedableRng;
        Self::new(config, renderer, notifier, rand::rngs::StdRng::from_entropy())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
