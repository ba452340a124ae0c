//! Python FFI bindings via PyO3.
//!
//! Exposes a single `TeamTap` session to Python. Rendering is recorded, not
//! performed: the host drains the render events and notifications after each
//! input call and applies them to its own UI.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from teamtap_core import TeamTap
//!
//! game = TeamTap(capacity=4, mode="touch", seed=7)
//! for finger in range(4):
//!     game.touch_start(finger, 100.0 + 50 * finger, 200.0)
//! print(game.phase)          # "assigned"
//! print(game.status)         # "Teams assigned: 2 Offense / 2 Defense"
//! for label, role, x, y in game.tokens():
//!     print(label, role)
//! print(game.drain_notifications())
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::arena::Arena;
use crate::error::TeamError;
use crate::render::{NoticeLog, RenderEvent, RenderLog};
use crate::session::{Mode, Session, SessionConfig, SessionPhase};
use crate::token::{ContactId, Position, Role};

type PySessionInner = Session<RenderLog, NoticeLog, StdRng>;

fn to_py_err(e: TeamError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_mode(mode: &str) -> PyResult<Mode> {
    match mode {
        "touch" | "continuous" => Ok(Mode::Continuous),
        "tap" | "discrete" => Ok(Mode::Discrete),
        other => Err(PyValueError::new_err(format!(
            "mode must be \"touch\" or \"tap\", got {other:?}"
        ))),
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::None => "none",
        Role::Offense => "offense",
        Role::Defense => "defense",
    }
}

// ── TeamTap ───────────────────────────────────────────────────────────────────

/// One local team-picking session.
///
/// Args:
///     capacity: number of players, positive and even (default 10)
///     mode:     "touch" (continuous contacts) or "tap" (discrete tokens)
///     seed:     optional seed for a reproducible split
#[pyclass(name = "TeamTap")]
pub struct PyTeamTap {
    inner: PySessionInner,
}

#[pymethods]
impl PyTeamTap {
    /// Create a new session.
    #[new]
    #[pyo3(signature = (capacity=10, mode="touch", seed=None))]
    pub fn new(capacity: usize, mode: &str, seed: Option<u64>) -> PyResult<Self> {
        let config = SessionConfig {
            capacity,
            mode: parse_mode(mode)?,
            ..SessionConfig::default()
        };
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let inner = Session::new(config, RenderLog::new(), NoticeLog::new(), rng).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// A finger went down. Returns True if it was registered.
    pub fn touch_start(&mut self, contact: u64, x: f32, y: f32) -> bool {
        self.inner.contact_start(contact, Position::new(x, y)).is_ok()
            && self.inner.registry().contains(ContactId::Contact(contact))
    }

    /// A finger moved. Unknown fingers are ignored.
    pub fn touch_move(&mut self, contact: u64, x: f32, y: f32) {
        let _ = self.inner.contact_move(contact, Position::new(x, y));
    }

    /// A finger lifted. The token stays on the surface.
    pub fn touch_end(&mut self, contact: u64) {
        self.inner.contact_end(contact);
    }

    /// Place a tap token. Returns its token number, or None if rejected.
    pub fn tap(&mut self, x: f32, y: f32) -> Option<u64> {
        match self.inner.tap(Position::new(x, y)) {
            Ok(Some(ContactId::Generated(n))) => Some(n),
            _ => None,
        }
    }

    /// Remove the tap token with the given number. Returns True if removed.
    pub fn tap_token(&mut self, token: u64) -> bool {
        self.inner
            .tap_token(ContactId::Generated(token))
            .unwrap_or(false)
    }

    /// Assign teams (tap mode). Returns True if a split happened.
    pub fn assign(&mut self) -> bool {
        self.inner.assign()
    }

    /// Remove every token.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Switch mode ("touch" or "tap"). Clears the surface.
    pub fn set_mode(&mut self, mode: &str) -> PyResult<()> {
        self.inner.set_mode(parse_mode(mode)?);
        Ok(())
    }

    /// Change the player count. Clears the surface.
    pub fn set_capacity(&mut self, capacity: usize) -> PyResult<()> {
        self.inner.set_capacity(capacity).map_err(to_py_err)
    }

    /// Fill a `width` × `height` surface with simulated tokens.
    pub fn simulate(&mut self, width: f32, height: f32) -> usize {
        self.inner.simulate(Arena::new(width, height))
    }

    /// The surface was resized. Returns how many tokens were recentred.
    pub fn resize(&mut self, width: f32, height: f32) -> usize {
        self.inner.resize(Arena::new(width, height))
    }

    /// Lifecycle phase: "idle", "filling", "ready" or "assigned".
    #[getter]
    pub fn phase(&self) -> &'static str {
        match self.inner.phase() {
            SessionPhase::Idle => "idle",
            SessionPhase::Filling => "filling",
            SessionPhase::Ready => "ready",
            SessionPhase::Assigned => "assigned",
        }
    }

    /// Human-readable status line.
    #[getter]
    pub fn status(&self) -> String {
        self.inner.status().to_string()
    }

    /// Current player count.
    #[getter]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// (offense, defense) counts.
    pub fn team_counts(&self) -> (usize, usize) {
        self.inner.team_counts()
    }

    /// Live tokens as (label, role, x, y), ordered by label.
    pub fn tokens(&self) -> Vec<(u32, &'static str, f32, f32)> {
        self.inner
            .registry()
            .records()
            .into_iter()
            .map(|r| (r.label, role_name(r.role), r.position.x, r.position.y))
            .collect()
    }

    /// Take recorded render calls as (kind, handle) pairs.
    pub fn drain_render_events(&mut self) -> Vec<(&'static str, u64)> {
        self.inner
            .renderer_mut()
            .drain_events()
            .into_iter()
            .map(|ev| match ev {
                RenderEvent::Create { handle, .. } => ("create", handle.0),
                RenderEvent::Move { handle, .. } => ("move", handle.0),
                RenderEvent::SetRole { handle, .. } => ("set_role", handle.0),
                RenderEvent::Destroy { handle } => ("destroy", handle.0),
            })
            .collect()
    }

    /// Take pending operator notifications.
    pub fn drain_notifications(&mut self) -> Vec<String> {
        self.inner.notifier_mut().drain()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "TeamTap(capacity={}, mode={:?}, phase={:?})",
            self.inner.capacity(),
            self.inner.mode(),
            self.phase(),
        )
    }
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Team Tap Python bindings.
///
/// Exposes the contact registry, balanced partition and session state
/// machine behind a single `TeamTap` class.
#[pymodule]
pub fn teamtap_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTeamTap>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("DEFAULT_CAPACITY", SessionConfig::default().capacity)?;
    Ok(())
}
