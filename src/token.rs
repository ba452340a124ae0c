/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Token identity and the per-contact record.
//!
//! - [`ContactId`]: tagged identifier unifying input-source contact points and
//!   generated tap tokens.
//! - [`Role`]: team role carried by every token.
//! - [`TokenRecord`]: the logical representative of one contact point.
//!
//! # Invariants
//!
//! - `ContactId::Contact` and `ContactId::Generated` never compare
//!   equal, even for the same numeric value.
//! - A fresh record always starts with [`Role::None`].

use core::fmt;

// ─── ContactId ──────────────────────────────────────────────────────────────

/// Identifier of one live contact point.
///
/// The host input source hands out small integer identifiers for persistent
/// contacts (touch points). Discrete taps have no such identifier, so the
/// registry mints one from its own counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactId {
    /// A persistent contact point reported by the input surface.
    Contact(u64),
    /// A token minted by the registry for a discrete tap.
    Generated(u64),
}

impl ContactId {
    /// `true` for ids minted by the registry.
    pub fn is_generated(&self) -> bool {
        matches!(self, ContactId::Generated(_))
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactId::Contact(n) => write!(f, "contact-{n}"),
            ContactId::Generated(n) => write!(f, "tap-{n}"),
        }
    }
}

impl From<u64> for ContactId {
    fn from(n: u64) -> Self {
        ContactId::Contact(n)
    }
}

// ─── Role ───────────────────────────────────────────────────────────────────

/// Team role of a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Not yet assigned to a team.
    #[default]
    None,
    /// Offense team.
    Offense,
    /// Defense team.
    Defense,
}

impl Role {
    /// `true` once a team has been assigned.
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Role::None)
    }
}

// ─── Position ───────────────────────────────────────────────────────────────

/// Surface-local coordinates of a token, in the host's pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Horizontal offset from the left edge of the surface.
    pub x: f32,
    /// Vertical offset from the top edge of the surface.
    pub y: f32,
}

impl Position {
    /// Construct a position.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

// ─── TokenHandle ────────────────────────────────────────────────────────────

/// Opaque handle to the visual token owned by the [`Renderer`](crate::render::Renderer).
///
/// The core stores it and passes it back; it never looks inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenHandle(pub u64);

// ─── TokenRecord ────────────────────────────────────────────────────────────

/// The logical representative of one accepted contact point.
///
/// Owned exclusively by the [`ContactRegistry`](crate::registry::ContactRegistry).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenRecord {
    /// Identifier the record is keyed by.
    pub id: ContactId,
    /// 1-based display label.
    pub label: u32,
    /// Current team role.
    pub role: Role,
    /// Last known position.
    pub position: Position,
    /// Handle returned by the renderer when the token was created.
    pub handle: TokenHandle,
}

impl TokenRecord {
    /// Construct an unassigned record.
    pub fn new(id: ContactId, label: u32, position: Position, handle: TokenHandle) -> Self {
        Self {
            id,
            label,
            role: Role::None,
            position,
            handle,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
