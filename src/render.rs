/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Presentation collaborators.
//!
//! The core never draws anything. It drives a [`Renderer`] that owns the
//! visual tokens and a [`Notifier`] that shows transient operator messages.
//! Hosts implement both against their UI toolkit.
//!
//! [`RenderLog`] and [`NoticeLog`] are recording implementations. They keep a
//! live view of every token plus the ordered event stream, which is what a
//! host needs when it replays effects on its own schedule (see the Python
//! bindings) and what tests assert against. [`NullRenderer`] draws nothing
//! and only hands out handles.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::token::{Position, Role, TokenHandle};

// ─── Collaborator traits ────────────────────────────────────────────────────

/// Visual side of a token's lifecycle.
pub trait Renderer {
    /// Create a visual token showing `label` at `position`.
    fn create_token(&mut self, position: Position, label: u32) -> TokenHandle;

    /// Move an existing token.
    fn move_token(&mut self, handle: TokenHandle, position: Position);

    /// Show the team role of a token. `Role::None` clears any badge.
    fn set_token_role(&mut self, handle: TokenHandle, role: Role);

    /// Remove a token from the surface.
    fn destroy_token(&mut self, handle: TokenHandle);
}

/// Transient operator-facing messages (toasts).
pub trait Notifier {
    /// Show `message` to the operator.
    fn notify(&mut self, message: &str);
}

impl<F: FnMut(&str)> Notifier for F {
    fn notify(&mut self, message: &str) {
        self(message)
    }
}

// ─── Recording renderer ─────────────────────────────────────────────────────

/// One renderer call, as recorded by [`RenderLog`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderEvent {
    /// A token was created.
    Create {
        /// Handle assigned to the new token.
        handle: TokenHandle,
        /// Initial position.
        position: Position,
        /// Display label.
        label: u32,
    },
    /// A token was moved.
    Move {
        /// Token being moved.
        handle: TokenHandle,
        /// New position.
        position: Position,
    },
    /// A token's role badge changed.
    SetRole {
        /// Token being relabelled.
        handle: TokenHandle,
        /// New role.
        role: Role,
    },
    /// A token was removed.
    Destroy {
        /// Token being removed.
        handle: TokenHandle,
    },
}

/// Live state of one visual token in a [`RenderLog`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualToken {
    /// Current position.
    pub position: Position,
    /// Display label.
    pub label: u32,
    /// Badge currently shown.
    pub role: Role,
}

/// A [`Renderer`] that records every call and mirrors the visible surface.
#[derive(Debug, Default)]
pub struct RenderLog {
    next_handle: u64,
    live: HashMap<TokenHandle, VisualToken>,
    events: Vec<RenderEvent>,
}

impl RenderLog {
    /// Empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens currently on the surface.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Visual state of a token, if it is still on the surface.
    pub fn token(&self, handle: TokenHandle) -> Option<&VisualToken> {
        self.live.get(&handle)
    }

    /// Iterate over every live token.
    pub fn tokens(&self) -> impl Iterator<Item = (&TokenHandle, &VisualToken)> {
        self.live.iter()
    }

    /// Recorded calls, oldest first.
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Take the recorded calls, leaving the live view intact.
    pub fn drain_events(&mut self) -> Vec<RenderEvent> {
        core::mem::take(&mut self.events)
    }
}

impl Renderer for RenderLog {
    fn create_token(&mut self, position: Position, label: u32) -> TokenHandle {
        self.next_handle += 1;
        let handle = TokenHandle(self.next_handle);
        self.live.insert(
            handle,
            VisualToken {
                position,
                label,
                role: Role::None,
            },
        );
        self.events.push(RenderEvent::Create {
            handle,
            position,
            label,
        });
        handle
    }

    fn move_token(&mut self, handle: TokenHandle, position: Position) {
        if let Some(tok) = self.live.get_mut(&handle) {
            tok.position = position;
        }
        self.events.push(RenderEvent::Move { handle, position });
    }

    fn set_token_role(&mut self, handle: TokenHandle, role: Role) {
        if let Some(tok) = self.live.get_mut(&handle) {
            tok.role = role;
        }
        self.events.push(RenderEvent::SetRole { handle, role });
    }

    fn destroy_token(&mut self, handle: TokenHandle) {
        self.live.remove(&handle);
        self.events.push(RenderEvent::Destroy { handle });
    }
}

// ─── Headless renderer ──────────────────────────────────────────────────────

/// A [`Renderer`] that draws nothing and only hands out fresh handles.
///
/// For headless hosts that read state straight from the registry.
#[derive(Clone, Debug, Default)]
pub struct NullRenderer {
    next_handle: u64,
}

impl NullRenderer {
    /// Renderer whose first handle is 1.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for NullRenderer {
    fn create_token(&mut self, _position: Position, _label: u32) -> TokenHandle {
        self.next_handle += 1;
        TokenHandle(self.next_handle)
    }

    fn move_token(&mut self, _handle: TokenHandle, _position: Position) {}

    fn set_token_role(&mut self, _handle: TokenHandle, _role: Role) {}

    fn destroy_token(&mut self, _handle: TokenHandle) {}
}

// ─── Recording notifier ─────────────────────────────────────────────────────

/// A [`Notifier`] that keeps every message.
#[derive(Clone, Debug, Default)]
pub struct NoticeLog {
    messages: Vec<String>,
}

impl NoticeLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// Take all messages.
    pub fn drain(&mut self) -> Vec<String> {
        core::mem::take(&mut self.messages)
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_log_tracks_live_tokens() {
        let mut log = RenderLog::new();
        let a = log.create_token(Position::new(1.0, 2.0), 1);
        let b = log.create_token(Position::new(3.0, 4.0), 2);
        assert_ne!(a, b);
        assert_eq!(log.live_count(), 2);

        log.set_token_role(a, Role::Offense);
        log.move_token(a, Position::new(9.0, 9.0));
        let tok = log.token(a).expect("token a is live");
        assert_eq!(tok.role, Role::Offense);
        assert_eq!(tok.position, Position::new(9.0, 9.0));

        log.destroy_token(b);
        assert_eq!(log.live_count(), 1);
        assert!(log.token(b).is_none());
        assert_eq!(log.events().len(), 5);
    }

    #[test]
    fn test_null_renderer_hands_out_fresh_handles() {
        let mut r = NullRenderer::new();
        let a = r.create_token(Position::default(), 1);
        r.destroy_token(a);
        let b = r.create_token(Position::default(), 1);
        assert_eq!(a, TokenHandle(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_closure_notifier() {
        let mut seen = Vec::new();
        {
            let mut n = |m: &str| seen.push(m.to_string());
            n.notify("hello");
        }
        assert_eq!(seen, ["hello"]);
    }

    #[test]
    fn test_notice_log_drain() {
        let mut n = NoticeLog::new();
        n.notify("one");
        n.notify("two");
        assert_eq!(n.last(), Some("two"));
        assert_eq!(n.drain().len(), 2);
        assert!(n.messages().is_empty());
    }
}
