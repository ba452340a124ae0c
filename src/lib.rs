//! # teamtap-core
//!
//! Team Tap: put fingers on a screen, get two fair teams.
//!
//! ---
//!
//! ## What this crate is
//!
//! Players place fingers (or tap tokens) on a shared touch surface. Once the
//! expected number of contact points is down, the engine splits them into two
//! exactly balanced teams, **Offense** and **Defense**, and labels every
//! contact point.
//!
//! The crate is the engine only. It never draws. The host forwards input
//! events and supplies two small collaborators: a [`Renderer`] that owns the
//! visual tokens and a [`Notifier`] for operator messages.
//!
//! Three pieces do all the work:
//!
//! **The contact registry** maps the input source's short-lived contact
//! identifiers to stable token records. It is bounded by the target count,
//! refuses duplicates, and shrugs off late or repeated events for contacts it
//! has never seen.
//!
//! **The partition** shuffles the tokens with Fisher–Yates and cuts the
//! permutation in half. Team membership is independent of arrival order.
//!
//! **The session** decides *when* a split may happen. In continuous mode the
//! split fires the instant the surface fills; in discrete mode the operator
//! asks for it. Any change to an assigned token set revokes the whole
//! assignment.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! contact start/move/end, tap ─▶ Session ─▶ ContactRegistry ─▶ Renderer
//!                                   │                ▲
//!                                   └─▶ partition ───┘ (roles)
//!                                   └─▶ Notifier
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`token`] | [`ContactId`], [`Role`], [`TokenRecord`] | Identity and per-contact state |
//! | [`registry`] | [`ContactRegistry`] | Bounded id → token map with renderer side effects |
//! | [`partition`] | [`Partition`] | Fisher–Yates shuffle and balanced split |
//! | [`session`] | [`Session`], [`SessionPhase`], [`StatusReport`] | Mode FSM, assignment and reset rules |
//! | [`render`] | [`Renderer`], [`Notifier`] | Presentation collaborators and recording doubles |
//! | [`arena`] | [`Arena`] | Surface bounds, recentring, simulated placement |
//! | [`error`] | [`TeamError`] | Error taxonomy |
//! | `ffi` | `TeamTap` | Python bindings (requires `python-ffi` feature) |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` + `alloc` by default. Enable the `std` feature
//! for `Session::from_entropy`. Enable the `serde` feature for
//! serialisation of records, configuration and status.
//!
//! ## Logging
//!
//! Events are emitted through `tracing`. The crate installs no subscriber.
//!
//! ## License
//!
//! Business Source License 1.1.

#![cfg_attr(not(any(test, feature = "std", feature = "python-ffi")), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

#[cfg(any(feature = "std", feature = "python-ffi"))]
extern crate std;

pub mod arena;
pub mod error;
pub mod partition;
pub mod registry;
pub mod render;
pub mod session;
pub mod token;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use arena::Arena;
pub use error::TeamError;
pub use partition::{partition, shuffle, Partition};
pub use registry::{ContactRegistry, LabelPolicy};
pub use render::{NoticeLog, Notifier, NullRenderer, RenderLog, Renderer};
pub use session::{Mode, Session, SessionConfig, SessionPhase, StatusReport};
pub use token::{ContactId, Position, Role, TokenHandle, TokenRecord};
