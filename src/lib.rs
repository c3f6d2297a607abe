//! Statechart: a table-driven hierarchical state machine engine
//!
//! A statechart is described once as an immutable [`StateTable`]: a tree of
//! states rooted at [`StateId::ROOT`], each with optional entry and exit
//! callbacks, a default child, and actions keyed by event. Any number of
//! [`Machine`]s can then run against the same table, each with its own
//! context value.
//!
//! # Core Concepts
//!
//! - **Table**: immutable, validated state hierarchy shared by machines
//! - **Machine**: the mutable runtime (init, dispatch, reset)
//! - **Actions**: inherited from ancestors; the nearest handler wins
//! - **Transitions**: direct child, rollback to an active ancestor, or a
//!   jump to another branch through an active ancestor
//!
//! # Example
//!
//! ```rust
//! use statechart::builder::{StateBuilder, StateTableBuilder};
//! use statechart::engine::Machine;
//! use statechart::{event_ids, state_ids};
//!
//! state_ids! {
//!     enum Turnstile { Root, Locked, Unlocked }
//! }
//!
//! event_ids! {
//!     enum Input { Coin, Push }
//! }
//!
//! let table = StateTableBuilder::<u32>::new()
//!     .state(StateBuilder::root().initial(Turnstile::Locked))?
//!     .state(
//!         StateBuilder::new(Turnstile::Locked)
//!             .name("Locked")
//!             .parent(Turnstile::Root)
//!             .goto(Input::Coin, Turnstile::Unlocked),
//!     )?
//!     .state(
//!         StateBuilder::new(Turnstile::Unlocked)
//!             .name("Unlocked")
//!             .parent(Turnstile::Root)
//!             .on_enter(|_, _, _, unlocks: &mut u32| *unlocks += 1)
//!             .goto(Input::Push, Turnstile::Locked),
//!     )?
//!     .build()?;
//!
//! let mut machine = Machine::init(&table, 0);
//! machine.send(Input::Coin)?;
//! assert_eq!(machine.current_state(), Some(Turnstile::Unlocked.id()));
//! assert_eq!(*machine.context(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, StateBuilder, StateTableBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{EventId, StateId, StateTable, TransitionKind, TransitionPolicy};
pub use engine::{Dispatch, EngineError, Machine};
