//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust, shared by both ECUs:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable<K, C>                                            │
//! │  ┌──────────────┬───────────┬──────────┬──────────────────┐  │
//! │  │ K            │ on_enter  │ on_exit  │ on_update        │  │
//! │  ├──────────────┼───────────┼──────────┼──────────────────┤  │
//! │  │ state 0      │ fn(&mut C)│ fn(&mut C)│ fn(&mut C) ->   │  │
//! │  │ state 1      │    ...    │   ...    │  Result<Option<K>>│  │
//! │  └──────────────┴───────────┴──────────┴──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each step the engine calls `on_update` for the **current** state.  The
//! handlers block on the serial link or the keypad, so one step is one
//! protocol phase rather than one timer tick.  If `on_update` returns
//! `Ok(Some(next))` the engine runs `on_exit` for the current state, then
//! `on_enter` for the next, and moves the current pointer.  `Ok(None)`
//! stays put (the handler runs again on the next step).  Errors abort the
//! step without a transition and are handed to the caller.

use core::fmt::Debug;

use log::info;

use crate::error::Result;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// A state key that indexes a state table.
pub trait StateKey: Copy + Eq + Debug {
    /// Row of this state in the table.
    fn index(self) -> usize;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn<C> = fn(&mut C);

/// Signature for the per-step update handler.
/// Returns `Ok(Some(next))` to trigger a transition, or `Ok(None)` to stay.
pub type StateUpdateFn<K, C> = fn(&mut C) -> Result<Option<K>>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array, no heap and no `dyn`.
pub struct StateDescriptor<K, C> {
    pub id: K,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<C>>,
    pub on_exit: Option<StateActionFn<C>>,
    pub on_update: StateUpdateFn<K, C>,
}

/// A transition the engine performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<K> {
    pub from: K,
    pub to: K,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]).  The context is
/// passed into every call rather than owned, so the caller can inspect it
/// between steps.
pub struct Fsm<K, C, const N: usize> {
    /// Fixed-size table indexed by `K::index()`.
    table: [StateDescriptor<K, C>; N],
    /// Index of the currently active state.
    current: usize,
}

impl<K: StateKey, C, const N: usize> Fsm<K, C, N> {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor<K, C>; N], initial: K) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, row)| row.id.index() == i),
            "state table rows must be ordered by StateKey::index"
        );
        Self {
            table,
            current: initial.index(),
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `step()`.
    pub fn start(&mut self, ctx: &mut C) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one step.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn step(&mut self, ctx: &mut C) -> Result<Option<Transition<K>>> {
        let next = (self.table[self.current].on_update)(ctx)?;

        Ok(next.map(|next_id| {
            let from = self.current_state();
            self.transition(next_id, ctx);
            Transition { from, to: next_id }
        }))
    }

    /// Force an immediate transition regardless of what `on_update` would
    /// return.
    pub fn force_transition(&mut self, next: K, ctx: &mut C) {
        if next.index() != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> K {
        self.table[self.current].id
    }

    /// Display name of a state.
    pub fn state_name(&self, id: K) -> &'static str {
        self.table[id.index()].name
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: K, ctx: &mut C) {
        let next_idx = next_id.index();

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
