//! # Quote State
//!
//! The session's live quote and the user it belongs to.
//!
//! ## Quote Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quote State Operations                               │
//! │                                                                         │
//! │  Frontend Action          Command                 Quote Change          │
//! │  ───────────────          ───────                 ────────────          │
//! │                                                                         │
//! │  Add to selection ───────► add_line() ──────────► lines.push(line)     │
//! │  Arrow up / down ────────► move_line_up/down() ─► swap neighbours      │
//! │  Delete line ────────────► remove_line() ───────► lines.remove(i)      │
//! │  Add feature ────────────► add_feature() ───────► line.price += f      │
//! │  Export ─────────────────► export_quote() ──────► (read only)          │
//! │                                                                         │
//! │  NOTE: The lock is never held across an await; database reads happen  │
//! │        before the quote is locked.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, PoisonError};

use quotecraft_core::{Actor, Quote};

/// Command-state holder of the quote.
#[derive(Debug)]
pub struct QuoteState {
    actor: Actor,
    quote: Mutex<Quote>,
}

impl QuoteState {
    /// Creates an empty quote owned by `actor`.
    pub fn new(actor: Actor) -> Self {
        QuoteState {
            actor,
            quote: Mutex::new(Quote::new()),
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Executes a function with read access to the quote.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = quote_state.with_quote(|quote| quote.total_price());
    /// ```
    pub fn with_quote<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Quote) -> R,
    {
        // Quote operations are all-or-nothing, so a poisoned lock still holds
        // a consistent quote.
        let quote = self.quote.lock().unwrap_or_else(PoisonError::into_inner);
        f(&quote)
    }

    /// Executes a function with write access to the quote.
    pub fn with_quote_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Quote) -> R,
    {
        let mut quote = self.quote.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let state = QuoteState::new(Actor {
            id: 1,
            username: "ana".to_string(),
            is_admin: false,
        });
        assert!(state.with_quote(|q| q.is_empty()));
        assert_eq!(state.actor().username, "ana");

        state.with_quote_mut(|q| q.set_company_name("Acme"));
        assert_eq!(state.with_quote(|q| q.company_name().to_string()), "Acme");
    }
}
