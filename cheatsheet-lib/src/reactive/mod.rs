//! Reactive cells and derived values
//!
//! A [`Signal`] holds the latest value of a piece of state and notifies its
//! subscribers synchronously whenever it is set. Derived signals built with
//! [`Signal::map`], [`combine2`] and [`combine3`] follow combine-latest
//! rules:
//!
//! - nothing is computed until every input has a value
//! - afterwards every input update triggers a recomputation
//! - a recomputation is skipped when no input version changed since the last one
//!
//! A derived signal keeps its inputs alive and unsubscribes from them when its
//! last handle is dropped.

mod derive;
mod signal;

pub use derive::{combine2, combine3};
pub use signal::{ReadSignal, Signal, SubscriptionId};
