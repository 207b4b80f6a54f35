//! File-backed duel store.

mod duel;

pub use duel::FileDuelStore;
