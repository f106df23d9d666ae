//! Test support for exercising discovery without spawning real processes.

pub mod mocks;

pub use mocks::MockHelpRunner;
