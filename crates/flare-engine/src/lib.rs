//! Emitter lifecycle and emitter registry for Flare particle simulations.
//!
//! An [`Emitter`] owns one reservation in a shared allocator plus a
//! trigger, initializers and modifiers. Each [`update`](Emitter::update)
//! runs one tick:
//!
//! 1. **Age**: advance `TimeAlive`, retire particles past their lifetime.
//! 2. **Modify**: run every modifier over the whole reservation.
//! 3. **Emit**: ask the trigger for a count, claim that many dead slots
//!    (expanding the reservation when short), initialize them, and
//!    translate them into world space.
//!
//! [`EmitterRegistry`] groups emitters by name for hosts that batch them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod emitter;
pub mod error;
pub mod registry;

pub use config::EmitterConfig;
pub use emitter::Emitter;
pub use error::EmitterError;
pub use registry::EmitterRegistry;
