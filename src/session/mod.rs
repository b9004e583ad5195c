/*!
 * Player session.
 *
 * This module provides:
 * - Generation tickets for dropping stale responses
 * - A session object wiring subtitle, translation and dictionary services
 *   to one configuration and one set of caches
 */

pub mod generation;
pub mod player;

// Re-export main types
pub use generation::{GenerationTicket, RequestGenerations};
pub use player::{LoadOutcome, PlayerSession};
