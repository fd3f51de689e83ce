//! Okey 101 rules that do not depend on turn sequencing.
//!
//! - `validator`: which tile groups are legal melds
//! - `score`: hand penalties and meld values
//! - `outcome`: how a round ends

pub mod outcome;
pub mod score;
pub mod validator;

pub use outcome::RoundOutcome;
pub use score::{compute_score, meld_value, tile_penalty, JOKER_PENALTY};
pub use validator::{classify, is_valid_combination, MeldKind, MIN_MELD_LEN};
