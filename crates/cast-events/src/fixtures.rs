//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // cast-events = { path = "../cast-events", features = ["test-fixtures"] }
//!
//! use cast_events::fixtures;
//!
//! let cast = fixtures::sample_cast();
//! ```

use crate::{CastMember, PlayerAction};

/// Returns a six-member cast: the player plus five NPCs with distinct dispositions.
///
/// - 0 Jordan Reyes (player)
/// - 1 Mira Vance: paranoid, strategic
/// - 2 Theo Park: loyal, calm
/// - 3 Sasha Okafor: charming, flirt, emotional
/// - 4 Dex Moreau: aggressive, schemer, risk-taker
/// - 5 Lena Cho: smart, cautious
pub fn sample_cast() -> Vec<CastMember> {
    vec![
        CastMember::new(0, "Jordan Reyes").as_player(),
        CastMember::new(1, "Mira Vance").with_dispositions(["paranoid", "strategic"]),
        CastMember::new(2, "Theo Park").with_dispositions(["loyal", "calm"]),
        CastMember::new(3, "Sasha Okafor").with_dispositions(["charming", "flirt", "emotional"]),
        CastMember::new(4, "Dex Moreau").with_dispositions(["aggressive", "schemer", "risk-taker"]),
        CastMember::new(5, "Lena Cho").with_dispositions(["smart", "cautious"]),
    ]
}

/// Returns a handful of player actions covering the main response branches.
pub fn sample_actions() -> Vec<PlayerAction> {
    vec![
        PlayerAction::talk("Theo", "Thank you for having my back yesterday, I really mean it."),
        PlayerAction::talk("Mira", "We should work together with Theo, just the three of us."),
        PlayerAction::talk("Dex", "If you come after me I will make sure you go home next."),
        PlayerAction::talk("Lena", "What do you know about the vote tonight?"),
        PlayerAction::talk("Sasha", "You look amazing today, honestly."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_cast_has_one_player() {
        let cast = sample_cast();
        assert_eq!(cast.iter().filter(|m| m.is_player).count(), 1);
        for (i, member) in cast.iter().enumerate() {
            assert_eq!(member.id.index(), i);
        }
    }

    #[test]
    fn test_sample_actions_have_targets() {
        assert!(sample_actions().iter().all(|a| a.target.is_some()));
    }
}
