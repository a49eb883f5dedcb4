//! Weighting, top-three selection and the execution gate.

use rand::Rng;

use cast_events::DecisionType;

use crate::components::PersonalityProfile;
use crate::config::AutonomyConfig;

use super::generate::Candidate;

/// How well a decision suits a personality, 0 to 1.
pub fn trait_fit(decision: DecisionType, p: &PersonalityProfile) -> f32 {
    let fit = match decision {
        DecisionType::ProposeAlliance => (p.loyalty + p.charisma) / 200.0,
        DecisionType::SendDm => (p.charisma + p.intelligence) / 200.0,
        DecisionType::Confront => p.aggressiveness / 100.0,
        DecisionType::Scheme => (p.manipulation + p.intelligence) / 200.0,
        DecisionType::SpreadRumor => p.manipulation / 100.0,
        DecisionType::Flirt => p.charisma / 100.0,
        DecisionType::Betray => (p.manipulation + p.risk_tolerance) / 200.0,
    };
    fit.clamp(0.0, 1.0)
}

/// Selection weight: urgency times fit, halved for NPCs that just acted.
pub fn weight(candidate: &Candidate, p: &PersonalityProfile, acted_recently: bool) -> f32 {
    let w = candidate.urgency * trait_fit(candidate.decision, p);
    if acted_recently {
        w * 0.5
    } else {
        w
    }
}

/// Weighted draw among the three heaviest candidates. Ties keep input order.
pub fn choose<'a, R: Rng + ?Sized>(
    candidates: &'a [Candidate],
    weights: &[f32],
    rng: &mut R,
) -> Option<&'a Candidate> {
    let mut order: Vec<usize> = (0..candidates.len().min(weights.len())).collect();
    order.sort_by(|a, b| weights[*b].total_cmp(&weights[*a]));
    order.truncate(3);

    let total: f32 = order.iter().map(|i| weights[*i].max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.gen::<f32>() * total;
    for i in &order {
        let w = weights[*i].max(0.0);
        if roll < w {
            return Some(&candidates[*i]);
        }
        roll -= w;
    }
    order.last().map(|i| &candidates[*i])
}

/// Execution probability for a decision of the given urgency.
pub fn gate_probability(urgency: f32, config: &AutonomyConfig) -> f64 {
    if urgency < config.low_urgency {
        config.low_urgency_chance.clamp(0.0, 1.0)
    } else {
        (urgency as f64 / 100.0).clamp(0.0, 1.0)
    }
}

pub fn passes_gate<R: Rng + ?Sized>(urgency: f32, config: &AutonomyConfig, rng: &mut R) -> bool {
    rng.gen_bool(gate_probability(urgency, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cast_events::{MotiveType, NpcId};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn candidate(decision: DecisionType, urgency: f32) -> Candidate {
        Candidate {
            decision,
            target: NpcId(1),
            subject: None,
            motive: MotiveType::Survival,
            urgency,
            content: String::new(),
        }
    }

    #[test]
    fn test_fit_and_recency_halving() {
        let p = PersonalityProfile::from_dispositions(&["aggressive"]);
        let c = candidate(DecisionType::Confront, 80.0);
        assert_eq!(trait_fit(DecisionType::Confront, &p), 0.85);
        assert_eq!(weight(&c, &p, false), 68.0);
        assert_eq!(weight(&c, &p, true), 34.0);
    }

    #[test]
    fn test_choose_only_from_top_three() {
        let candidates = vec![
            candidate(DecisionType::SendDm, 1.0),
            candidate(DecisionType::Confront, 1.0),
            candidate(DecisionType::Scheme, 1.0),
            candidate(DecisionType::Flirt, 1.0),
        ];
        let weights = [1.0, 50.0, 40.0, 30.0];
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let picked = choose(&candidates, &weights, &mut rng).unwrap();
            assert_ne!(picked.decision, DecisionType::SendDm);
        }
        assert!(choose(&candidates, &[0.0; 4], &mut rng).is_none());
    }

    #[test]
    fn test_gate_probability() {
        let config = AutonomyConfig::default();
        assert_eq!(gate_probability(20.0, &config), 0.3);
        assert_eq!(gate_probability(90.0, &config), 0.9);
        assert_eq!(gate_probability(250.0, &config), 1.0);
    }
}
