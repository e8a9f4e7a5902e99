use rand::Rng;
use rand::seq::SliceRandom;

/// The closed set of demand scenarios. Each variant carries a fixed score;
/// the set is not extensible at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandScenario {
    Peak,
    Shoulder,
    OffPeak,
}

impl DemandScenario {
    pub const ALL: [DemandScenario; 3] = [
        DemandScenario::Peak,
        DemandScenario::Shoulder,
        DemandScenario::OffPeak,
    ];

    pub fn score(self) -> f64 {
        match self {
            DemandScenario::Peak => 0.9,
            DemandScenario::Shoulder => 0.5,
            DemandScenario::OffPeak => 0.2,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DemandScenario::Peak => "Peak",
            DemandScenario::Shoulder => "Shoulder",
            DemandScenario::OffPeak => "Off-Peak",
        }
    }

    pub fn pick_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL
            .choose(rng)
            .copied()
            .unwrap_or(DemandScenario::Shoulder)
    }
}
