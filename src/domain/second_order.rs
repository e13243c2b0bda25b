//! Second-order dependency plays.
//!
//! When a private company shows strong momentum, the listed suppliers its
//! sector leans on should benefit too. A supplier with high dependency but a
//! low observed price correlation is flagged as mispriced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::company::Sector;
use crate::domain::momentum::MomentumScore;
use crate::domain::scoring_config::Thresholds;

/// Ticker to historical price correlation with the primary technology.
pub type CorrelationTable = BTreeMap<String, f64>;

const DEFAULT_CORRELATION: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Supplier {
    pub name: &'static str,
    /// `None` for private suppliers, which are never emitted as plays.
    pub ticker: Option<&'static str>,
    pub dependency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependencyCategory {
    pub category: &'static str,
    pub suppliers: &'static [Supplier],
    pub thesis: &'static str,
}

const fn listed(name: &'static str, ticker: &'static str, dependency: f64) -> Supplier {
    Supplier {
        name,
        ticker: Some(ticker),
        dependency,
    }
}

const fn private(name: &'static str, dependency: f64) -> Supplier {
    Supplier {
        name,
        ticker: None,
        dependency,
    }
}

const AI_INFRA_DEPENDENCIES: &[DependencyCategory] = &[
    DependencyCategory {
        category: "Datacenter Cooling",
        suppliers: &[
            listed("Vertiv (VRT)", "VRT", 0.87),
            listed("nVent Electric (NVT)", "NVT", 0.72),
        ],
        thesis: "AI datacenter buildout requires 3x cooling capacity for GPU clusters",
    },
    DependencyCategory {
        category: "Power Infrastructure",
        suppliers: &[
            listed("Eaton (ETN)", "ETN", 0.78),
            listed("Schneider Electric (SBGSY)", "SBGSY", 0.75),
        ],
        thesis: "AI compute demands robust UPS and power distribution systems",
    },
    DependencyCategory {
        category: "Networking Equipment",
        suppliers: &[
            listed("Arista Networks (ANET)", "ANET", 0.91),
            listed("Juniper Networks (JNPR)", "JNPR", 0.68),
        ],
        thesis: "GPU cluster interconnects require high-bandwidth networking",
    },
];

const SIX_G_DEPENDENCIES: &[DependencyCategory] = &[
    DependencyCategory {
        category: "RF Components",
        suppliers: &[
            listed("Qorvo (QRVO)", "QRVO", 0.85),
            listed("Skyworks Solutions (SWKS)", "SWKS", 0.82),
        ],
        thesis: "6G and satellite mesh require advanced RF filtering and amplification",
    },
    DependencyCategory {
        category: "Fiber Optics",
        suppliers: &[
            listed("Corning (GLW)", "GLW", 0.79),
            listed("Lumentum (LITE)", "LITE", 0.71),
        ],
        thesis: "Backhaul infrastructure for 6G requires massive fiber deployment",
    },
];

const QUANTUM_DEPENDENCIES: &[DependencyCategory] = &[
    DependencyCategory {
        category: "Cryogenic Systems",
        suppliers: &[
            private("BlueFors (Private)", 0.92),
            listed("Oxford Instruments (OXIG.L)", "OXIG.L", 0.73),
        ],
        thesis: "Quantum computers require dilution refrigerators at millikelvin temperatures",
    },
    DependencyCategory {
        category: "Control Electronics",
        suppliers: &[
            listed("Keysight (KEYS)", "KEYS", 0.68),
            private("Zurich Instruments (Private)", 0.84),
        ],
        thesis: "Quantum systems need precision control and measurement electronics",
    },
];

const GREEN_ENERGY_DEPENDENCIES: &[DependencyCategory] = &[
    DependencyCategory {
        category: "Rare Earth Mining",
        suppliers: &[
            listed("MP Materials (MP)", "MP", 0.81),
            listed("Lynas Rare Earths (LYSDY)", "LYSDY", 0.76),
        ],
        thesis: "Wind turbines and EV motors require neodymium and dysprosium",
    },
    DependencyCategory {
        category: "Grid Storage Components",
        suppliers: &[
            listed("Fluence Energy (FLNC)", "FLNC", 0.88),
            listed("Enphase Energy (ENPH)", "ENPH", 0.79),
        ],
        thesis: "Renewable intermittency drives massive battery storage deployment",
    },
];

const SEMICONDUCTOR_DEPENDENCIES: &[DependencyCategory] = &[
    DependencyCategory {
        category: "Semiconductor Equipment",
        suppliers: &[
            listed("ASML (ASML)", "ASML", 0.95),
            listed("Applied Materials (AMAT)", "AMAT", 0.91),
            listed("Lam Research (LRCX)", "LRCX", 0.89),
        ],
        thesis: "Chip fab buildout requires advanced lithography and deposition tools",
    },
    DependencyCategory {
        category: "Materials & Chemicals",
        suppliers: &[
            listed("Entegris (ENTG)", "ENTG", 0.84),
            listed("Cabot Microelectronics (CCMP)", "CCMP", 0.77),
        ],
        thesis: "Advanced nodes require specialized chemicals and materials",
    },
];

const CYBERSECURITY_DEPENDENCIES: &[DependencyCategory] = &[DependencyCategory {
    category: "Identity Infrastructure",
    suppliers: &[
        listed("Okta (OKTA)", "OKTA", 0.72),
        listed("Ping Identity (PING)", "PING", 0.68),
    ],
    thesis: "Zero-trust architectures built on identity as perimeter",
}];

const DATA_INFRA_DEPENDENCIES: &[DependencyCategory] = &[DependencyCategory {
    category: "Cloud Storage",
    suppliers: &[
        listed("Pure Storage (PSTG)", "PSTG", 0.76),
        listed("NetApp (NTAP)", "NTAP", 0.71),
    ],
    thesis: "Data infrastructure growth drives storage infrastructure demand",
}];

/// Supplier categories a sector depends on. Biotech infrastructure has none.
pub fn dependencies_for(sector: Sector) -> &'static [DependencyCategory] {
    match sector {
        Sector::AiInfra => AI_INFRA_DEPENDENCIES,
        Sector::SixG => SIX_G_DEPENDENCIES,
        Sector::Quantum => QUANTUM_DEPENDENCIES,
        Sector::GreenEnergy => GREEN_ENERGY_DEPENDENCIES,
        Sector::Semiconductors => SEMICONDUCTOR_DEPENDENCIES,
        Sector::Cybersecurity => CYBERSECURITY_DEPENDENCIES,
        Sector::DataInfra => DATA_INFRA_DEPENDENCIES,
        Sector::BiotechInfra => &[],
    }
}

/// Reference correlations used when no market data feed is wired in.
pub fn reference_correlations() -> CorrelationTable {
    [
        ("VRT", 0.34),
        ("NVT", 0.42),
        ("ETN", 0.51),
        ("SBGSY", 0.48),
        ("ANET", 0.78),
        ("JNPR", 0.45),
        ("QRVO", 0.38),
        ("SWKS", 0.41),
        ("GLW", 0.52),
        ("LITE", 0.47),
        ("OXIG.L", 0.29),
        ("KEYS", 0.43),
        ("MP", 0.58),
        ("LYSDY", 0.52),
        ("FLNC", 0.71),
        ("ENPH", 0.69),
        ("ASML", 0.82),
        ("AMAT", 0.79),
        ("LRCX", 0.81),
        ("ENTG", 0.64),
        ("CCMP", 0.59),
        ("OKTA", 0.67),
        ("PING", 0.62),
        ("PSTG", 0.55),
        ("NTAP", 0.58),
    ]
    .into_iter()
    .map(|(ticker, corr)| (ticker.to_string(), corr))
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryTiming {
    Immediate,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskReturn {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondOrderPlay {
    pub primary_technology: String,
    pub primary_sector: Sector,
    pub primary_momentum_score: f64,
    pub supplier_company: String,
    pub supplier_ticker: String,
    pub exposure_type: String,
    pub dependency_score: f64,
    pub price_correlation: f64,
    pub thesis: String,
    pub entry_timing: EntryTiming,
    pub risk_adjusted_return: RiskReturn,
    pub as_of: NaiveDate,
}

impl SecondOrderPlay {
    /// Dependency minus correlation; larger means more under-priced.
    pub fn opportunity_gap(&self) -> f64 {
        self.dependency_score - self.price_correlation
    }

    pub fn is_mispriced(&self) -> bool {
        self.entry_timing == EntryTiming::Immediate
    }
}

pub struct SecondOrderEngine<'a> {
    thresholds: &'a Thresholds,
    correlations: &'a CorrelationTable,
}

impl<'a> SecondOrderEngine<'a> {
    pub fn new(thresholds: &'a Thresholds, correlations: &'a CorrelationTable) -> Self {
        Self {
            thresholds,
            correlations,
        }
    }

    pub fn correlation(&self, ticker: &str) -> f64 {
        self.correlations
            .get(ticker)
            .copied()
            .unwrap_or(DEFAULT_CORRELATION)
    }

    /// Plays for every score strictly above the momentum threshold, best
    /// opportunity gap first. Ties keep input order.
    pub fn find_plays(&self, scores: &[MomentumScore]) -> Vec<SecondOrderPlay> {
        let mut plays = Vec::new();

        for score in scores
            .iter()
            .filter(|s| s.momentum_score > self.thresholds.second_order_momentum)
        {
            for category in dependencies_for(score.sector) {
                for supplier in category.suppliers {
                    let Some(ticker) = supplier.ticker else {
                        continue;
                    };
                    let correlation = self.correlation(ticker);
                    let mispriced = supplier.dependency > self.thresholds.high_dependency
                        && correlation < self.thresholds.low_correlation;
                    let (entry_timing, risk_adjusted_return) = if mispriced {
                        (EntryTiming::Immediate, RiskReturn::High)
                    } else {
                        (EntryTiming::Monitor, RiskReturn::Medium)
                    };

                    plays.push(SecondOrderPlay {
                        primary_technology: score.company_name.clone(),
                        primary_sector: score.sector,
                        primary_momentum_score: score.momentum_score,
                        supplier_company: supplier.name.to_string(),
                        supplier_ticker: ticker.to_string(),
                        exposure_type: category.category.to_string(),
                        dependency_score: supplier.dependency,
                        price_correlation: correlation,
                        thesis: category.thesis.to_string(),
                        entry_timing,
                        risk_adjusted_return,
                        as_of: score.as_of,
                    });
                }
            }
        }

        plays.sort_by(|a, b| b.opportunity_gap().total_cmp(&a.opportunity_gap()));
        tracing::debug!(plays = plays.len(), "second-order plays found");
        plays
    }
}

pub fn top_plays(plays: &[SecondOrderPlay], n: usize) -> &[SecondOrderPlay] {
    &plays[..plays.len().min(n)]
}

pub fn filter_immediate_entry(plays: &[SecondOrderPlay]) -> Vec<&SecondOrderPlay> {
    plays.iter().filter(|p| p.is_mispriced()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::{Company, WaveCategory};
    use crate::domain::momentum::MomentumScorer;
    use crate::domain::scoring_config::ScoringConfig;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn score(name: &str, sector: Sector, momentum: f64) -> MomentumScore {
        let cfg = ScoringConfig::default();
        let company = Company::new(name, sector, WaveCategory::Wave1, date("2020-01-01"));
        let mut s = MomentumScorer::new(&cfg, date("2025-01-01")).score(&company, None);
        s.momentum_score = momentum;
        s
    }

    #[test]
    fn threshold_is_strict() {
        let thresholds = Thresholds::default();
        let table = reference_correlations();
        let engine = SecondOrderEngine::new(&thresholds, &table);
        assert!(engine.find_plays(&[score("Acme", Sector::AiInfra, 70.0)]).is_empty());
        assert_eq!(
            engine.find_plays(&[score("Acme", Sector::AiInfra, 70.01)]).len(),
            6
        );
    }

    #[test]
    fn sector_comes_from_score_not_name() {
        let thresholds = Thresholds::default();
        let table = reference_correlations();
        let engine = SecondOrderEngine::new(&thresholds, &table);
        // "Quantum" in the name must not pull quantum suppliers for a 6G company.
        let plays = engine.find_plays(&[score("Quantum Mesh Networks", Sector::SixG, 80.0)]);
        assert_eq!(plays.len(), 4);
        assert!(plays.iter().all(|p| p.primary_sector == Sector::SixG));
    }

    #[test]
    fn private_suppliers_are_skipped_and_mispricing_flagged() {
        let thresholds = Thresholds::default();
        let table = reference_correlations();
        let engine = SecondOrderEngine::new(&thresholds, &table);
        let plays = engine.find_plays(&[score("IonCore", Sector::Quantum, 85.0)]);
        assert_eq!(plays.len(), 2);
        // OXIG.L: .73 - .29 = .44, KEYS: .68 - .43 = .25
        assert_eq!(plays[0].supplier_ticker, "OXIG.L");
        assert_eq!(plays[0].entry_timing, EntryTiming::Immediate);
        assert_eq!(plays[0].risk_adjusted_return, RiskReturn::High);
        // dependency .68 is not above .70
        assert_eq!(plays[1].supplier_ticker, "KEYS");
        assert_eq!(plays[1].entry_timing, EntryTiming::Monitor);
        assert_eq!(filter_immediate_entry(&plays).len(), 1);
        assert_eq!(top_plays(&plays, 1).len(), 1);
        assert_eq!(top_plays(&plays, 10).len(), 2);
    }

    #[test]
    fn unknown_ticker_defaults_to_half() {
        let thresholds = Thresholds::default();
        let empty = CorrelationTable::new();
        let engine = SecondOrderEngine::new(&thresholds, &empty);
        assert_eq!(engine.correlation("ZZZZ"), 0.50);
        let plays = engine.find_plays(&[score("Vault", Sector::Cybersecurity, 90.0)]);
        assert!(plays.iter().all(|p| p.price_correlation == 0.50));
        assert!(filter_immediate_entry(&plays).is_empty());
    }

    #[test]
    fn sorted_by_gap_descending() {
        let thresholds = Thresholds::default();
        let table = reference_correlations();
        let engine = SecondOrderEngine::new(&thresholds, &table);
        let plays = engine.find_plays(&[
            score("Fab One", Sector::Semiconductors, 75.0),
            score("GridCo", Sector::GreenEnergy, 75.0),
            score("Biolab", Sector::BiotechInfra, 95.0),
        ]);
        assert_eq!(plays.len(), 9);
        for pair in plays.windows(2) {
            assert!(pair[0].opportunity_gap() >= pair[1].opportunity_gap());
        }
    }

    #[test]
    fn every_listed_supplier_has_a_reference_correlation() {
        let table = reference_correlations();
        for sector in Sector::ALL {
            for category in dependencies_for(sector) {
                for ticker in category.suppliers.iter().filter_map(|s| s.ticker) {
                    assert!(table.contains_key(ticker), "missing {ticker}");
                }
            }
        }
    }
}
