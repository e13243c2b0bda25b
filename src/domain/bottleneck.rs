//! Curated watchlist of emerging infrastructure bottlenecks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::company::{Sector, WaveCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub name: String,
    pub description: String,
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub private_companies: Vec<String>,
    pub public_proxies: Vec<String>,
    pub estimated_market_size: Option<f64>,
    pub market_size_year: Option<i32>,
    pub wave_classification: WaveCategory,
    pub sector: Sector,
    pub priority: Priority,
    pub discovered_on: NaiveDate,
}

struct Entry {
    name: &'static str,
    description: &'static str,
    confidence: f64,
    evidence: &'static [&'static str],
    private_companies: &'static [&'static str],
    public_proxies: &'static [&'static str],
    market_size: f64,
    market_year: i32,
    sector: Sector,
    priority: Priority,
}

const WATCHLIST: &[Entry] = &[
    Entry {
        name: "AI Model Serving Latency",
        description: "Infrastructure bottleneck in low-latency inference serving for production AI applications. Edge deployment and real-time response requirements driving demand for specialized inference infrastructure.",
        confidence: 0.87,
        evidence: &[
            "34 patent grants in 'low-latency serving' cluster (up 340% YoY)",
            "a16z published infrastructure thesis: 'The Inference Wars'",
            "12 SEC filings mentioned 'inference optimization' in Q4 2024",
            "Sequoia Capital memo on 'The $200B Inference Market'",
            "Google Trends: 'inference optimization' up 230% YoY",
        ],
        private_companies: &["Groq", "Modular", "SambaNova", "Cerebras", "d-Matrix", "Tenstorrent"],
        public_proxies: &["NVDA", "AVGO", "AMD"],
        market_size: 4.2e9,
        market_year: 2027,
        sector: Sector::AiInfra,
        priority: Priority::Critical,
    },
    Entry {
        name: "Agentic AI Orchestration Infrastructure",
        description: "Lack of robust orchestration and reliability infrastructure for multi-agent AI systems. As AI agents proliferate, need for workflow management, inter-agent communication, and failure handling becomes critical.",
        confidence: 0.82,
        evidence: &[
            "18 VC theses published on 'AI agents' and 'orchestration' in Q4 2024",
            "Benchmark Capital: 'The Agent Operating System'",
            "Microsoft, Google launching agent frameworks signals market formation",
            "56 startups raised $2.1B for agent infrastructure in 2024",
            "Gartner prediction: '25% of enterprises will deploy AI agents by 2026'",
        ],
        private_companies: &["LangChain (LangSmith)", "Fixie.ai", "Relevance AI", "MultiOn", "Adept"],
        public_proxies: &["MSFT", "GOOGL", "CRM"],
        market_size: 8.5e9,
        market_year: 2028,
        sector: Sector::AiInfra,
        priority: Priority::Critical,
    },
    Entry {
        name: "Sovereign AI Infrastructure",
        description: "National security and data sovereignty driving demand for localized AI compute infrastructure. Countries building domestic AI capabilities to reduce dependence on US hyperscalers.",
        confidence: 0.79,
        evidence: &[
            "EU AI Act creating regulatory moat for European AI infrastructure",
            "Middle East sovereign wealth funds investing $50B+ in AI datacenters",
            "Japan, India announcing national AI infrastructure programs",
            "CoreWeave expanding into UAE, Saudi Arabia for sovereign cloud",
            "15 countries announced AI sovereignty initiatives in 2024",
        ],
        private_companies: &["CoreWeave", "Lambda Labs", "Crusoe Energy", "Applied Digital"],
        public_proxies: &["EQIX", "DLR", "VRT"],
        market_size: 35e9,
        market_year: 2029,
        sector: Sector::AiInfra,
        priority: Priority::High,
    },
    Entry {
        name: "Post-Quantum Cryptography Migration",
        description: "NIST finalization of post-quantum cryptography standards (2024) triggering enterprise migration wave. Massive infrastructure replacement cycle as quantum threat becomes imminent.",
        confidence: 0.75,
        evidence: &[
            "NIST published PQC standards in August 2024",
            "NSA mandating PQC for classified systems by 2025",
            "Banking sector required to begin PQC migration by 2026",
            "23 security vendors announced PQC products in 2024",
            "Estimated $15B+ in cryptography infrastructure replacement needed",
        ],
        private_companies: &["PQShield", "Quantum Xchange", "ISARA Corporation", "Post-Quantum"],
        public_proxies: &["PANW", "FTNT", "ZS", "CRWD"],
        market_size: 15e9,
        market_year: 2030,
        sector: Sector::Cybersecurity,
        priority: Priority::High,
    },
    Entry {
        name: "Energy-Efficient AI Chip Architecture",
        description: "Power consumption of AI training and inference becoming prohibitive. Datacenter power constraints and carbon targets driving demand for specialized low-power AI silicon.",
        confidence: 0.81,
        evidence: &[
            "45 patent grants in 'energy-efficient neural processing' (up 280% YoY)",
            "Major hyperscalers announcing custom low-power AI chips",
            "EU datacenter power regulations tightening in 2025",
            "Analog AI chip startups raised $1.2B in 2024",
            "Industry consortium formed for 'Green AI Computing' standards",
        ],
        private_companies: &["Graphcore", "d-Matrix", "Rain AI", "Mythic", "Untether AI"],
        public_proxies: &["ARM", "INTC", "NVDA"],
        market_size: 12e9,
        market_year: 2028,
        sector: Sector::Semiconductors,
        priority: Priority::High,
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The current watchlist, stamped with `as_of`.
pub fn watchlist(as_of: NaiveDate) -> Vec<Bottleneck> {
    WATCHLIST
        .iter()
        .map(|e| Bottleneck {
            name: e.name.to_string(),
            description: e.description.to_string(),
            confidence: e.confidence,
            evidence: owned(e.evidence),
            private_companies: owned(e.private_companies),
            public_proxies: owned(e.public_proxies),
            estimated_market_size: Some(e.market_size),
            market_size_year: Some(e.market_year),
            wave_classification: WaveCategory::Wave1,
            sector: e.sector,
            priority: e.priority,
            discovered_on: as_of,
        })
        .collect()
}

pub fn filter_by_priority(bottlenecks: &[Bottleneck], minimum: Priority) -> Vec<&Bottleneck> {
    bottlenecks.iter().filter(|b| b.priority >= minimum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn five_entries_stamped_with_date() {
        let list = watchlist(as_of());
        assert_eq!(list.len(), 5);
        assert!(list.iter().all(|b| b.discovered_on == as_of()));
        assert!(list.iter().all(|b| b.evidence.len() == 5));
        assert_eq!(list[3].sector, Sector::Cybersecurity);
        assert_eq!(list[4].public_proxies, vec!["ARM", "INTC", "NVDA"]);
    }

    #[test]
    fn priority_filter_is_inclusive() {
        let list = watchlist(as_of());
        assert_eq!(filter_by_priority(&list, Priority::Critical).len(), 2);
        assert_eq!(filter_by_priority(&list, Priority::High).len(), 5);
    }

    #[test]
    fn priority_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(Priority::High.to_string(), "HIGH");
    }
}
