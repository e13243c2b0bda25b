//! Seeded synthetic company fixtures for demos and tests.
//!
//! Names and headline financials come from a fixed per-sector roster; dates,
//! investors, headcount and talent mix are drawn from a seeded ChaCha
//! generator, so the same seed always yields the same companies.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::domain::company::{
    Company, ExecutiveHire, FundingRound, PatentGrant, PublicProxy, Sector, WaveCategory,
};

struct RosterEntry {
    name: &'static str,
    funding: f64,
    valuation: f64,
    arr: f64,
    customers: u32,
    patents: u32,
}

const fn entry(
    name: &'static str,
    funding: f64,
    valuation: f64,
    arr: f64,
    customers: u32,
    patents: u32,
) -> RosterEntry {
    RosterEntry {
        name,
        funding,
        valuation,
        arr,
        customers,
        patents,
    }
}

const AI_INFRA: &[RosterEntry] = &[
    entry("CoreWeave", 2.3e9, 19e9, 500e6, 85, 18),
    entry("SambaNova Systems", 1.318e9, 5.1e9, 220e6, 35, 40),
    entry("Anyscale", 259e6, 1e9, 45e6, 58, 12),
    entry("Weights & Biases", 250e6, 1e9, 75e6, 125, 8),
    entry("d-Matrix", 154e6, 580e6, 18e6, 12, 22),
    entry("LangChain", 35e6, 200e6, 12e6, 450, 3),
];

const DATA_INFRA: &[RosterEntry] = &[
    entry("dbt Labs", 582e6, 4.2e9, 325e6, 285, 14),
    entry("Starburst Data", 414e6, 3.35e9, 175e6, 145, 20),
    entry("ClickHouse", 350e6, 2e9, 95e6, 220, 25),
    entry("Airbyte", 181e6, 1.5e9, 42e6, 180, 9),
];

const SEMICONDUCTORS: &[RosterEntry] = &[
    entry("SiFive", 680e6, 2.5e9, 120e6, 45, 245),
    entry("Graphcore", 710e6, 2.77e9, 85e6, 32, 156),
    entry("Esperanto Technologies", 258e6, 800e6, 38e6, 18, 89),
    entry("Mythic AI", 165e6, 450e6, 15e6, 12, 67),
    entry("Rain AI", 33e6, 150e6, 2e6, 4, 18),
];

const CYBERSECURITY: &[RosterEntry] = &[
    entry("Rubrik", 752e6, 4e9, 520e6, 245, 60),
    entry("Snyk", 1.01e9, 8.5e9, 380e6, 2400, 35),
    entry("Transmit Security", 643e6, 2.7e9, 145e6, 85, 28),
    entry("Lacework", 1.8e9, 8.3e9, 285e6, 165, 40),
];

const QUANTUM: &[RosterEntry] = &[
    entry("PsiQuantum", 665e6, 3.15e9, 0.0, 0, 215),
    entry("Atom Computing", 198e6, 850e6, 8e6, 6, 67),
    entry("QuEra Computing", 42e6, 180e6, 3e6, 5, 34),
];

const SIX_G: &[RosterEntry] = &[
    entry("Rivada Space Networks", 2.4e9, 5e9, 0.0, 0, 67),
    entry("E-Space", 142e6, 650e6, 0.0, 0, 89),
    entry("Lynk Global", 95e6, 380e6, 4e6, 6, 178),
    entry("Omnispace", 89e6, 320e6, 5e6, 4, 124),
];

const GREEN_ENERGY: &[RosterEntry] = &[
    entry("Form Energy", 829e6, 1.2e9, 0.0, 5, 156),
    entry("Twelve", 645e6, 1.4e9, 18e6, 12, 234),
    entry("ESS Inc", 320e6, 850e6, 42e6, 18, 89),
    entry("Antora Energy", 150e6, 500e6, 0.0, 3, 78),
];

const BIOTECH_INFRA: &[RosterEntry] = &[
    entry("Benchling", 625e6, 6.1e9, 185e6, 850, 22),
    entry("Insitro", 643e6, 2.8e9, 0.0, 8, 45),
    entry("Strateos", 120e6, 400e6, 12e6, 9, 15),
];

fn roster(sector: Sector) -> &'static [RosterEntry] {
    match sector {
        Sector::AiInfra => AI_INFRA,
        Sector::DataInfra => DATA_INFRA,
        Sector::Semiconductors => SEMICONDUCTORS,
        Sector::Cybersecurity => CYBERSECURITY,
        Sector::Quantum => QUANTUM,
        Sector::SixG => SIX_G,
        Sector::GreenEnergy => GREEN_ENERGY,
        Sector::BiotechInfra => BIOTECH_INFRA,
    }
}

/// Number of distinct companies the roster can produce.
pub fn roster_size() -> usize {
    Sector::ALL.iter().map(|s| roster(*s).len()).sum()
}

const INVESTORS: [&str; 8] = [
    "Sequoia Capital",
    "Andreessen Horowitz",
    "Lightspeed",
    "Index Ventures",
    "Coatue",
    "Tiger Global",
    "Insight Partners",
    "SoftBank",
];

const ROUND_TYPES: [&str; 4] = ["Series B", "Series C", "Series D", "Series E"];

const HEADQUARTERS: [&str; 6] = [
    "San Francisco, CA",
    "Palo Alto, CA",
    "New York, NY",
    "Boston, MA",
    "Austin, TX",
    "Seattle, WA",
];

const PREVIOUS_EMPLOYERS: [&str; 5] = ["Google", "Amazon", "Meta", "Stripe", "Snowflake"];

fn sector_proxies(sector: Sector) -> &'static [(&'static str, &'static str)] {
    match sector {
        Sector::AiInfra => &[("NVDA", "GPU supplier"), ("MSFT", "Cloud partner")],
        Sector::DataInfra => &[("SNOW", "Competitor"), ("MDB", "Adjacent market")],
        Sector::Semiconductors => &[("ARM", "IP licensor"), ("TSM", "Foundry partner")],
        Sector::Cybersecurity => &[("CRWD", "Competitor"), ("PANW", "Competitor")],
        Sector::Quantum => &[("IONQ", "Competitor"), ("IBM", "Competitor")],
        Sector::SixG => &[("ASTS", "Competitor"), ("QRVO", "RF supplier")],
        Sector::GreenEnergy => &[("FLNC", "Competitor"), ("ENPH", "Adjacent market")],
        Sector::BiotechInfra => &[("RXRX", "Competitor"), ("DNA", "Adjacent market")],
    }
}

fn wave_for(sector: Sector) -> WaveCategory {
    match sector {
        Sector::AiInfra | Sector::Quantum | Sector::SixG => WaveCategory::Wave1,
        Sector::Semiconductors | Sector::GreenEnergy | Sector::BiotechInfra => WaveCategory::Wave2,
        Sector::DataInfra | Sector::Cybersecurity => WaveCategory::Wave3,
    }
}

pub struct CompanyGenerator {
    rng: ChaCha8Rng,
    as_of: NaiveDate,
}

impl CompanyGenerator {
    pub fn new(seed: u64, as_of: NaiveDate) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            as_of,
        }
    }

    /// Up to `count` companies, drawn round-robin across sectors so small
    /// batches still span every sector. Capped at [`roster_size`].
    pub fn generate(&mut self, count: usize) -> Vec<Company> {
        let mut picked = Vec::with_capacity(count.min(roster_size()));
        let mut round = 0;
        while picked.len() < count {
            let mut any = false;
            for sector in Sector::ALL {
                if picked.len() == count {
                    break;
                }
                if let Some(e) = roster(sector).get(round) {
                    picked.push((sector, e));
                    any = true;
                }
            }
            if !any {
                break;
            }
            round += 1;
        }

        let companies: Vec<Company> = picked
            .into_iter()
            .map(|(sector, e)| self.company(sector, e))
            .collect();
        tracing::debug!(count = companies.len(), "generated synthetic companies");
        companies
    }

    fn days_ago(&mut self, max_days: i64) -> NaiveDate {
        self.as_of - Duration::days(self.rng.gen_range(1..=max_days))
    }

    fn pick<'s>(&mut self, items: &'s [&'s str]) -> &'s str {
        items.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn company(&mut self, sector: Sector, e: &RosterEntry) -> Company {
        let founded = NaiveDate::from_ymd_opt(self.rng.gen_range(2014..=2022), 1, 1)
            .unwrap_or(self.as_of);
        let mut c = Company::new(e.name, sector, wave_for(sector), founded);
        c.bottleneck_solved = format!("{} infrastructure bottleneck", sector);

        c.total_funding = e.funding;
        c.last_valuation = Some(e.valuation);
        c.funding_rounds = vec![FundingRound {
            date: self.days_ago(365),
            amount: e.funding * self.rng.gen_range(0.3..0.6),
            lead_investor: self.pick(&INVESTORS).to_string(),
            valuation: Some(e.valuation),
            round_type: self.pick(&ROUND_TYPES).to_string(),
        }];

        c.patent_count = e.patents;
        let recent_grants = e.patents.min(12);
        c.patent_grants = (0..recent_grants)
            .map(|i| PatentGrant {
                grant_date: self.days_ago(540),
                patent_id: format!("US11{}{:02}", self.rng.gen_range(10_000..99_999), i),
                title: format!("{} system {}", sector, i + 1),
                citation_count: self.rng.gen_range(0..60),
                technology_cluster: sector.as_str().to_lowercase(),
            })
            .collect();

        if e.funding > 300e6 && self.rng.gen_bool(0.5) {
            c.executive_hires.push(ExecutiveHire {
                date: self.days_ago(540),
                role: "Chief Financial Officer".to_string(),
                name: format!("{} CFO", e.name),
                previous_company: self.pick(&PREVIOUS_EMPLOYERS).to_string(),
                is_ipo_signal: true,
            });
        }

        c.employee_count = self.rng.gen_range(80..2500);
        c.engineer_pct = self.rng.gen_range(45.0..85.0);
        c.faang_talent_pct = self.rng.gen_range(10.0..45.0);
        c.fortune_500_customers = e.customers;
        c.estimated_arr = (e.arr > 0.0).then_some(e.arr);

        c.ipo_probability_6mo = self.rng.gen_range(0.05..0.45);
        c.ipo_probability_12mo = (c.ipo_probability_6mo + self.rng.gen_range(0.10..0.35)).min(0.95);

        let proxies = sector_proxies(sector);
        if let Some((ticker, exposure)) = proxies.choose(&mut self.rng) {
            c.public_proxies.push(PublicProxy {
                ticker: ticker.to_string(),
                exposure_type: exposure.to_string(),
                correlation_score: self.rng.gen_range(0.30..0.85),
                revenue_exposure_pct: None,
            });
        }

        c.headquarters = self.pick(&HEADQUARTERS).to_string();
        c.website = format!("https://{}.com", c.company_id.replace('-', ""));
        c
    }
}

/// Convenience wrapper around [`CompanyGenerator`].
pub fn generate_companies(seed: u64, count: usize, as_of: NaiveDate) -> Vec<Company> {
    CompanyGenerator::new(seed, as_of).generate(count)
}
