#![allow(dead_code)]

use chrono::NaiveDate;
use momentum_arb::domain::company::{
    Company, ExecutiveHire, FundingRound, PatentGrant, PublicProxy, Sector, WaveCategory,
};
use momentum_arb::domain::error::ArbError;
use momentum_arb::ports::company_port::CompanyPort;
use std::cell::RefCell;
use std::io::Write;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn as_of() -> NaiveDate {
    date("2025-01-06")
}

/// In-memory company source.
pub struct MockCompanyPort {
    pub companies: Vec<Company>,
    pub error: Option<String>,
    pub saved: RefCell<Vec<Company>>,
}

impl MockCompanyPort {
    pub fn new(companies: Vec<Company>) -> Self {
        Self {
            companies,
            error: None,
            saved: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            companies: Vec::new(),
            error: Some(reason.to_string()),
            saved: RefCell::new(Vec::new()),
        }
    }
}

impl CompanyPort for MockCompanyPort {
    fn load_companies(&self) -> Result<Vec<Company>, ArbError> {
        match &self.error {
            Some(reason) => Err(ArbError::DataLoad {
                path: "<mock>".into(),
                reason: reason.clone(),
            }),
            None => Ok(self.companies.clone()),
        }
    }

    fn save_companies(&self, companies: &[Company]) -> Result<(), ArbError> {
        self.saved.replace(companies.to_vec());
        Ok(())
    }
}

/// Late-stage AI infrastructure company with strong build signals.
pub fn hyperscaler() -> Company {
    let mut c = Company::new(
        "Atlas Compute",
        Sector::AiInfra,
        WaveCategory::Wave1,
        date("2017-03-01"),
    );
    c.bottleneck_solved = "GPU capacity".into();
    c.funding_rounds = vec![
        FundingRound {
            date: date("2023-05-01"),
            amount: 400e6,
            lead_investor: "Magnetar".into(),
            valuation: Some(7e9),
            round_type: "Series C".into(),
        },
        FundingRound {
            date: date("2024-10-01"),
            amount: 1.1e9,
            lead_investor: "Coatue".into(),
            valuation: Some(19e9),
            round_type: "Series D".into(),
        },
    ];
    c.total_funding = 1.5e9;
    c.last_valuation = Some(19e9);
    c.patent_grants = (0..6)
        .map(|i| PatentGrant {
            grant_date: date("2024-09-01") + chrono::Duration::days(i * 10),
            patent_id: format!("US-{i}"),
            title: "Cluster scheduling".into(),
            citation_count: 4,
            technology_cluster: "scheduling".into(),
        })
        .collect();
    c.patent_count = 40;
    c.executive_hires = vec![ExecutiveHire {
        date: date("2024-11-15"),
        role: "Chief Financial Officer".into(),
        name: "J. Doe".into(),
        previous_company: "Snowflake".into(),
        is_ipo_signal: true,
    }];
    c.employee_count = 900;
    c.engineer_pct = 65.0;
    c.faang_talent_pct = 35.0;
    c.public_proxies = vec![PublicProxy {
        ticker: "NVDA".into(),
        exposure_type: "supplier".into(),
        correlation_score: 0.6,
        revenue_exposure_pct: None,
    }];
    c.fortune_500_customers = 60;
    c.estimated_arr = Some(500e6);
    c.ipo_probability_6mo = 0.4;
    c.ipo_probability_12mo = 0.7;
    c
}

/// Mid-stage security company.
pub fn security_vendor() -> Company {
    let mut c = Company::new(
        "Sentinel Labs",
        Sector::Cybersecurity,
        WaveCategory::Wave2,
        date("2019-06-01"),
    );
    c.funding_rounds = vec![FundingRound {
        date: date("2024-02-01"),
        amount: 120e6,
        lead_investor: "Accel".into(),
        valuation: Some(1.2e9),
        round_type: "Series B".into(),
    }];
    c.total_funding = 180e6;
    c.last_valuation = Some(1.2e9);
    c.employee_count = 250;
    c.engineer_pct = 55.0;
    c.fortune_500_customers = 12;
    c.estimated_arr = Some(40e6);
    c.ipo_probability_12mo = 0.2;
    c
}

/// Seed-stage quantum company with almost no data.
pub fn quantum_startup() -> Company {
    Company::new(
        "Qubit Forge",
        Sector::Quantum,
        WaveCategory::Wave1,
        date("2022-01-01"),
    )
}

pub fn sample_companies() -> Vec<Company> {
    vec![quantum_startup(), security_vendor(), hyperscaler()]
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub const VALID_INI: &str = r#"
[weights.composite]
hype = 0.40
build = 0.60

[thresholds]
divergence_high = 65
divergence_low = 45
high_conviction = 0.70

[risk]
base_position_size = 0.03
min_position_size = 0.01
max_position_size = 0.05

[market]
ipo_window = open
volatility = medium
interest_rates = neutral

[report]
as_of = 2025-01-06
"#;
