//! JSON company file adapter.
//!
//! The file holds a single array of company records. Records are checked on
//! load; the first bad record fails the whole file.

use crate::domain::company::{Company, company_id_for};
use crate::domain::error::ArbError;
use crate::ports::company_port::CompanyPort;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

pub struct JsonCompanyAdapter {
    path: PathBuf,
}

impl JsonCompanyAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_error(&self, reason: impl Into<String>) -> ArbError {
        ArbError::DataLoad {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    fn validate(&self, companies: &mut [Company]) -> Result<(), ArbError> {
        let mut seen = HashSet::new();
        for c in companies.iter_mut() {
            if c.name.trim().is_empty() {
                return Err(self.load_error("company with empty name"));
            }
            if c.company_id.is_empty() {
                c.company_id = company_id_for(&c.name);
            }
            if !seen.insert(c.company_id.clone()) {
                return Err(self.load_error(format!("duplicate company id '{}'", c.company_id)));
            }
            if !c.total_funding.is_finite() || c.total_funding < 0.0 {
                return Err(self.load_error(format!("{}: total_funding must be >= 0", c.name)));
            }
            for (field, pct) in [
                ("engineer_pct", c.engineer_pct),
                ("faang_talent_pct", c.faang_talent_pct),
            ] {
                if !(0.0..=100.0).contains(&pct) {
                    return Err(self.load_error(format!("{}: {field} must be within 0..100", c.name)));
                }
            }
            for (field, p) in [
                ("ipo_probability_6mo", c.ipo_probability_6mo),
                ("ipo_probability_12mo", c.ipo_probability_12mo),
            ] {
                if !(0.0..=1.0).contains(&p) {
                    return Err(self.load_error(format!("{}: {field} must be within 0..1", c.name)));
                }
            }
        }
        Ok(())
    }
}

impl CompanyPort for JsonCompanyAdapter {
    fn load_companies(&self) -> Result<Vec<Company>, ArbError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.load_error(format!("read failed: {e}")))?;
        let mut companies: Vec<Company> = serde_json::from_str(&content)
            .map_err(|e| self.load_error(format!("invalid company JSON: {e}")))?;
        self.validate(&mut companies)?;
        tracing::info!(count = companies.len(), path = %self.path.display(), "loaded companies");
        Ok(companies)
    }

    fn save_companies(&self, companies: &[Company]) -> Result<(), ArbError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(companies)?;
        fs::write(&self.path, json)?;
        tracing::info!(count = companies.len(), path = %self.path.display(), "saved companies");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::{Sector, WaveCategory};
    use crate::domain::synthetic::generate_companies;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("companies.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn save_then_load_preserves_records() {
        let dir = TempDir::new().unwrap();
        let adapter = JsonCompanyAdapter::new(dir.path().join("nested/companies.json"));
        let companies = generate_companies(5, 10, as_of());
        adapter.save_companies(&companies).unwrap();
        let loaded = adapter.load_companies().unwrap();
        assert_eq!(loaded.len(), companies.len());
        for (a, b) in loaded.iter().zip(&companies) {
            assert_eq!(a.company_id, b.company_id);
            assert_eq!(a.sector, b.sector);
            assert_eq!(a.funding_rounds.len(), b.funding_rounds.len());
            assert_eq!(a.executive_hires, b.executive_hires);
        }
    }

    #[test]
    fn missing_id_is_derived_from_name() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[{"company_id": "", "name": "Lambda Labs", "sector": "AI_Infra",
                 "wave_category": "Wave1", "total_funding": 8.2e8,
                 "founded_date": "2012-01-01"}]"#,
        );
        let companies = JsonCompanyAdapter::new(path).load_companies().unwrap();
        assert_eq!(companies[0].company_id, "lambda-labs");
    }

    #[test]
    fn missing_file_is_data_load_error() {
        let adapter = JsonCompanyAdapter::new("/nonexistent/companies.json");
        assert!(matches!(
            adapter.load_companies(),
            Err(ArbError::DataLoad { .. })
        ));
    }

    #[test]
    fn unknown_sector_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[{"company_id": "x", "name": "X", "sector": "Robotics",
                 "wave_category": "Wave1", "total_funding": 1.0e6,
                 "founded_date": "2020-01-01"}]"#,
        );
        let err = JsonCompanyAdapter::new(path).load_companies().unwrap_err();
        assert!(err.to_string().contains("invalid company JSON"));
    }

    #[test]
    fn record_without_funding_total_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[{"company_id": "acme", "name": "Acme", "sector": "AI_Infra",
                 "wave_category": "Wave1", "founded_date": "2020-01-01"}]"#,
        );
        let err = JsonCompanyAdapter::new(path).load_companies().unwrap_err();
        assert!(matches!(err, ArbError::DataLoad { .. }));
        assert!(err.to_string().contains("total_funding"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let dir = TempDir::new().unwrap();
        let adapter = JsonCompanyAdapter::new(dir.path().join("c.json"));
        let founded = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let a = Company::new("Acme", Sector::Quantum, WaveCategory::Wave1, founded);
        adapter.save_companies(&[a.clone(), a]).unwrap();
        let err = adapter.load_companies().unwrap_err();
        assert!(err.to_string().contains("duplicate company id 'acme'"));
    }

    #[test]
    fn out_of_range_probability_rejected() {
        let dir = TempDir::new().unwrap();
        let adapter = JsonCompanyAdapter::new(dir.path().join("c.json"));
        let founded = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut a = Company::new("Acme", Sector::Quantum, WaveCategory::Wave1, founded);
        a.ipo_probability_12mo = 1.5;
        adapter.save_companies(&[a]).unwrap();
        let err = adapter.load_companies().unwrap_err();
        assert!(err.to_string().contains("ipo_probability_12mo"));
    }
}
