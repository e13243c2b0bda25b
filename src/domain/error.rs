//! Domain error types.

/// Top-level error type for momentum-arb.
#[derive(Debug, thiserror::Error)]
pub enum ArbError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(
        "misaligned batch: {companies} companies, {momentum} momentum scores, {moat} moat scores"
    )]
    MisalignedBatch {
        companies: usize,
        momentum: usize,
        moat: usize,
    },

    #[error("no {kind} score for company {company_id}")]
    MissingScore { company_id: String, kind: String },

    #[error("failed to load companies from {path}: {reason}")]
    DataLoad { path: String, reason: String },

    #[error("failed to export report to {path}: {reason}")]
    Export { path: String, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ArbError> for std::process::ExitCode {
    fn from(err: &ArbError) -> Self {
        let code: u8 = match err {
            ArbError::Io(_) => 1,
            ArbError::ConfigParse { .. }
            | ArbError::ConfigMissing { .. }
            | ArbError::ConfigInvalid { .. } => 2,
            ArbError::DataLoad { .. } | ArbError::Json(_) => 3,
            ArbError::MisalignedBatch { .. } | ArbError::MissingScore { .. } => 4,
            ArbError::Export { .. } | ArbError::Csv(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misaligned_batch_message_lists_all_lengths() {
        let err = ArbError::MisalignedBatch {
            companies: 3,
            momentum: 2,
            moat: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 companies"));
        assert!(msg.contains("2 momentum scores"));
        assert!(msg.contains("3 moat scores"));
    }

    #[test]
    fn missing_score_names_company_and_kind() {
        let err = ArbError::MissingScore {
            company_id: "acme".into(),
            kind: "moat".into(),
        };
        assert_eq!(err.to_string(), "no moat score for company acme");
    }

    #[test]
    fn exit_codes_group_by_failure_class() {
        use std::process::ExitCode;

        let io = ArbError::Io(std::io::Error::other("disk"));
        let cfg = ArbError::ConfigMissing {
            section: "data".into(),
            key: "companies".into(),
        };
        let batch = ArbError::MisalignedBatch {
            companies: 1,
            momentum: 0,
            moat: 0,
        };
        let dbg = |c: ExitCode| format!("{c:?}");
        assert_eq!(dbg(ExitCode::from(&io)), dbg(ExitCode::from(1)));
        assert_eq!(dbg(ExitCode::from(&cfg)), dbg(ExitCode::from(2)));
        assert_eq!(dbg(ExitCode::from(&batch)), dbg(ExitCode::from(4)));
    }
}
