use thiserror::Error;

/// Rejections raised at the ingestion boundary, before any analyzer runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Deal {ticket:?} is missing required field `{field}`")]
    MissingField {
        ticket: Option<i64>,
        field: &'static str,
    },

    #[error("Deal {ticket:?} has invalid {field}: {value}")]
    InvalidValue {
        ticket: Option<i64>,
        field: &'static str,
        value: String,
    },

    #[error("Deal {ticket:?} has unknown {field} code: {code}")]
    UnknownCode {
        ticket: Option<i64>,
        field: &'static str,
        code: String,
    },
}

/// Failures of the optional enrichment collaborator. Never fatal to a report.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Enrichment request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Enrichment API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Enrichment response could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Enrichment response had no content")]
    EmptyResponse,
}
