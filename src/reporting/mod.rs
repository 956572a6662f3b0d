pub mod alerts;
pub mod enrichment;
pub mod report;
pub mod store;

pub use alerts::{Alert, AlertEngine, AlertType, Severity};
pub use enrichment::{enrich_report, CollaboratorStatus, Enricher, EnrichmentOverride, OpenAiEnricher};
pub use report::{HistoricalSummary, Report, ReportComposer, Summary};
pub use store::ReportStore;
