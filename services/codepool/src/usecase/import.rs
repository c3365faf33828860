use crate::domain::repository::CodePoolRepository;
use crate::domain::types::{DEFAULT_DISCOUNT_PERCENT, ImportReport, parse_code_lines};
use crate::error::{CodepoolError, Field};

pub struct ImportCodesUseCase<P: CodePoolRepository> {
    pub pool: P,
}

impl<P: CodePoolRepository> ImportCodesUseCase<P> {
    /// Add one code per non-blank line of `raw`, skipping values already in
    /// the pool.
    ///
    /// Only an empty field is rejected; text made of blank lines imports
    /// nothing and reports zero counts.
    pub async fn execute(&self, raw: &str) -> Result<ImportReport, CodepoolError> {
        if raw.is_empty() {
            return Err(CodepoolError::MissingField(Field::Codes));
        }
        let codes = parse_code_lines(raw);
        if codes.is_empty() {
            return Ok(ImportReport::default());
        }
        let report = self.pool.import(&codes, DEFAULT_DISCOUNT_PERCENT).await?;
        tracing::info!(
            added = report.added,
            duplicates = report.duplicates,
            "discount codes imported"
        );
        Ok(report)
    }
}
