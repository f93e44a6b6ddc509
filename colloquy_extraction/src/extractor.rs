//! Information extractor backed by a completion service.

use std::collections::BTreeMap;
use std::sync::Arc;

use colloquy_core::{CompletionService, Message};
use tracing::{debug, info};

use crate::error::{ExtractionError, Result};
use crate::parse::parse_reply;
use crate::result::{DEFAULT_CONFIDENCE_FLOOR, ExtractionResult};
use crate::schema::FieldSchema;

/// Configuration for the extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Minimum confidence for a result to count as valid
    pub confidence_floor: f64,
    /// Fields to extract
    pub schema: FieldSchema,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            schema: FieldSchema::default(),
        }
    }
}

impl ExtractionConfig {
    #[must_use]
    pub const fn with_confidence_floor(mut self, floor: f64) -> Self {
        self.confidence_floor = floor;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = schema;
        self
    }
}

/// Extracts a fixed schema of fields from free text.
pub struct InformationExtractor<P = Arc<dyn CompletionService>>
where
    P: CompletionService,
{
    service: P,
    config: ExtractionConfig,
}

impl<P> InformationExtractor<P>
where
    P: CompletionService,
{
    pub const fn new(service: P, config: ExtractionConfig) -> Self {
        Self { service, config }
    }

    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract, score and validate the schema's fields from `text`.
    ///
    /// Missing fields are absent values, and validator failures land in
    /// `validation_errors`. Only empty input, service failures and
    /// unparseable replies are errors.
    pub async fn extract_information(&self, text: &str) -> Result<ExtractionResult> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let request = vec![Message::system(self.instructions())?, Message::user(text)?];

        info!(
            "Extracting {} fields from {} chars of text",
            self.config.schema.len(),
            text.len()
        );
        let reply = self.service.complete(&request).await?;
        debug!("Extraction reply: {} chars", reply.len());

        let parsed = parse_reply(&reply, &self.config.schema)?;
        let confidence = self.confidence(parsed.confidence, &parsed.data);

        let validation_errors: Vec<String> = parsed
            .data
            .iter()
            .filter_map(|(field, value)| {
                let value = value.as_deref()?;
                self.config.schema.validate_field(field, value).err()
            })
            .collect();

        let result = ExtractionResult::new(parsed.data, confidence)?
            .with_validation_errors(validation_errors)
            .with_confidence_floor(self.config.confidence_floor);

        info!(
            "Extracted {}/{} fields (confidence {:.2}, {} validation errors)",
            result.extracted_fields().len(),
            self.config.schema.len(),
            result.confidence_score(),
            result.validation_errors().len()
        );

        Ok(result)
    }

    /// The service's own score when usable, otherwise field coverage.
    fn confidence(
        &self,
        reported: Option<f64>,
        data: &BTreeMap<String, Option<String>>,
    ) -> f64 {
        if let Some(score) = reported.filter(|s| (0.0..=1.0).contains(s)) {
            return score;
        }
        if let Some(score) = reported {
            debug!("Ignoring out-of-range reported confidence {score}");
        }

        let total = self.config.schema.len();
        if total == 0 {
            return 0.0;
        }
        let found = data.values().filter(|v| v.is_some()).count();
        found as f64 / total as f64
    }

    fn instructions(&self) -> String {
        let keys = self.config.schema.names().join(", ");
        format!(
            "Extract the following fields from the user's text: {keys}. \
             Respond with a single JSON object and nothing else. The object must have \
             exactly these keys, using null for any field the text does not state. \
             Do not guess or invent values. Also include a \"confidence\" key with a \
             number between 0 and 1 describing how certain you are of the extraction."
        )
    }
}
