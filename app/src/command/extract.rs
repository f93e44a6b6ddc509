use std::io::Read;

use colloquy_config::Config;
use colloquy_extraction::{ExtractionResult, InformationExtractor};

use super::build_provider;

/// Input parameters for the Extract command strategy.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    /// Text to extract from; read from stdin when absent
    pub text: Option<String>,
}

/// Strategy for extracting contact details from free text.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let extractor =
            InformationExtractor::new(build_provider(&config)?, config.extraction_config());

        let text = match input.text {
            Some(text) => text,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let result = extractor.extract_information(&text).await?;

        print_result(&result);
        Ok(())
    }
}

pub(super) fn print_result(result: &ExtractionResult) {
    println!("Extracted fields:");
    for (field, value) in result.extracted_data() {
        println!("  {field}: {}", value.as_deref().unwrap_or("-"));
    }
    println!();
    println!("Confidence: {:.2}", result.confidence_score());
    println!("Valid: {}", if result.is_valid() { "yes" } else { "no" });

    if !result.validation_errors().is_empty() {
        println!("Validation errors:");
        for error in result.validation_errors() {
            println!("  - {error}");
        }
    }
}
