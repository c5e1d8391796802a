//! Prompt and response-schema construction.
//!
//! The instruction embeds every submitted field; the schema declares the
//! exact `ValuationResult` shape to the provider. The provider is asked to
//! honor the schema but is never trusted to (see `parse`).

use qval_types::AssetParams;
use serde_json::{Value, json};

/// Persona line sent as the system instruction.
pub const SYSTEM_INSTRUCTION: &str = "You are Q-Val, an advanced financial modeling AI. \
     You are precise, conservative in estimates, and technical in language.";

/// Natural-language task description for one valuation run.
pub fn build_prompt(params: &AssetParams) -> String {
    format!(
        "Act as a Quantum Machine Learning (QML) engine specializing in pricing illiquid assets \
         for Islamic Finance (Sukuk).\n\n\
         Task: Generate a synthetic price path and valuation report for the following asset using \
         a simulated Quantum Boltzmann Machine approach to infer correlations with liquid market \
         proxies.\n\n\
         Asset Details:\n\
         - Name: {name}\n\
         - Type: {asset_type}\n\
         - Region: {region}\n\
         - Initial Value: {currency} {initial_value}\n\
         - Tenure: {tenure} years\n\
         - Context: {description}\n\n\
         Requirements:\n\
         1. Select a suitable liquid market proxy (e.g., a REIT index, Infrastructure ETF, or \
         Commodity index) relevant to the region and asset type.\n\
         2. Simulate a price path for the next {months} months (monthly data points).\n\
         3. The path should reflect realistic market volatility and economic cycles, not just a \
         straight line.\n\
         4. Calculate a \"Tangibility Ratio\" assuming this asset is part of a Sukuk portfolio. \
         (Ideally > 51% for tradability, but simulate based on asset nature).\n\
         5. Provide a confidence interval (upper/lower bounds) representing the quantum \
         uncertainty of the valuation.\n\
         6. Return ONLY JSON data matching the schema.",
        name = params.name,
        asset_type = params.asset_type.label(),
        region = params.region.label(),
        currency = params.currency,
        initial_value = format_thousands(params.initial_value),
        tenure = params.tenure_years,
        description = params.description,
        months = params.path_months(),
    )
}

/// JSON schema declaring the `ValuationResult` shape to the provider,
/// field set and required lists included.
pub fn valuation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "pricePath": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "month": { "type": "INTEGER" },
                        "syntheticPrice": { "type": "NUMBER" },
                        "upperBound": { "type": "NUMBER" },
                        "lowerBound": { "type": "NUMBER" },
                        "proxyCorrelation": {
                            "type": "NUMBER",
                            "description": "Correlation coefficient with market proxy (0-1)"
                        }
                    },
                    "required": [
                        "month", "syntheticPrice", "upperBound", "lowerBound", "proxyCorrelation"
                    ]
                }
            },
            "finalValuation": { "type": "NUMBER" },
            "volatility": {
                "type": "NUMBER",
                "description": "Annualized volatility percentage"
            },
            "tangibilityRatio": {
                "type": "NUMBER",
                "description": "Tangibility ratio percentage (0-100)"
            },
            "confidenceScore": {
                "type": "NUMBER",
                "description": "Model confidence score (0-100)"
            },
            "marketCommentary": { "type": "STRING" },
            "proxyUsed": {
                "type": "STRING",
                "description": "The liquid asset proxy used for correlation"
            }
        },
        "required": [
            "pricePath", "finalValuation", "volatility", "tangibilityRatio",
            "confidenceScore", "marketCommentary", "proxyUsed"
        ]
    })
}

/// Integer-part thousands grouping, enough for prompt readability.
fn format_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let whole = value.abs().trunc() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
