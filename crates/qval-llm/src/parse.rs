//! Defensive extraction and validation of provider responses.
//!
//! The request declares a response schema, but the provider honoring it is
//! not a guarantee. Everything crossing this boundary is re-checked before a
//! `ValuationResult` is handed to the rest of the system.

use qval_types::ValuationResult;
use serde_json::Value;

use crate::errors::ClientError;

/// Pulls the first text part out of a `generateContent` response body.
pub fn extract_payload_text(raw: &Value) -> Result<&str, ClientError> {
    let text = raw
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or(ClientError::EmptyResponse)?;
    if text.trim().is_empty() {
        return Err(ClientError::EmptyResponse);
    }
    Ok(text)
}

/// Parses the payload text and enforces field-level invariants.
pub fn parse_valuation(text: &str) -> Result<ValuationResult, ClientError> {
    let mut result: ValuationResult = serde_json::from_str(text)
        .map_err(|error| ClientError::schema(format!("payload does not match schema: {error}")))?;
    validate_result(&mut result)?;
    Ok(result)
}

fn validate_result(result: &mut ValuationResult) -> Result<(), ClientError> {
    if result.price_path.is_empty() {
        return Err(ClientError::schema("pricePath is empty"));
    }
    if result.proxy_used.trim().is_empty() {
        return Err(ClientError::schema("proxyUsed is empty"));
    }
    if result.market_commentary.trim().is_empty() {
        return Err(ClientError::schema("marketCommentary is empty"));
    }
    for scalar in [
        ("finalValuation", result.final_valuation),
        ("volatility", result.volatility),
        ("tangibilityRatio", result.tangibility_ratio),
        ("confidenceScore", result.confidence_score),
    ] {
        if !scalar.1.is_finite() {
            return Err(ClientError::schema(format!("{} is not finite", scalar.0)));
        }
    }

    for point in &result.price_path {
        for scalar in [
            ("syntheticPrice", point.synthetic_price),
            ("upperBound", point.upper_bound),
            ("lowerBound", point.lower_bound),
            ("proxyCorrelation", point.proxy_correlation),
        ] {
            if !scalar.1.is_finite() {
                return Err(ClientError::schema(format!(
                    "{} is not finite at month {}",
                    scalar.0, point.month
                )));
            }
        }
        if point.lower_bound > point.synthetic_price || point.synthetic_price > point.upper_bound {
            return Err(ClientError::schema(format!(
                "bounds out of order at month {}: {} <= {} <= {} does not hold",
                point.month, point.lower_bound, point.synthetic_price, point.upper_bound
            )));
        }
        if !(0.0..=1.0).contains(&point.proxy_correlation) {
            tracing::warn!(
                month = point.month,
                value = point.proxy_correlation,
                "proxyCorrelation outside [0, 1], passing through unclamped"
            );
        }
    }

    // Chart consumers need month-ascending order; tolerate a shuffled path.
    if !result.price_path.is_sorted_by_key(|p| p.month) {
        tracing::warn!("pricePath not sorted by month, re-sorting");
        result.price_path.sort_by_key(|p| p.month);
    }

    for pct in [
        ("tangibilityRatio", result.tangibility_ratio),
        ("confidenceScore", result.confidence_score),
    ] {
        if !(0.0..=100.0).contains(&pct.1) {
            tracing::warn!(field = pct.0, value = pct.1, "percentage outside [0, 100]");
        }
    }
    Ok(())
}
