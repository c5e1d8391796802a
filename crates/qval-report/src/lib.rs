//! Pure presentation of a finished valuation.
//!
//! A total function from (result, params) to summary cards and a chart
//! series; no network, no mutable state. Results reaching this layer have
//! already passed boundary validation, but nothing here assumes it.

use qval_types::{AssetParams, PricePoint, ValuationResult};
use serde::Serialize;

/// A Sukuk portfolio needs at least this tangibility ratio (percent) to
/// remain tradable in secondary markets.
pub const TRADABILITY_THRESHOLD_PCT: f64 = 51.0;

/// One month on the chart, camelCase for the browser plotting code.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub month: u32,
    pub synthetic_price: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
    pub proxy_correlation: f64,
}

impl From<&PricePoint> for ChartPoint {
    fn from(point: &PricePoint) -> Self {
        Self {
            month: point.month,
            synthetic_price: point.synthetic_price,
            upper_bound: point.upper_bound,
            lower_bound: point.lower_bound,
            proxy_correlation: point.proxy_correlation,
        }
    }
}

/// Summary metrics and chart data for the report view.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReport {
    pub asset_name: String,
    pub asset_type: String,
    pub region: String,
    pub currency: String,
    pub final_valuation: f64,
    pub final_valuation_display: String,
    /// Percent growth over the initial value; absent when the initial value
    /// is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_pct: Option<f64>,
    pub volatility_pct: f64,
    pub tangibility_ratio_pct: f64,
    pub tradable: bool,
    pub confidence_score_pct: f64,
    pub proxy_used: String,
    pub market_commentary: String,
    pub chart: Vec<ChartPoint>,
}

impl ValuationReport {
    pub fn build(result: &ValuationResult, params: &AssetParams) -> Self {
        Self {
            asset_name: params.name.clone(),
            asset_type: params.asset_type.label().to_string(),
            region: params.region.label().to_string(),
            currency: params.currency.clone(),
            final_valuation: result.final_valuation,
            final_valuation_display: format!(
                "{} {}",
                params.currency,
                format_thousands(result.final_valuation)
            ),
            growth_pct: growth_pct(params.initial_value, result.final_valuation),
            volatility_pct: result.volatility,
            tangibility_ratio_pct: result.tangibility_ratio,
            tradable: is_tradable(result.tangibility_ratio),
            confidence_score_pct: result.confidence_score,
            proxy_used: result.proxy_used.clone(),
            market_commentary: result.market_commentary.clone(),
            chart: result.price_path.iter().map(ChartPoint::from).collect(),
        }
    }
}

/// Growth over the initial value, percent. None when initial value is zero
/// or not finite.
pub fn growth_pct(initial_value: f64, final_valuation: f64) -> Option<f64> {
    if initial_value == 0.0 || !initial_value.is_finite() || !final_valuation.is_finite() {
        return None;
    }
    Some((final_valuation - initial_value) / initial_value * 100.0)
}

/// Tradability rule: tangibility ratio at or above 51 percent.
pub fn is_tradable(tangibility_ratio_pct: f64) -> bool {
    tangibility_ratio_pct >= TRADABILITY_THRESHOLD_PCT
}

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
