//! Domain data model shared across the Q-Val crates.
//!
//! Wire names are camelCase to match the provider contract and the browser
//! form payloads; enum labels match the display strings the prompt embeds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_TENURE_YEARS: u32 = 1;
pub const MAX_TENURE_YEARS: u32 = 30;

/// Asset class being priced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    #[serde(rename = "Real Estate")]
    RealEstate,
    #[serde(rename = "Infrastructure")]
    Infrastructure,
    #[serde(rename = "Private Equity")]
    PrivateEquity,
    #[serde(rename = "Illiquid Sukuk")]
    IlliquidSukuk,
}

impl AssetType {
    /// Human-readable label used in prompts and the report header.
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::RealEstate => "Real Estate",
            AssetType::Infrastructure => "Infrastructure",
            AssetType::PrivateEquity => "Private Equity",
            AssetType::IlliquidSukuk => "Illiquid Sukuk",
        }
    }
}

/// Geography the asset sits in; steers proxy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "MENA")]
    Mena,
    #[serde(rename = "SE Asia")]
    SeAsia,
    #[serde(rename = "Europe")]
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::Mena => "MENA",
            Region::SeAsia => "SE Asia",
            Region::Europe => "Europe",
            Region::NorthAmerica => "North America",
        }
    }
}

/// User-submitted description of the asset to value. Immutable once validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetParams {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub region: Region,
    pub initial_value: f64,
    pub currency: String,
    pub tenure_years: u32,
    pub description: String,
}

/// Rejection reasons for malformed asset parameters.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("asset name must not be empty")]
    EmptyName,
    #[error("asset description must not be empty")]
    EmptyDescription,
    #[error("currency code must not be empty")]
    EmptyCurrency,
    #[error("initial value must be a non-negative number")]
    NegativeInitialValue,
    #[error("tenure must be between {MIN_TENURE_YEARS} and {MAX_TENURE_YEARS} years, got {0}")]
    TenureOutOfRange(u32),
}

impl AssetParams {
    /// Field-level validation mirroring the form constraints. The UI enforces
    /// these too; this is the boundary check for callers that bypass it.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.name.trim().is_empty() {
            return Err(ParamsError::EmptyName);
        }
        if self.description.trim().is_empty() {
            return Err(ParamsError::EmptyDescription);
        }
        if self.currency.trim().is_empty() {
            return Err(ParamsError::EmptyCurrency);
        }
        if !self.initial_value.is_finite() || self.initial_value < 0.0 {
            return Err(ParamsError::NegativeInitialValue);
        }
        if !(MIN_TENURE_YEARS..=MAX_TENURE_YEARS).contains(&self.tenure_years) {
            return Err(ParamsError::TenureOutOfRange(self.tenure_years));
        }
        Ok(())
    }

    /// Number of monthly samples the synthetic path should contain.
    pub fn path_months(&self) -> u32 {
        self.tenure_years * 12
    }
}

/// One monthly sample of the synthetic price path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub month: u32,
    pub synthetic_price: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
    /// Correlation with the liquid market proxy, intended range [0, 1].
    pub proxy_correlation: f64,
}

/// Valuation payload returned by the completion provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub price_path: Vec<PricePoint>,
    pub final_valuation: f64,
    /// Annualized volatility, percent.
    pub volatility: f64,
    /// Tangibility ratio, percent. >= 51 makes a Sukuk tradable.
    pub tangibility_ratio: f64,
    /// Model confidence, percent.
    pub confidence_score: f64,
    pub market_commentary: String,
    /// Liquid asset proxy used as the correlation anchor.
    pub proxy_used: String,
}

/// Lifecycle of one valuation session. The payload-carrying variants make
/// illegal combinations (COMPLETE without a result) unrepresentable.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationState {
    Idle,
    Thinking {
        params: AssetParams,
    },
    Generating {
        params: AssetParams,
    },
    Complete {
        params: AssetParams,
        result: ValuationResult,
    },
    Error {
        message: String,
    },
}

impl SimulationState {
    pub fn status_label(&self) -> &'static str {
        match self {
            SimulationState::Idle => "IDLE",
            SimulationState::Thinking { .. } => "THINKING",
            SimulationState::Generating { .. } => "GENERATING",
            SimulationState::Complete { .. } => "COMPLETE",
            SimulationState::Error { .. } => "ERROR",
        }
    }

    /// Presentation hint only; nothing schedules off this value.
    pub fn progress(&self) -> u8 {
        match self {
            SimulationState::Idle => 0,
            SimulationState::Thinking { .. } => 10,
            SimulationState::Generating { .. } => 30,
            SimulationState::Complete { .. } => 100,
            SimulationState::Error { .. } => 0,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SimulationState::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn params(&self) -> Option<&AssetParams> {
        match self {
            SimulationState::Idle | SimulationState::Error { .. } => None,
            SimulationState::Thinking { params }
            | SimulationState::Generating { params }
            | SimulationState::Complete { params, .. } => Some(params),
        }
    }

    pub fn result(&self) -> Option<&ValuationResult> {
        match self {
            SimulationState::Complete { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SimulationState::Idle)
    }
}
