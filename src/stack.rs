//! Where one of several co-plotted series sits inside a shared period slot.

use serde::{Deserialize, Serialize};

use crate::error::{ExhibitError, Result};
use crate::frequency::Frequency;

/// Position of one stack in a grouped bar layout.
///
/// `current_stack` is 1-based. The defaults describe a lone series filling
/// its whole period, which is what lines and scatters use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackLayout {
    pub number_stacks: u32,
    pub current_stack: u32,
    pub width_coef: f64,
    /// Extra shift, in days (time series) or category units (cross sections).
    pub position_adjustment: f64,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            number_stacks: 1,
            current_stack: 1,
            width_coef: 1.0,
            position_adjustment: 0.0,
        }
    }
}

impl StackLayout {
    pub fn new(number_stacks: u32, current_stack: u32) -> Self {
        Self {
            number_stacks,
            current_stack,
            ..Self::default()
        }
    }

    pub fn with_width_coef(mut self, width_coef: f64) -> Self {
        self.width_coef = width_coef;
        self
    }

    pub fn with_adjustment(mut self, position_adjustment: f64) -> Self {
        self.position_adjustment = position_adjustment;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.number_stacks == 0 {
            return Err(ExhibitError::InvalidStack(
                "number of stacks must be at least 1".into(),
            ));
        }
        if self.current_stack == 0 || self.current_stack > self.number_stacks {
            return Err(ExhibitError::InvalidStack(format!(
                "current stack {} outside 1..={}",
                self.current_stack, self.number_stacks
            )));
        }
        if !(self.width_coef.is_finite() && self.width_coef > 0.0) {
            return Err(ExhibitError::InvalidStack(format!(
                "width coefficient must be finite and positive, got {}",
                self.width_coef
            )));
        }
        if !self.position_adjustment.is_finite() {
            return Err(ExhibitError::InvalidStack(
                "position adjustment must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Width in days of one bar when `number_stacks` bars share a period of `freq`.
pub fn bar_width(freq: Frequency, number_stacks: u32, width_coef: f64) -> Result<f64> {
    if number_stacks == 0 {
        return Err(ExhibitError::InvalidStack(
            "number of stacks must be at least 1".into(),
        ));
    }
    Ok(freq.period_length_days()? * width_coef / f64::from(number_stacks))
}
