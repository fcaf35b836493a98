//! Williams Alligator.
//!
//! Three SMMA lines over the median price `(high + low) / 2`:
//! - Jaw: SMMA(13), shifted forward 8 bars
//! - Teeth: SMMA(8), shifted forward 5 bars
//! - Lips: SMMA(5), shifted forward 3 bars
//!
//! The forward shift means the value plotted at the latest bar is the SMMA
//! computed `shift` bars earlier. A line whose shifted index falls before
//! its warm-up (or before the first bar) reads as 0.

use super::indicator::finite_back;
use super::smma::smma_of_series;
use super::{JAW_PERIOD, JAW_SHIFT, LIPS_PERIOD, LIPS_SHIFT, TEETH_PERIOD, TEETH_SHIFT};
use crate::domain::{medians, Bar};
use serde::{Deserialize, Serialize};

/// Current value of the three Alligator lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlligatorState {
    pub jaw: f64,
    pub teeth: f64,
    pub lips: f64,
}

/// Forward-shifted line series aligned with the input bars.
#[derive(Debug, Clone)]
pub struct AlligatorLines {
    pub jaw: Vec<f64>,
    pub teeth: Vec<f64>,
    pub lips: Vec<f64>,
}

/// One Alligator line: SMMA period and forward shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub period: usize,
    pub shift: usize,
}

impl Line {
    /// SMMA of `medians` read `shift` bars before the last bar.
    fn current(&self, medians: &[f64]) -> f64 {
        let smma = smma_of_series(medians, self.period);
        finite_back(&smma, self.shift).unwrap_or(0.0)
    }

    fn shifted(&self, medians: &[f64]) -> Vec<f64> {
        let smma = smma_of_series(medians, self.period);
        let n = smma.len();
        let mut result = vec![f64::NAN; n];
        for i in self.shift..n {
            result[i] = smma[i - self.shift];
        }
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alligator {
    pub jaw: Line,
    pub teeth: Line,
    pub lips: Line,
}

impl Alligator {
    pub fn new(jaw: Line, teeth: Line, lips: Line) -> Self {
        for line in [jaw, teeth, lips] {
            assert!(line.period >= 1, "Alligator period must be >= 1");
        }
        Self { jaw, teeth, lips }
    }

    /// Bars needed before every line has a non-default value.
    pub fn lookback(&self) -> usize {
        [self.jaw, self.teeth, self.lips]
            .iter()
            .map(|l| l.period - 1 + l.shift)
            .max()
            .unwrap_or(0)
    }

    /// Line values at the latest bar.
    pub fn state(&self, bars: &[Bar]) -> AlligatorState {
        let medians = medians(bars);
        AlligatorState {
            jaw: self.jaw.current(&medians),
            teeth: self.teeth.current(&medians),
            lips: self.lips.current(&medians),
        }
    }

    /// Full shifted series for charting; warm-up positions are NaN.
    pub fn lines(&self, bars: &[Bar]) -> AlligatorLines {
        let medians = medians(bars);
        AlligatorLines {
            jaw: self.jaw.shifted(&medians),
            teeth: self.teeth.shifted(&medians),
            lips: self.lips.shifted(&medians),
        }
    }
}

impl Default for Alligator {
    fn default() -> Self {
        Self::new(
            Line {
                period: JAW_PERIOD,
                shift: JAW_SHIFT,
            },
            Line {
                period: TEETH_PERIOD,
                shift: TEETH_SHIFT,
            },
            Line {
                period: LIPS_PERIOD,
                shift: LIPS_SHIFT,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_median_bars, DEFAULT_EPSILON};

    #[test]
    fn constant_median_gives_flat_lines() {
        let bars = make_median_bars(&[42.0; 40]);
        let state = Alligator::default().state(&bars);
        assert_approx(state.jaw, 42.0, DEFAULT_EPSILON);
        assert_approx(state.teeth, 42.0, DEFAULT_EPSILON);
        assert_approx(state.lips, 42.0, DEFAULT_EPSILON);
    }

    #[test]
    fn short_series_defaults_unreachable_lines_to_zero() {
        // medians 0..9, last index 9
        // lips: SMMA(5) at 9-3 = 6 → seed mean(0..4) = 2, 2.6, 3.28
        // teeth: SMMA(8) at 9-5 = 4 → still warming up → 0
        // jaw: SMMA(13) at 9-8 = 1 → warming up → 0
        let medians: Vec<f64> = (0..10).map(f64::from).collect();
        let state = Alligator::default().state(&make_median_bars(&medians));
        assert_approx(state.lips, 3.28, DEFAULT_EPSILON);
        assert_eq!(state.teeth, 0.0);
        assert_eq!(state.jaw, 0.0);
    }

    #[test]
    fn lines_read_at_their_own_shift() {
        // medians 0..20, last index 19
        // teeth: SMMA(8) at 14; seed at 7 = 3.5, then i=8..14
        // jaw: SMMA(13) at 11; not yet seeded (seed at 12) → 0
        let medians: Vec<f64> = (0..20).map(f64::from).collect();
        let state = Alligator::default().state(&make_median_bars(&medians));

        let mut teeth = 3.5;
        for i in 8..=14 {
            teeth = (teeth * 7.0 + i as f64) / 8.0;
        }
        assert_approx(state.teeth, teeth, 1e-9);
        assert_eq!(state.jaw, 0.0);

        // lips: SMMA(5) at 16
        let mut lips = 2.0;
        for i in 5..=16 {
            lips = (lips * 4.0 + i as f64) / 5.0;
        }
        assert_approx(state.lips, lips, 1e-9);
    }

    #[test]
    fn newest_bars_inside_shift_do_not_move_lines() {
        // Only the last 3 bars change: every line reads at or before last-3.
        let mut medians = vec![10.0; 40];
        let base = Alligator::default().state(&make_median_bars(&medians));
        for m in medians.iter_mut().skip(37) {
            *m = 500.0;
        }
        let moved = Alligator::default().state(&make_median_bars(&medians));
        assert_eq!(base, moved);
    }

    #[test]
    fn lines_series_ends_at_state() {
        let medians: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.5).sin()).collect();
        let bars = make_median_bars(&medians);
        let alligator = Alligator::default();
        let lines = alligator.lines(&bars);
        let state = alligator.state(&bars);
        assert_approx(*lines.jaw.last().unwrap(), state.jaw, DEFAULT_EPSILON);
        assert_approx(*lines.teeth.last().unwrap(), state.teeth, DEFAULT_EPSILON);
        assert_approx(*lines.lips.last().unwrap(), state.lips, DEFAULT_EPSILON);
        assert!(lines.jaw[19].is_nan());
        assert!(lines.jaw[20].is_finite());
    }

    #[test]
    fn lookback_is_jaw_warmup_plus_shift() {
        assert_eq!(Alligator::default().lookback(), 20);
    }
}
