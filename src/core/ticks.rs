//! Tick generation shared by the continuous scales.

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

const LOG_LADDER_MANTISSAS: [f64; 3] = [1.0, 2.0, 5.0];

/// Integer tick indices plus the increment that maps them back to values.
///
/// Sub-unit increments are stored as a divisor so `index / divisor` stays
/// exact for decimal steps such as `0.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TickSpec {
    first: i64,
    last: i64,
    increment: f64,
    divide: bool,
}

impl TickSpec {
    fn value(self, index: i64) -> f64 {
        if self.divide {
            index as f64 / self.increment
        } else {
            index as f64 * self.increment
        }
    }

    fn step(self) -> f64 {
        if self.divide {
            1.0 / self.increment
        } else {
            self.increment
        }
    }
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<TickSpec> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }

    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let spec = if power < 0.0 {
        let increment = 10f64.powf(-power) / factor;
        let mut first = (start * increment).round() as i64;
        let mut last = (stop * increment).round() as i64;
        if (first as f64) / increment < start {
            first += 1;
        }
        if (last as f64) / increment > stop {
            last -= 1;
        }
        TickSpec {
            first,
            last,
            increment,
            divide: true,
        }
    } else {
        let increment = 10f64.powf(power) * factor;
        let mut first = (start / increment).round() as i64;
        let mut last = (stop / increment).round() as i64;
        if (first as f64) * increment < start {
            first += 1;
        }
        if (last as f64) * increment > stop {
            last -= 1;
        }
        TickSpec {
            first,
            last,
            increment,
            divide: false,
        }
    };

    if spec.last < spec.first && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some(spec)
}

/// Returns "nice" tick values (1, 2 or 5 times a power of ten) inside
/// `[start, stop]`, ordered like the input bounds.
#[must_use]
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (low, high) = if reverse { (stop, start) } else { (start, stop) };
    let Some(spec) = tick_spec(low, high, count as f64) else {
        return Vec::new();
    };
    if spec.last < spec.first {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (spec.first..=spec.last).map(|i| spec.value(i)).collect();
    if reverse {
        ticks.reverse();
    }
    ticks
}

/// Returns the positive step `nice_ticks` would use, or `None` for
/// degenerate input.
#[must_use]
pub fn nice_tick_step(start: f64, stop: f64, count: usize) -> Option<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return None;
    }
    let (low, high) = if stop < start { (stop, start) } else { (start, stop) };
    tick_spec(low, high, count as f64).map(TickSpec::step)
}

/// Number of fractional digits needed to print values spaced by `step`.
#[must_use]
pub fn step_precision(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let exponent = step.abs().log10().floor();
    if exponent >= 0.0 {
        0
    } else {
        (-exponent) as usize
    }
}

/// Decade ladder (`1, 2, 5 x 10^n`) between two positive bounds.
///
/// Falls back to linear nice ticks when the domain spans less than one
/// ladder rung.
#[must_use]
pub fn log_ladder_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(start > 0.0 && stop > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }

    let ascending = start <= stop;
    let (low, high) = if ascending { (start, stop) } else { (stop, start) };
    let first_decade = low.log10().floor() as i32;
    let last_decade = high.log10().ceil() as i32;

    let mut ticks = Vec::new();
    for decade in first_decade..=last_decade {
        let magnitude = 10f64.powi(decade);
        for mantissa in LOG_LADDER_MANTISSAS {
            let value = mantissa * magnitude;
            if value >= low && value <= high {
                ticks.push(value);
            }
        }
    }

    if ticks.len() < 2 {
        return nice_ticks(start, stop, count);
    }
    if ticks.len() > count {
        ticks = evenly_sample_ticks(ticks, count);
    }
    if !ascending {
        ticks.reverse();
    }
    ticks
}

fn evenly_sample_ticks(ticks: Vec<f64>, target: usize) -> Vec<f64> {
    if ticks.len() <= target || target == 0 {
        return ticks;
    }
    if target == 1 {
        return vec![ticks[0]];
    }

    let last_index = ticks.len() - 1;
    let mut sampled: Vec<f64> = Vec::with_capacity(target);
    for step in 0..target {
        let ratio = (step as f64) / ((target - 1) as f64);
        let index = (ratio * (last_index as f64)).round() as usize;
        let value = ticks[index.min(last_index)];
        if sampled
            .last()
            .is_some_and(|previous| approx_equal(*previous, value))
        {
            continue;
        }
        sampled.push(value);
    }
    sampled
}

pub(crate) fn approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= scale * 1e-12
}
