use serde::{Deserialize, Serialize};

/// Learning-rate policy consulted once per epoch by the training loop.
pub trait RateControl {
    /// Rate to use for the next gradient step.
    fn rate(&self) -> f64;

    /// Feeds the cost measured after `epoch`'s step.
    fn observe(&mut self, epoch: usize, cost: f64);

    /// Current volatility counter, for policies that keep one.
    fn volatility(&self) -> Option<f64> {
        None
    }
}

/// Fixed rate for every epoch.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRate(pub f64);

impl RateControl for ConstantRate {
    fn rate(&self) -> f64 {
        self.0
    }

    fn observe(&mut self, _epoch: usize, _cost: f64) {}
}

/// Shrinks the rate while the cost oscillates.
///
/// The initial rate holds for the first `warmup` epochs, after which the rate
/// drops to `settle_rate`. From then on every cost increase adds 2 to the
/// volatility counter and every epoch decays it by 1; while the counter
/// exceeds `threshold` each epoch divides the rate by `decay`.
#[derive(Debug, Clone)]
pub struct VolatilityRate {
    pub warmup: usize,
    pub settle_rate: f64,
    pub decay: f64,
    pub threshold: f64,
    rate: f64,
    volatility: f64,
    last_cost: Option<f64>,
    settled: bool,
}

impl VolatilityRate {
    pub fn new(initial_rate: f64, settle_rate: f64, warmup: usize, decay: f64, threshold: f64) -> VolatilityRate {
        VolatilityRate {
            warmup,
            settle_rate,
            decay,
            threshold,
            rate: initial_rate,
            volatility: 0.0,
            last_cost: None,
            settled: false,
        }
    }
}

impl Default for VolatilityRate {
    fn default() -> Self {
        VolatilityRate::new(0.1, 0.05, 300, 1.001, 2.0)
    }
}

impl RateControl for VolatilityRate {
    fn rate(&self) -> f64 {
        self.rate
    }

    fn observe(&mut self, epoch: usize, cost: f64) {
        let previous = self.last_cost.replace(cost);
        if epoch <= self.warmup {
            return;
        }
        if !self.settled {
            self.settled = true;
            self.rate = self.settle_rate;
            log::debug!("epoch {epoch}: warm-up over, rate set to {}", self.rate);
        }

        if self.volatility > 0.0 {
            self.volatility -= 1.0;
        }
        if previous.is_some_and(|prev| cost > prev) {
            self.volatility += 2.0;
        }
        if self.volatility > self.threshold {
            self.rate /= self.decay;
            log::trace!("epoch {epoch}: volatility {} > {}, rate now {}", self.volatility, self.threshold, self.rate);
        }
    }

    fn volatility(&self) -> Option<f64> {
        Some(self.volatility)
    }
}

/// Serializable choice of rate policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateSchedule {
    Constant {
        rate: f64,
    },
    Volatility {
        #[serde(default = "defaults::initial_rate")]
        initial_rate: f64,
        #[serde(default = "defaults::settle_rate")]
        settle_rate: f64,
        #[serde(default = "defaults::warmup")]
        warmup: usize,
        #[serde(default = "defaults::decay")]
        decay: f64,
        #[serde(default = "defaults::threshold")]
        threshold: f64,
    },
}

mod defaults {
    pub fn initial_rate() -> f64 { 0.1 }
    pub fn settle_rate() -> f64 { 0.05 }
    pub fn warmup() -> usize { 300 }
    pub fn decay() -> f64 { 1.001 }
    pub fn threshold() -> f64 { 2.0 }
}

impl Default for RateSchedule {
    fn default() -> Self {
        RateSchedule::Volatility {
            initial_rate: defaults::initial_rate(),
            settle_rate: defaults::settle_rate(),
            warmup: defaults::warmup(),
            decay: defaults::decay(),
            threshold: defaults::threshold(),
        }
    }
}

impl RateSchedule {
    pub fn build(&self) -> Box<dyn RateControl> {
        match *self {
            RateSchedule::Constant { rate } => Box::new(ConstantRate(rate)),
            RateSchedule::Volatility { initial_rate, settle_rate, warmup, decay, threshold } => {
                Box::new(VolatilityRate::new(initial_rate, settle_rate, warmup, decay, threshold))
            }
        }
    }
}
