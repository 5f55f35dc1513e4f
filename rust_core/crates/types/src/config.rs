use crate::error::CoreError;
use crate::window::WindowTag;

/// Top-level analysis configuration.
///
/// Every section is optional in JSON; missing sections fall back to the
/// classical parameter set (MA 5/10/20/30/60, MACD 12/26/9, KDJ 9,
/// RSI 14, BOLL 20/2.0).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisConfig {
    /// Trailing window lengths
    #[serde(default)]
    pub windows: WindowConfig,
    /// Moving-average system parameters
    #[serde(default)]
    pub ma: MaConfig,
    /// MACD parameters
    #[serde(default)]
    pub macd: MacdConfig,
    /// KDJ parameters
    #[serde(default)]
    pub kdj: KdjConfig,
    /// RSI parameters
    #[serde(default)]
    pub rsi: RsiConfig,
    /// Bollinger Bands parameters
    #[serde(default)]
    pub boll: BollConfig,
    /// Candlestick pattern parameters
    #[serde(default)]
    pub candlestick: CandlestickConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Run calculators on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            windows: WindowConfig::default(),
            ma: MaConfig::default(),
            macd: MacdConfig::default(),
            kdj: KdjConfig::default(),
            rsi: RsiConfig::default(),
            boll: BollConfig::default(),
            candlestick: CandlestickConfig::default(),
            logging: LoggingConfig::default(),
            parallel: default_parallel(),
        }
    }
}

impl AnalysisConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    /// Returns [`CoreError::Json`] on malformed JSON and
    /// [`CoreError::Config`] when validation fails.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks parameter ranges and cross-field constraints.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.windows.validate()?;

        if self.ma.periods.is_empty() {
            return Err(CoreError::config("ma.periods is empty"));
        }
        if self.ma.periods.contains(&0) {
            return Err(CoreError::config("ma.periods must be > 0"));
        }
        if self.ma.periods.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CoreError::config("ma.periods must be strictly ascending"));
        }
        if self.ma.overextension_pct <= 0.0 {
            return Err(CoreError::config("ma.overextension_pct must be > 0"));
        }

        if self.macd.fast == 0 || self.macd.slow == 0 || self.macd.signal == 0 {
            return Err(CoreError::config("macd periods must be > 0"));
        }
        if self.macd.fast >= self.macd.slow {
            return Err(CoreError::config(format!(
                "macd.fast ({}) must be < macd.slow ({})",
                self.macd.fast, self.macd.slow
            )));
        }

        if self.kdj.period == 0 {
            return Err(CoreError::config("kdj.period must be > 0"));
        }
        validate_zone("kdj", self.kdj.oversold, self.kdj.overbought)?;

        if self.rsi.period < 2 || self.rsi.extra_periods.iter().any(|p| *p < 2) {
            return Err(CoreError::config("rsi periods must be >= 2"));
        }
        validate_zone("rsi", self.rsi.oversold, self.rsi.overbought)?;

        if self.boll.period < 2 {
            return Err(CoreError::config("boll.period must be >= 2"));
        }
        if self.boll.std_factor <= 0.0 {
            return Err(CoreError::config("boll.std_factor must be > 0"));
        }
        if !(0.0..1.0).contains(&self.boll.width_tolerance) {
            return Err(CoreError::config("boll.width_tolerance must be in [0, 1)"));
        }

        if !(1..=5).contains(&self.candlestick.lookback) {
            return Err(CoreError::config("candlestick.lookback must be in 1..=5"));
        }

        Ok(())
    }
}

fn validate_zone(section: &str, oversold: f64, overbought: f64) -> Result<(), CoreError> {
    if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
        return Err(CoreError::config(format!(
            "{section} thresholds must be within [0, 100]"
        )));
    }
    if oversold >= overbought {
        return Err(CoreError::config(format!(
            "{section}.oversold ({oversold}) must be < {section}.overbought ({overbought})"
        )));
    }
    Ok(())
}

/// Trailing window lengths in bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WindowConfig {
    /// Short window
    #[serde(default = "default_short")]
    pub short: usize,
    /// Medium window
    #[serde(default = "default_medium")]
    pub medium: usize,
    /// Long window
    #[serde(default = "default_long")]
    pub long: usize,
}

fn default_short() -> usize {
    WindowTag::Short.default_len()
}

fn default_medium() -> usize {
    WindowTag::Medium.default_len()
}

fn default_long() -> usize {
    WindowTag::Long.default_len()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            short: default_short(),
            medium: default_medium(),
            long: default_long(),
        }
    }
}

impl WindowConfig {
    /// Configured length for a tag.
    #[must_use]
    pub fn len_of(&self, tag: WindowTag) -> usize {
        match tag {
            WindowTag::Short => self.short,
            WindowTag::Medium => self.medium,
            WindowTag::Long => self.long,
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.short < 2 {
            return Err(CoreError::config("windows.short must be >= 2"));
        }
        if self.short > self.medium || self.medium > self.long {
            return Err(CoreError::config(
                "windows must satisfy short <= medium <= long",
            ));
        }
        Ok(())
    }
}

/// Moving-average system parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaConfig {
    /// SMA periods, ascending
    #[serde(default = "default_ma_periods")]
    pub periods: Vec<usize>,
    /// Close-to-MA deviation (percent) considered overextended
    #[serde(default = "default_overextension_pct")]
    pub overextension_pct: f64,
}

fn default_ma_periods() -> Vec<usize> {
    vec![5, 10, 20, 30, 60]
}

fn default_overextension_pct() -> f64 {
    5.0
}

impl Default for MaConfig {
    fn default() -> Self {
        Self {
            periods: default_ma_periods(),
            overextension_pct: default_overextension_pct(),
        }
    }
}

/// MACD parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MacdConfig {
    /// Fast EMA period
    #[serde(default = "default_macd_fast")]
    pub fast: usize,
    /// Slow EMA period
    #[serde(default = "default_macd_slow")]
    pub slow: usize,
    /// Signal EMA period
    #[serde(default = "default_macd_signal")]
    pub signal: usize,
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: default_macd_fast(),
            slow: default_macd_slow(),
            signal: default_macd_signal(),
        }
    }
}

/// KDJ parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KdjConfig {
    /// RSV lookback
    #[serde(default = "default_kdj_period")]
    pub period: usize,
    /// K and D above this are overbought
    #[serde(default = "default_kdj_overbought")]
    pub overbought: f64,
    /// K and D below this are oversold
    #[serde(default = "default_kdj_oversold")]
    pub oversold: f64,
}

fn default_kdj_period() -> usize {
    9
}

fn default_kdj_overbought() -> f64 {
    80.0
}

fn default_kdj_oversold() -> f64 {
    20.0
}

impl Default for KdjConfig {
    fn default() -> Self {
        Self {
            period: default_kdj_period(),
            overbought: default_kdj_overbought(),
            oversold: default_kdj_oversold(),
        }
    }
}

/// RSI parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RsiConfig {
    /// Primary Wilder period
    #[serde(default = "default_rsi_period")]
    pub period: usize,
    /// Additional periods reported next to the primary one
    #[serde(default = "default_rsi_extra_periods")]
    pub extra_periods: Vec<usize>,
    /// Overbought threshold
    #[serde(default = "default_rsi_overbought")]
    pub overbought: f64,
    /// Oversold threshold
    #[serde(default = "default_rsi_oversold")]
    pub oversold: f64,
}

fn default_rsi_period() -> usize {
    14
}

fn default_rsi_extra_periods() -> Vec<usize> {
    vec![6, 12, 24]
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_rsi_oversold() -> f64 {
    30.0
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: default_rsi_period(),
            extra_periods: default_rsi_extra_periods(),
            overbought: default_rsi_overbought(),
            oversold: default_rsi_oversold(),
        }
    }
}

/// Bollinger Bands parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BollConfig {
    /// SMA / standard deviation period
    #[serde(default = "default_boll_period")]
    pub period: usize,
    /// Standard deviation multiplier
    #[serde(default = "default_boll_std_factor")]
    pub std_factor: f64,
    /// Relative band-width change needed for squeeze / expansion
    #[serde(default = "default_boll_width_tolerance")]
    pub width_tolerance: f64,
}

fn default_boll_period() -> usize {
    20
}

fn default_boll_std_factor() -> f64 {
    2.0
}

fn default_boll_width_tolerance() -> f64 {
    0.05
}

impl Default for BollConfig {
    fn default() -> Self {
        Self {
            period: default_boll_period(),
            std_factor: default_boll_std_factor(),
            width_tolerance: default_boll_width_tolerance(),
        }
    }
}

/// Candlestick pattern parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandlestickConfig {
    /// Most recent bars inspected (longest pattern span)
    #[serde(default = "default_candle_lookback")]
    pub lookback: usize,
}

fn default_candle_lookback() -> usize {
    5
}

impl Default for CandlestickConfig {
    fn default() -> Self {
        Self {
            lookback: default_candle_lookback(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_logging_level")]
    pub level: String,
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_logging_level(),
        }
    }
}
