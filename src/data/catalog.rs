use super::error::{MetricError, MetricResult};

// ---------------------------------------------------------------------------
// MetricProfile – generation parameters for one named metric
// ---------------------------------------------------------------------------

/// Generation and display parameters of a catalog metric.
///
/// `growth`, `seasonal_amplitude` and `noise` are fractions of the trend
/// value, so every metric keeps the same shape whatever its scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricProfile {
    /// Lookup key used by `get_metric`.
    pub key: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub unit: &'static str,
    pub y_axis_label: &'static str,
    /// Trend value on day 0.
    pub base: f64,
    /// Linear growth per day, relative to `base`.
    pub growth: f64,
    /// Length of the seasonal cycle in days.
    pub seasonal_period: f64,
    pub seasonal_amplitude: f64,
    /// Standard deviation of the noise, relative to the trend.
    pub noise: f64,
    /// Upper clamp for bounded metrics (percentages, scores).
    pub upper_bound: Option<f64>,
    /// Labels assigned to points. Empty for uncategorised metrics.
    pub categories: &'static [&'static str],
    /// Chart colour as `#rrggbb`.
    pub color: &'static str,
    /// Seed the dashboard uses for this chart before any offset.
    pub default_seed: u64,
}

impl MetricProfile {
    /// Noise-free trend value at day `i`.
    pub fn base_trend(&self, i: usize) -> f64 {
        self.base * (1.0 + self.growth * i as f64)
    }

    /// Seasonal offset at day `i`, scaled to the trend at that day.
    pub fn seasonal_component(&self, i: usize) -> f64 {
        let phase = 2.0 * std::f64::consts::PI * i as f64 / self.seasonal_period;
        self.seasonal_amplitude * self.base_trend(i) * phase.sin()
    }
}

const SEGMENTS: &[&str] = &["Enterprise", "Mid-Market", "SMB"];
const CHANNELS: &[&str] = &["Organic", "Paid", "Referral", "Partner"];
const REGIONS: &[&str] = &["North America", "EMEA", "APAC", "LATAM"];
const PRODUCT_LINES: &[&str] = &["Core", "Premium", "Accessories"];

/// The eight dashboard metrics, in chart order.
pub static CATALOG: [MetricProfile; 8] = [
    MetricProfile {
        key: "revenue",
        title: "Revenue Performance",
        subtitle: "Monthly revenue growth and trend analysis",
        unit: "$M",
        y_axis_label: "Revenue ($M)",
        base: 500.0,
        growth: 0.007,
        seasonal_period: 30.0,
        seasonal_amplitude: 0.05,
        noise: 0.03,
        upper_bound: None,
        categories: SEGMENTS,
        color: "#1e40af",
        default_seed: 1,
    },
    MetricProfile {
        key: "profit_margin",
        title: "Profit Margin Trends",
        subtitle: "Operational efficiency and cost management",
        unit: "%",
        y_axis_label: "Margin (%)",
        base: 18.0,
        growth: 0.0028,
        seasonal_period: 30.0,
        seasonal_amplitude: 0.11,
        noise: 0.055,
        upper_bound: Some(100.0),
        categories: &[],
        color: "#059669",
        default_seed: 2,
    },
    MetricProfile {
        key: "customer_acquisition",
        title: "Customer Acquisition",
        subtitle: "New customer growth and retention metrics",
        unit: "customers",
        y_axis_label: "New Customers",
        base: 6000.0,
        growth: 0.005,
        seasonal_period: 7.0,
        seasonal_amplitude: 0.2,
        noise: 0.05,
        upper_bound: None,
        categories: CHANNELS,
        color: "#dc2626",
        default_seed: 3,
    },
    MetricProfile {
        key: "customer_satisfaction",
        title: "Customer Satisfaction",
        subtitle: "NPS scores and customer experience metrics",
        unit: "score",
        y_axis_label: "Satisfaction Score",
        base: 4.4,
        growth: 0.0009,
        seasonal_period: 30.0,
        seasonal_amplitude: 0.034,
        noise: 0.018,
        upper_bound: Some(5.0),
        categories: &[],
        color: "#7c3aed",
        default_seed: 4,
    },
    MetricProfile {
        key: "sales",
        title: "Sales Performance",
        subtitle: "Regional sales distribution and growth",
        unit: "$K",
        y_axis_label: "Sales ($K)",
        base: 120.0,
        growth: 0.005,
        seasonal_period: 30.0,
        seasonal_amplitude: 0.125,
        noise: 0.067,
        upper_bound: None,
        categories: REGIONS,
        color: "#ea580c",
        default_seed: 5,
    },
    MetricProfile {
        key: "conversion_rate",
        title: "Conversion Optimization",
        subtitle: "Lead to customer conversion efficiency",
        unit: "%",
        y_axis_label: "Conversion Rate (%)",
        base: 3.2,
        growth: 0.0047,
        seasonal_period: 7.0,
        seasonal_amplitude: 0.25,
        noise: 0.094,
        upper_bound: Some(100.0),
        categories: CHANNELS,
        color: "#0891b2",
        default_seed: 6,
    },
    MetricProfile {
        key: "product_units",
        title: "Product Performance",
        subtitle: "Top-selling product line analytics",
        unit: "units",
        y_axis_label: "Units Sold",
        base: 120.0,
        growth: 0.005,
        seasonal_period: 30.0,
        seasonal_amplitude: 0.125,
        noise: 0.067,
        upper_bound: None,
        categories: PRODUCT_LINES,
        color: "#be185d",
        default_seed: 7,
    },
    MetricProfile {
        key: "market_share",
        title: "Market Expansion",
        subtitle: "Geographic market penetration rates",
        unit: "%",
        y_axis_label: "Market Share (%)",
        base: 32.0,
        growth: 0.0007,
        seasonal_period: 30.0,
        seasonal_amplitude: 0.01,
        noise: 0.012,
        upper_bound: Some(100.0),
        categories: REGIONS,
        color: "#16a34a",
        default_seed: 8,
    },
];

/// Find a catalog profile by key.
pub fn lookup(key: &str) -> MetricResult<&'static MetricProfile> {
    CATALOG
        .iter()
        .find(|p| p.key == key)
        .ok_or_else(|| MetricError::InvalidParameter(format!("unknown metric '{key}'")))
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Which figure of a filtered summary a KPI card shows as its headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiHeadline {
    /// Most recent value in the visible window.
    Latest,
    /// Percent change across the visible window.
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub metric: &'static str,
    pub headline: KpiHeadline,
    pub icon: &'static str,
}

/// The four executive summary cards.
pub static KPI_CARDS: [KpiCard; 4] = [
    KpiCard {
        title: "Total Revenue",
        metric: "revenue",
        headline: KpiHeadline::Latest,
        icon: "📈",
    },
    KpiCard {
        title: "Profit Margin",
        metric: "profit_margin",
        headline: KpiHeadline::Latest,
        icon: "💰",
    },
    KpiCard {
        title: "Customer Growth",
        metric: "customer_acquisition",
        headline: KpiHeadline::Change,
        icon: "👥",
    },
    KpiCard {
        title: "Market Share",
        metric: "market_share",
        headline: KpiHeadline::Latest,
        icon: "🎯",
    },
];
