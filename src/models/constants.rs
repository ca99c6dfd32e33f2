/// Probability above which a note is classified as high risk.
/// Exactly this value is still low risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.5;

/// Default base URL of the prediction service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Path of the prediction route, appended to the endpoint.
pub const PREDICT_PATH: &str = "/predict";

/// Minimum time a submission stays in Processing.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 3_500;

/// Upper bound on waiting for the prediction outcome (0 disables).
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;

/// TCP connect timeout for the prediction client.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Cadence of the decorative log feed.
pub const DEFAULT_FEED_INTERVAL_MS: u64 = 300;

/// Delay between gauge mount and its single deferred update.
pub const DEFAULT_GAUGE_DEFER_MS: u64 = 100;

/// Length of the gauge transition once the deferred update fires.
pub const DEFAULT_GAUGE_DURATION_MS: u64 = 1_000;

/// High-risk discharge note loaded by the sample action.
pub const SAMPLE_NOTE: &str = "Patient: 78 y/o Male. History: CHF (Congestive Heart Failure), \
T2DM (Type 2 Diabetes), CKD (Chronic Kidney Disease). Admission: Admitted for acute \
exacerbation of CHF. Hospital Course: Patient required 8 days of IV diuretics. Complicated \
by acute kidney injury. Multiple medications adjusted. Patient remains weak and has poor \
mobility. Discharge: Discharged to SNF (Skilled Nursing Facility).";
