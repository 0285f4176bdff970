/*!
 * Monitoring
 * Run metrics and tracing setup
 */

mod metrics;
mod tracer;

pub use metrics::{Averages, MetricsCollector, ProcessMetrics, RunMetrics};
pub use tracer::{init_tracing, TRACE_JSON_ENV};
