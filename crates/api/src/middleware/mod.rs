//! HTTP middleware components.

pub mod logging;
pub mod metrics;
pub mod role_guard;
pub mod trace_id;

pub use self::metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use role_guard::{check_role, require_admin, require_student};
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
