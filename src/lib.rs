pub mod api;
pub mod core;
pub mod error;
pub mod input;
pub mod nfse;
pub mod repl;
pub mod summary;
pub mod utils;

// Re-exports
pub use crate::core::config::FaturamentoConfig;
pub use crate::core::service::FaturamentoService;
pub use error::{AuthError, FaturamentoError};
pub use input::{Credentials, FaturamentoRequest, PeriodFilter};
pub use summary::FaturamentoSummary;
