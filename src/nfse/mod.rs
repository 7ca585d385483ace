pub mod notas;
pub mod parsing;
pub mod session;
pub mod utils;

pub use notas::{extract_pages, run, ExtractionResult};
pub use session::{NfsePortal, PortalSession};
