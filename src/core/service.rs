use indicatif::ProgressBar;

use super::config::FaturamentoConfig;
use super::types::Portal;
use crate::error::FaturamentoError;
use crate::input::{Credentials, FaturamentoRequest, PeriodFilter};
use crate::nfse::{self, NfsePortal};
use crate::summary::FaturamentoSummary;

/// The one entry point both the CLI and the HTTP server go through.
pub struct FaturamentoService<P: Portal> {
    portal: P,
    max_pages: u32,
}

impl FaturamentoService<NfsePortal> {
    pub fn from_config(config: &FaturamentoConfig) -> Self {
        Self::new(NfsePortal::new(config.clone()), config.max_pages)
    }
}

impl<P: Portal> FaturamentoService<P> {
    pub fn new(portal: P, max_pages: u32) -> Self {
        Self { portal, max_pages }
    }

    pub async fn faturamento(
        &self,
        credentials: Credentials,
        filter: PeriodFilter,
    ) -> Result<FaturamentoSummary, FaturamentoError> {
        self.faturamento_with_progress(credentials, filter, None).await
    }

    pub async fn faturamento_with_progress(
        &self,
        credentials: Credentials,
        filter: PeriodFilter,
        progress: Option<&ProgressBar>,
    ) -> Result<FaturamentoSummary, FaturamentoError> {
        let cnpj = credentials.identifier().to_string();
        let result = nfse::run(&self.portal, credentials, &filter, self.max_pages, progress).await?;
        Ok(FaturamentoSummary::build(&cnpj, &filter, &result))
    }

    pub async fn handle_request(
        &self,
        request: FaturamentoRequest,
    ) -> Result<FaturamentoSummary, FaturamentoError> {
        let (credentials, filter) = request.validate()?;
        self.faturamento(credentials, filter).await
    }
}
