use thiserror::Error;

use crate::input::InputError;

pub const AUTH_FAILURE_MESSAGE: &str =
    "Autenticação não realizada. Favor inserir os dados corretamente de acesso";

/// Authentication did not succeed. The portal cannot tell wrong credentials
/// apart from an unavailable service, so neither do we.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", AUTH_FAILURE_MESSAGE)]
pub struct AuthError;

#[derive(Debug, Error)]
pub enum FaturamentoError {
    #[error(transparent)]
    Authentication(#[from] AuthError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl FaturamentoError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, FaturamentoError::Authentication(_))
    }
}
