use std::env::{self, VarError};

use color_eyre::eyre::eyre;
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::config::{TOKEN_ENV_VAR, TOKEN_PROMPT};
use crate::errors::DdResult;
use crate::prompt::SecretPrompt;

/// Look up the token variable, treating an unset variable as "ask the user".
pub fn token_from_env() -> DdResult<Option<String>> {
    match env::var(TOKEN_ENV_VAR) {
        Ok(token) => Ok(Some(token)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(eyre!("{TOKEN_ENV_VAR} is not valid unicode.")),
    }
}

/// Resolve the access token: the environment value when present, otherwise a
/// single hidden prompt. The token is not validated here; a bad one only shows
/// up as an unauthorized API response.
pub fn read_access_token(
    env_token: Option<String>,
    prompt: &mut dyn SecretPrompt,
) -> DdResult<SecretString> {
    match env_token {
        Some(token) => {
            if token.is_empty() {
                warn!("{TOKEN_ENV_VAR} is set but empty.");
            }
            debug!("Using the access token from {TOKEN_ENV_VAR}.");
            Ok(SecretString::from(token))
        }
        None => prompt.prompt_secret(TOKEN_PROMPT),
    }
}
