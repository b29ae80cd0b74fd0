//! Stage 1: trade the authorization code for a transport handle.

use crate::api::{StorageClient, StoragePlatform};
use crate::error::ConvertError;
use tracing::{debug, info};

/// Exchange `code` and bind a client to the resulting access token.
///
/// Any failure of the exchange is an [`ConvertError::Auth`] carrying the
/// platform's description (`error_description` for OAuth errors) or the
/// transport error text. A token body that does not decode is
/// [`ConvertError::MalformedUpstreamResponse`].
pub async fn authenticate(
    platform: &dyn StoragePlatform,
    code: &str,
) -> Result<Box<dyn StorageClient>, ConvertError> {
    let token = platform
        .exchange_code(code)
        .await
        .map_err(|e| {
            if e.malformed {
                ConvertError::MalformedUpstreamResponse { detail: e.message }
            } else {
                ConvertError::Auth {
                    message: e.readable_message().to_string(),
                }
            }
        })?;

    info!("Authorization code exchanged");
    debug!("Token expires in {:?}s", token.expires_in);

    Ok(platform.connect(&token))
}
