use secrecy::ExposeSecret;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;

use crate::client::config::Config;
use crate::client::consts::{
    ACCESS_KEY_HEADER, APP_KEY_HEADER, CONNECT_ID_HEADER, DEFAULT_RESOURCE_ID,
    MEGATTS_RESOURCE_ID, RESOURCE_ID_HEADER,
};

/// Fixed lookup: cloned voices (the `S_` prefix) run on the megatts
/// resource, everything else on the stock service resource.
pub fn resource_id_for_voice(voice: &str) -> &'static str {
    if voice.starts_with("S_") {
        MEGATTS_RESOURCE_ID
    } else {
        DEFAULT_RESOURCE_ID
    }
}

/// Builds the handshake request carrying the identity headers. The connect
/// id is a fresh UUID per connection and is never renegotiated.
pub fn build_request(config: &Config, voice: &str) -> tokio_tungstenite::tungstenite::Result<Request> {
    let mut request = config.endpoint().into_client_request()?;
    let resource_id = config
        .resource_id()
        .unwrap_or_else(|| resource_id_for_voice(voice));
    let headers = request.headers_mut();
    headers.insert(APP_KEY_HEADER, config.app_key().parse()?);
    headers.insert(ACCESS_KEY_HEADER, config.access_key().expose_secret().parse()?);
    headers.insert(RESOURCE_ID_HEADER, resource_id.parse()?);
    headers.insert(CONNECT_ID_HEADER, uuid::Uuid::new_v4().to_string().parse()?);
    Ok(request)
}
