pub const VOLC_APP_KEY: &str = "VOLC_APP_KEY";
pub const VOLC_ACCESS_KEY: &str = "VOLC_ACCESS_KEY";

pub const DEFAULT_ENDPOINT: &str =
    "wss://openspeech.bytedance.com/api/v3/tts/unidirectional/stream";

pub const APP_KEY_HEADER: &str = "X-Api-App-Key";
pub const ACCESS_KEY_HEADER: &str = "X-Api-Access-Key";
pub const RESOURCE_ID_HEADER: &str = "X-Api-Resource-Id";
pub const CONNECT_ID_HEADER: &str = "X-Api-Connect-Id";
pub const LOGID_HEADER: &str = "x-tt-logid";

/// Resource id for cloned (`S_`-prefixed) voices.
pub const MEGATTS_RESOURCE_ID: &str = "volc.megatts.default";
/// Resource id for every stock voice.
pub const DEFAULT_RESOURCE_ID: &str = "volc.service_type.10029";

pub const DEFAULT_ENCODING: &str = "wav";
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;
