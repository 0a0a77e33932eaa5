//! Connection cursors: `base64("arrayconnection:<offset>")`.

use gqlcypher_core::{Error, Result};

use base64::{engine::general_purpose::STANDARD, Engine as _};

const PREFIX: &str = "arrayconnection:";

pub(crate) fn encode(offset: i64) -> String {
    STANDARD.encode(format!("{PREFIX}{offset}"))
}

pub(crate) fn decode(cursor: &str) -> Result<i64> {
    STANDARD
        .decode(cursor)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|text| text.strip_prefix(PREFIX)?.parse().ok())
        .filter(|offset: &i64| *offset >= 0)
        .ok_or_else(|| Error::invalid_request(format!("`{cursor}` is not a valid cursor")))
}
