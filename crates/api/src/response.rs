//! Shared response envelope for the catalog endpoints.
//!
//! Catalog responses use a `{ "data": ... }` envelope. The transform
//! endpoint answers with the bare relay contract instead.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
