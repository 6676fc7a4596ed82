//! Wallet method table.
//!
//! Unary methods answer on `POST /` with one JSON-RPC response. Streaming
//! methods answer on `POST /stream` with newline-delimited responses.

/// How a method delivers its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Single response
    Unary,
    /// Newline-delimited sequence of responses
    Streaming,
}

/// Every method the gateway serves.
pub const METHODS: &[(&str, MethodKind)] = &[
    ("GetLatestBlock", MethodKind::Unary),
    ("GetBlock", MethodKind::Unary),
    ("GetTransaction", MethodKind::Unary),
    ("SendTransaction", MethodKind::Unary),
    ("GetLightdInfo", MethodKind::Unary),
    ("GetBlockRange", MethodKind::Streaming),
    ("GetAddressTxids", MethodKind::Streaming),
    ("GetUtxos", MethodKind::Streaming),
];

/// Look up a method's kind.
pub fn method_kind(name: &str) -> Option<MethodKind> {
    METHODS
        .iter()
        .find(|(method, _)| *method == name)
        .map(|(_, kind)| *kind)
}
