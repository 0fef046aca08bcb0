// Adapters layer: concrete wrappers for the external providers. Base URLs are
// injected so tests can point them at a mock server.

pub mod http;
pub mod moov;
pub mod plaid;
