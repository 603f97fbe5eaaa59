mod composer;
mod transport;

pub use composer::HttpRequestComposer;
pub use transport::HttpTransport;
