//! Client Module
//!
//! Request construction and HTTP transport.

pub mod endpoint;
pub mod http;
pub mod lines;

pub use endpoint::{Endpoint, PreparedRequest, RequestBuilder};
pub use http::{HttpTransport, LineStream, Transport};
pub use lines::Lines;
