mod decode;
mod fields;
mod request;
#[cfg(test)]
mod tests;
mod url_json;

pub use decode::*;
pub use fields::*;
pub use request::*;
pub use url_json::encode_url;
