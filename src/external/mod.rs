pub mod http_upstream;
pub mod upstream;
