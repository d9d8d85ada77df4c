pub mod block_header;
pub mod byte_order;
pub mod error;
pub mod response;
pub mod trace;

pub use block_header::*;
pub use byte_order::*;
pub use error::*;
pub use response::*;
pub use trace::*;
