pub mod codec;
pub mod fixture;
pub mod reader;
pub mod source;

pub use codec::Resp3Codec;
pub use reader::{PushSink, Reader, Step, read_from_bytes};
pub use source::{ByteSource, BytesSource, ReadSource};
