pub mod namedotcom;

pub use namedotcom::types::NameDotCom;
