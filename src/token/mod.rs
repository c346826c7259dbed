// Wire format: header segment and the split token
mod header;
mod parsed;

pub use header::TokenHeader;
pub use parsed::ParsedToken;
