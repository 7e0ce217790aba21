mod nvd;
mod osv;
pub mod version;

pub use nvd::NvdIndex;
pub use osv::OsvResolver;
