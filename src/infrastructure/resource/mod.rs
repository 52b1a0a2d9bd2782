//! Resource resolution module

mod fs_resolver;

pub use fs_resolver::FsResourceResolver;
