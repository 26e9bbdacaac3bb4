pub mod engine;
pub mod instance;
pub mod linker;
pub mod loader;
pub mod module;
pub mod runtime;
pub mod wasi;

pub use engine::{Config, ConfigBuilder, Engine, Store};
pub use instance::{Func, Instance};
pub use linker::Linker;
pub use loader::Buffer;
pub use module::{ExportDesc, ExternKind, ImportDesc, Module};
pub use runtime::{Error, Runtime};
pub use wasi::WasiConfig;
pub use wasmtime::{Trap, Val};

/// Entry point exported by WASI command modules
pub const DEFAULT_ENTRY: &str = "_start";

/// The default guest stack size (512KiB)
pub(crate) const DEFAULT_MAX_STACK: usize = 512 * 1024;
