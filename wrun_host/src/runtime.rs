use crate::engine::{self, Config, Engine, Store};
use crate::instance::{self, Instance};
use crate::linker::{self, Linker};
use crate::loader::{self, Buffer};
use crate::module::{self, Module};
use std::path::Path;

macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!(target: "runtime", $($arg)*);
    };
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("load error: {0}")]
    Load(#[from] loader::Error),
    #[error("engine error: {0}")]
    Engine(#[from] engine::Error),
    #[error("module error: {0}")]
    Module(#[from] module::Error),
    #[error("link error: {0}")]
    Link(#[from] linker::Error),
    #[error("instance error: {0}")]
    Instance(#[from] instance::Error),
}

/// One linear compile-and-run pass over a single bytecode source:
/// load, compile, resolve imports, instantiate, invoke one export.
/// No retry, no caching, no concurrency. Dropping the runtime (on any exit
/// path) releases instance state, bindings and compiled artifacts.
#[derive(Debug)]
pub struct Runtime {
    store: Store,
    linker: Linker,
    module: Module,
}

impl Runtime {
    /// Load and compile the bytecode at `path`, setting up the engine and
    /// the WASI shim as configured. The byte buffer is released once
    /// compilation has consumed it.
    pub fn new<C, P>(cfg: C, path: P) -> Result<Self>
    where
        C: Into<Config>,
        P: AsRef<Path>,
    {
        let cfg = cfg.into();
        let buffer = Buffer::from_file(path)?;

        let engine = Engine::new(&cfg)?;
        let store = Store::new(&engine, &cfg.wasi);
        let linker = Linker::with_wasi(&engine)?;
        let module = Module::compile(&engine, &buffer)?;

        Ok(Self {
            store,
            linker,
            module,
        })
    }

    /// Register additional host functions before `run`.
    pub fn linker(&mut self) -> &mut Linker {
        &mut self.linker
    }

    /// Descriptors of the compiled module.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Resolve imports, instantiate the module and invoke the export named
    /// `entry`. Every failure propagates immediately; none is recoverable
    /// at this layer.
    pub fn run(&mut self, entry: &str) -> Result<()> {
        let bindings = self.linker.resolve(&mut self.store, &self.module)?;
        let instance = Instance::new(&mut self.store, &self.module, &bindings)?;
        let func = instance.find_func(&mut self.store, entry)?;

        debug!("invoking `{entry}`");
        func.call_entry(&mut self.store)?;
        debug!("`{entry}` returned normally");
        Ok(())
    }
}
