use crate::DEFAULT_MAX_STACK;
use crate::wasi::WasiConfig;
use wasmtime_wasi::preview1::WasiP1Ctx;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("engine setup failed: {0}")]
    Setup(anyhow::Error),
}

pub struct Config {
    pub(crate) max_stack: usize,
    pub(crate) debug: bool,
    pub(crate) wasi: WasiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_stack: DEFAULT_MAX_STACK,
            debug: false,
            wasi: WasiConfig::default(),
        }
    }
}

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Maximum stack space available to guest code, in bytes
    pub fn max_stack(mut self, size: usize) -> Self {
        self.config.max_stack = size;
        self
    }

    /// Generate debug information for compiled code
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Host passthrough granted to the system-interface shim
    pub fn wasi(mut self, wasi: WasiConfig) -> Self {
        self.config.wasi = wasi;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl From<ConfigBuilder> for Config {
    fn from(builder: ConfigBuilder) -> Self {
        builder.build()
    }
}

/// Process-wide compilation context. Owns compiled artifacts; every module,
/// store and linker of a run hangs off one engine.
pub struct Engine {
    pub(crate) inner: wasmtime::Engine,
}

impl Engine {
    pub fn new(cfg: &Config) -> Result<Self> {
        let mut wcfg = wasmtime::Config::new();
        wcfg.max_wasm_stack(cfg.max_stack);
        wcfg.debug_info(cfg.debug);

        let inner = wasmtime::Engine::new(&wcfg).map_err(Error::Setup)?;
        Ok(Engine { inner })
    }
}

/// Per-run runtime state: instance memory, tables and the WASI context live
/// here and are released together when the store is dropped.
pub struct Store {
    pub(crate) inner: wasmtime::Store<WasiP1Ctx>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    pub fn new(engine: &Engine, wasi: &WasiConfig) -> Store {
        Store {
            inner: wasmtime::Store::new(&engine.inner, wasi.build()),
        }
    }
}
