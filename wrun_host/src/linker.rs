use crate::engine::{Engine, Store};
use crate::module::Module;
use wasmtime::Extern;
use wasmtime_wasi::preview1::{self as p1, WasiP1Ctx};

macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!(target: "linker", $($arg)*);
    };
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to install WASI bindings: {0}")]
    Wasi(anyhow::Error),
    #[error("failed to define host function {module}::{name}: {source}")]
    Define {
        module: String,
        name: String,
        source: anyhow::Error,
    },
    #[error("unsatisfied import: {module}::{name}")]
    Unsatisfied { module: String, name: String },
}

/// Supplies concrete bindings for a module's declared imports, either from
/// the WASI system-interface shim or from host functions registered by the
/// embedder.
#[derive(Debug)]
pub struct Linker {
    inner: wasmtime::Linker<WasiP1Ctx>,
}

impl Linker {
    /// Create a linker with the WASI preview1 shim installed under
    /// `wasi_snapshot_preview1`.
    pub fn with_wasi(engine: &Engine) -> Result<Self> {
        let mut inner = wasmtime::Linker::new(&engine.inner);
        p1::add_to_linker_sync(&mut inner, |ctx| ctx).map_err(Error::Wasi)?;
        Ok(Linker { inner })
    }

    /// Create a linker with no bindings at all. Only modules without imports
    /// (or with imports defined later) can be resolved against it.
    pub fn empty(engine: &Engine) -> Self {
        Linker {
            inner: wasmtime::Linker::new(&engine.inner),
        }
    }

    /// Register a host function under `module::name`.
    pub fn define_fn<Params, Results>(
        &mut self,
        module: &str,
        name: &str,
        func: impl wasmtime::IntoFunc<WasiP1Ctx, Params, Results>,
    ) -> Result<&mut Self> {
        self.inner
            .func_wrap(module, name, func)
            .map_err(|e| Error::Define {
                module: module.to_string(),
                name: name.to_string(),
                source: e,
            })?;
        Ok(self)
    }

    /// Produce one binding per declared import, in declaration order. The
    /// returned list always has exactly as many entries as the module
    /// declares imports; the first import no registered binding satisfies
    /// aborts resolution and is named in the error.
    pub fn resolve(&self, store: &mut Store, module: &Module) -> Result<Vec<Extern>> {
        let mut bindings = Vec::with_capacity(module.imports().len());
        for import in module.imports() {
            match self.inner.get(&mut store.inner, import.module(), import.name()) {
                Some(binding) => bindings.push(binding),
                None => {
                    return Err(Error::Unsatisfied {
                        module: import.module().to_string(),
                        name: import.name().to_string(),
                    });
                }
            }
        }

        debug!("resolved {} import(s)", bindings.len());
        Ok(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Config;
    use crate::loader::Buffer;

    fn compile(engine: &Engine, wat: &str) -> Module {
        let buffer = Buffer::from_bytes(wat::parse_str(wat).unwrap());
        Module::compile(engine, &buffer).unwrap()
    }

    #[test]
    fn no_imports_resolve_to_empty_binding_list() {
        let engine = Engine::new(&Config::default()).unwrap();
        let mut store = Store::new(&engine, &crate::WasiConfig::none());
        let module = compile(&engine, r#"(module (func (export "_start")))"#);

        let bindings = Linker::empty(&engine).resolve(&mut store, &module).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn first_unsatisfied_import_is_named() {
        let engine = Engine::new(&Config::default()).unwrap();
        let mut store = Store::new(&engine, &crate::WasiConfig::none());
        let module = compile(
            &engine,
            r#"(module
                (import "env" "missing" (func))
                (import "env" "also_missing" (func)))"#,
        );

        let err = Linker::empty(&engine)
            .resolve(&mut store, &module)
            .unwrap_err();
        match err {
            Error::Unsatisfied { module, name } => {
                assert_eq!(module, "env");
                assert_eq!(name, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wasi_shim_satisfies_preview1_imports() {
        let engine = Engine::new(&Config::default()).unwrap();
        let mut store = Store::new(&engine, &crate::WasiConfig::none());
        let module = compile(
            &engine,
            r#"(module
                (import "wasi_snapshot_preview1" "proc_exit" (func (param i32)))
                (memory (export "memory") 1))"#,
        );

        let linker = Linker::with_wasi(&engine).unwrap();
        let bindings = linker.resolve(&mut store, &module).unwrap();
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn registered_host_function_satisfies_import() {
        let engine = Engine::new(&Config::default()).unwrap();
        let mut store = Store::new(&engine, &crate::WasiConfig::none());
        let module = compile(&engine, r#"(module (import "env" "answer" (func (result i32))))"#);

        let mut linker = Linker::empty(&engine);
        linker.define_fn("env", "answer", || 42i32).unwrap();
        let bindings = linker.resolve(&mut store, &module).unwrap();
        assert_eq!(bindings.len(), 1);
    }
}
