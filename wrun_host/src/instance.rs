use crate::engine::Store;
use crate::module::Module;
use wasmtime::{Extern, Trap, Val};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("instantiation failed: {0}")]
    Instantiation(anyhow::Error),
    #[error("export not found: {0}")]
    ExportNotFound(String),
    #[error("export is not a function: {0}")]
    NotAFunction(String),
    #[error("call failed: {0}")]
    Call(anyhow::Error),
    #[error("trap: {0}")]
    Trap(Trap),
}

/// Split an engine error into the trap family (runtime fault raised by guest
/// code) or the given host-level family.
fn classify(err: anyhow::Error, host: fn(anyhow::Error) -> Error) -> Error {
    match err.downcast::<Trap>() {
        Ok(trap) => Error::Trap(trap),
        Err(err) => host(err),
    }
}

/// A live, runnable realization of a module with concrete bindings. Owns its
/// linear memory and table state through the store it was created in.
#[derive(Debug)]
pub struct Instance {
    inner: wasmtime::Instance,
}

impl Instance {
    /// Instantiate a compiled module with a fully resolved binding list. The
    /// bindings must match the module's declared imports in number, order
    /// and signature; any mismatch is an `Instantiation` error. The module's
    /// start routine runs here, so a runtime fault during start surfaces as
    /// `Trap` and no instance is produced.
    pub fn new(store: &mut Store, module: &Module, bindings: &[Extern]) -> Result<Instance> {
        let inner = wasmtime::Instance::new(&mut store.inner, &module.inner, bindings)
            .map_err(|e| classify(e, Error::Instantiation))?;
        log::debug!(target: "instance", "instantiated with {} binding(s)", bindings.len());
        Ok(Instance { inner })
    }

    /// Look up an exported function by exact name.
    pub fn find_func(&self, store: &mut Store, name: &str) -> Result<Func> {
        let export = self
            .inner
            .get_export(&mut store.inner, name)
            .ok_or_else(|| Error::ExportNotFound(name.to_string()))?;
        let inner = export
            .into_func()
            .ok_or_else(|| Error::NotAFunction(name.to_string()))?;
        Ok(Func {
            name: name.to_string(),
            inner,
        })
    }
}

/// A callable export. Invalid once the owning store is gone, which the
/// borrow on `call` enforces.
#[derive(Debug)]
pub struct Func {
    name: String,
    inner: wasmtime::Func,
}

impl Func {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with the given arguments, writing results into `results`.
    /// Argument count and types must match the export's signature; a
    /// mismatch is a host-level `Call` error, while a runtime fault during
    /// execution is a `Trap`.
    pub fn call(&self, store: &mut Store, args: &[Val], results: &mut [Val]) -> Result<()> {
        self.inner
            .call(&mut store.inner, args, results)
            .map_err(|e| classify(e, Error::Call))
    }

    /// Invoke a `() -> ()` entry point such as `_start`.
    pub fn call_entry(&self, store: &mut Store) -> Result<()> {
        self.call(store, &[], &mut [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Config, Engine};
    use crate::loader::Buffer;
    use crate::wasi::WasiConfig;

    fn setup(wat: &str) -> (Store, Module) {
        let engine = Engine::new(&Config::default()).unwrap();
        let store = Store::new(&engine, &WasiConfig::none());
        let buffer = Buffer::from_bytes(wat::parse_str(wat).unwrap());
        let module = Module::compile(&engine, &buffer).unwrap();
        (store, module)
    }

    #[test]
    fn trapping_start_yields_trap_and_no_instance() {
        let (mut store, module) = setup(r#"(module (func $boom unreachable) (start $boom))"#);
        let err = Instance::new(&mut store, &module, &[]).unwrap_err();
        assert!(matches!(err, Error::Trap(Trap::UnreachableCodeReached)));
    }

    #[test]
    fn missing_export_is_not_found() {
        let (mut store, module) = setup(r#"(module (func (export "run")))"#);
        let instance = Instance::new(&mut store, &module, &[]).unwrap();
        let err = instance.find_func(&mut store, "_start").unwrap_err();
        assert!(matches!(err, Error::ExportNotFound(name) if name == "_start"));
    }

    #[test]
    fn non_function_export_is_rejected() {
        let (mut store, module) = setup(r#"(module (memory (export "memory") 1))"#);
        let instance = Instance::new(&mut store, &module, &[]).unwrap();
        let err = instance.find_func(&mut store, "memory").unwrap_err();
        assert!(matches!(err, Error::NotAFunction(_)));
    }

    #[test]
    fn argument_mismatch_is_a_host_error() {
        let (mut store, module) = setup(r#"(module (func (export "add1") (param i32) (result i32) local.get 0 i32.const 1 i32.add))"#);
        let instance = Instance::new(&mut store, &module, &[]).unwrap();
        let func = instance.find_func(&mut store, "add1").unwrap();

        let err = func.call(&mut store, &[], &mut []).unwrap_err();
        assert!(matches!(err, Error::Call(_)));

        let mut results = [Val::I32(0)];
        func.call(&mut store, &[Val::I32(41)], &mut results).unwrap();
        assert_eq!(results[0].unwrap_i32(), 42);
    }

    #[test]
    fn trap_during_call_is_classified() {
        let (mut store, module) = setup(
            r#"(module (func (export "div") (result i32) i32.const 1 i32.const 0 i32.div_s))"#,
        );
        let instance = Instance::new(&mut store, &module, &[]).unwrap();
        let func = instance.find_func(&mut store, "div").unwrap();

        let mut results = [Val::I32(0)];
        let err = func.call(&mut store, &[], &mut results).unwrap_err();
        assert!(matches!(err, Error::Trap(Trap::IntegerDivisionByZero)));
    }

    #[test]
    fn binding_arity_mismatch_fails_instantiation() {
        let (mut store, module) = setup(r#"(module (import "env" "f" (func)))"#);
        let err = Instance::new(&mut store, &module, &[]).unwrap_err();
        assert!(matches!(err, Error::Instantiation(_)));
    }
}
