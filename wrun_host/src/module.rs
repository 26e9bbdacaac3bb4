use crate::engine::Engine;
use crate::loader::Buffer;
use wasmtime::ExternType;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("compile error: {0}")]
    Compile(anyhow::Error),
}

/// Kind of extern a module requires from or provides to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternKind {
    Func,
    Table,
    Memory,
    Global,
    /// Extern kinds this embedding does not bind specially
    Other,
}

impl From<&ExternType> for ExternKind {
    fn from(ty: &ExternType) -> Self {
        match ty {
            ExternType::Func(_) => ExternKind::Func,
            ExternType::Table(_) => ExternKind::Table,
            ExternType::Memory(_) => ExternKind::Memory,
            ExternType::Global(_) => ExternKind::Global,
            _ => ExternKind::Other,
        }
    }
}

/// A declared import: two-level name plus the kind of extern required
#[derive(Debug, Clone)]
pub struct ImportDesc {
    module: String,
    name: String,
    kind: ExternKind,
}

impl ImportDesc {
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ExternKind {
        self.kind
    }
}

/// A declared export: name plus the kind of extern provided
#[derive(Debug, Clone)]
pub struct ExportDesc {
    name: String,
    kind: ExternKind,
}

impl ExportDesc {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ExternKind {
        self.kind
    }
}

/// A validated, not-yet-instantiated unit of bytecode together with its
/// declared import and export descriptors.
#[derive(Debug)]
pub struct Module {
    pub(crate) inner: wasmtime::Module,
    imports: Vec<ImportDesc>,
    exports: Vec<ExportDesc>,
}

impl Module {
    /// Validate and translate raw bytecode into a loadable module. A failed
    /// compile yields no usable module; the error carries the engine's
    /// diagnostic.
    pub fn compile(engine: &Engine, buffer: &Buffer) -> Result<Module> {
        let inner = wasmtime::Module::from_binary(&engine.inner, buffer.as_slice())
            .map_err(Error::Compile)?;

        let imports = inner
            .imports()
            .map(|i| ImportDesc {
                module: i.module().to_string(),
                name: i.name().to_string(),
                kind: ExternKind::from(&i.ty()),
            })
            .collect::<Vec<_>>();
        let exports = inner
            .exports()
            .map(|e| ExportDesc {
                name: e.name().to_string(),
                kind: ExternKind::from(&e.ty()),
            })
            .collect::<Vec<_>>();

        log::debug!(
            target: "module",
            "compiled module: {} import(s), {} export(s)",
            imports.len(),
            exports.len()
        );
        Ok(Module {
            inner,
            imports,
            exports,
        })
    }

    /// Declared imports, in declaration order
    pub fn imports(&self) -> &[ImportDesc] {
        &self.imports
    }

    /// Declared exports, in declaration order
    pub fn exports(&self) -> &[ExportDesc] {
        &self.exports
    }
}
