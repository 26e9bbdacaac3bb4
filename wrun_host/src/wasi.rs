use wasmtime_wasi::WasiCtx;
use wasmtime_wasi::preview1::WasiP1Ctx;

/// Host passthrough configuration for the WASI system interface.
///
/// Each flag grants the guest verbatim access to the corresponding part of
/// the embedding process: its command-line arguments, its environment
/// variables, or its standard streams. The driver default is to inherit
/// everything; embedders can revoke individual capabilities.
#[derive(Debug, Clone)]
pub struct WasiConfig {
    inherit_args: bool,
    inherit_env: bool,
    inherit_stdio: bool,
}

impl Default for WasiConfig {
    fn default() -> Self {
        WasiConfig {
            inherit_args: true,
            inherit_env: true,
            inherit_stdio: true,
        }
    }
}

impl WasiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing is inherited; the guest sees empty argv/env and closed stdio.
    pub fn none() -> Self {
        WasiConfig {
            inherit_args: false,
            inherit_env: false,
            inherit_stdio: false,
        }
    }

    pub fn inherit_args(mut self, inherit: bool) -> Self {
        self.inherit_args = inherit;
        self
    }

    pub fn inherit_env(mut self, inherit: bool) -> Self {
        self.inherit_env = inherit;
        self
    }

    pub fn inherit_stdio(mut self, inherit: bool) -> Self {
        self.inherit_stdio = inherit;
        self
    }

    pub(crate) fn build(&self) -> WasiP1Ctx {
        let mut builder = WasiCtx::builder();
        if self.inherit_args {
            builder.inherit_args();
        }
        if self.inherit_env {
            builder.inherit_env();
        }
        if self.inherit_stdio {
            builder.inherit_stdio();
        }
        builder.build_p1()
    }
}
