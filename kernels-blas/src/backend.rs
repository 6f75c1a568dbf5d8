//! Vendor backends and the build configuration that enables them.
//!
//! [`BuildConfig::ACTIVE`] is the single point where Cargo features turn into
//! backend availability. Everything downstream (registry lookups, the
//! `Signature` constants, the forwarding branches in `rotm`/`rot`) reads it
//! instead of checking `cfg` flags again.

/// A vendor implementation that can replace the generic body of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    /// Host CBLAS through `cblas-sys`.
    HostBlas,
    /// NVIDIA cuBLAS.
    CuBlas,
    /// AMD rocBLAS.
    RocBlas,
}

impl BackendId {
    pub const ALL: [BackendId; 3] = [BackendId::HostBlas, BackendId::CuBlas, BackendId::RocBlas];

    pub const fn name(self) -> &'static str {
        match self {
            BackendId::HostBlas => "host-blas",
            BackendId::CuBlas => "cublas",
            BackendId::RocBlas => "rocblas",
        }
    }

    /// Cargo feature that declares this backend available.
    pub const fn feature(self) -> &'static str {
        match self {
            BackendId::HostBlas => "blas",
            BackendId::CuBlas => "cublas",
            BackendId::RocBlas => "rocblas",
        }
    }
}

/// Which backends a build declares available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildConfig {
    pub host_blas: bool,
    pub cublas: bool,
    pub rocblas: bool,
}

impl BuildConfig {
    /// Configuration of the current build, from Cargo features.
    pub const ACTIVE: BuildConfig = BuildConfig {
        host_blas: cfg!(feature = "blas"),
        cublas: cfg!(feature = "cublas"),
        rocblas: cfg!(feature = "rocblas"),
    };

    /// No vendor backend; every signature resolves to the generic body.
    pub const NONE: BuildConfig = BuildConfig {
        host_blas: false,
        cublas: false,
        rocblas: false,
    };

    pub const ALL: BuildConfig = BuildConfig {
        host_blas: true,
        cublas: true,
        rocblas: true,
    };

    pub const fn enabled(self, backend: BackendId) -> bool {
        match backend {
            BackendId::HostBlas => self.host_blas,
            BackendId::CuBlas => self.cublas,
            BackendId::RocBlas => self.rocblas,
        }
    }

    /// Copy of `self` with `backend` switched on or off.
    pub const fn with(mut self, backend: BackendId, on: bool) -> BuildConfig {
        match backend {
            BackendId::HostBlas => self.host_blas = on,
            BackendId::CuBlas => self.cublas = on,
            BackendId::RocBlas => self.rocblas = on,
        }
        self
    }
}
