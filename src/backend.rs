//! Factorization over flat row-major buffers, in process or through a
//! native shared library.
//!
//! The buffer contract is the same for every [`Kernel`]: `a` holds the n×n
//! matrix row after row and is overwritten with the combined factors
//! (strictly-lower part L, diagonal and above U); for the pivoting variant
//! `perm` receives the row permutation. Buffers are only borrowed for the
//! duration of the call.

use std::os::raw::c_int;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::lu::{doolittle, permissive};
use crate::matrix::Matrix;
use crate::permutation::Permutation;
use crate::plu::partial_pivot;
use crate::unpack::unpack;

#[cfg(feature = "native")]
pub use native::NativeLibrary;

/// `void lu_in_place(int n, double A[n][n])`
pub type LuFn = unsafe extern "C" fn(n: c_int, a: *mut f64);

/// `void plu(int n, double A[n][n], int P[n])`
pub type PluFn = unsafe extern "C" fn(n: c_int, a: *mut f64, perm: *mut c_int);

pub trait Kernel {
    fn lu(&self, n: usize, a: &mut [f64]) -> Result<()>;

    fn plu(&self, n: usize, a: &mut [f64], perm: &mut [c_int]) -> Result<()>;
}

fn check_buffers(n: usize, a: &[f64], perm: Option<&[c_int]>) -> Result<()> {
    if a.len() != n * n {
        return Err(Error::BufferLength {
            expected: n * n,
            got: a.len(),
        });
    }
    if let Some(perm) = perm {
        if perm.len() != n {
            return Err(Error::BufferLength {
                expected: n,
                got: perm.len(),
            });
        }
    }
    Ok(())
}

/// The Rust kernels of [`crate::lu_in_place`] and [`crate::plu_in_place`].
#[derive(Clone, Copy, Debug, Default)]
pub struct InProcess;

impl Kernel for InProcess {
    fn lu(&self, n: usize, a: &mut [f64]) -> Result<()> {
        check_buffers(n, a, None)?;
        match doolittle(n, a, permissive) {
            Ok(()) => Ok(()),
            Err(never) => match never {},
        }
    }

    fn plu(&self, n: usize, a: &mut [f64], perm: &mut [c_int]) -> Result<()> {
        check_buffers(n, a, Some(perm))?;
        if c_int::try_from(n).is_err() {
            return Err(Error::TooLarge { n });
        }
        match partial_pivot(n, a, perm, permissive) {
            Ok(()) => Ok(()),
            Err(never) => match never {},
        }
    }
}

/// Location of the native library and the names of its two entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeConfig {
    pub path: PathBuf,
    pub lu_symbol: String,
    pub plu_symbol: String,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./libgauss.so"),
            lu_symbol: "lu_in_place".to_string(),
            plu_symbol: "plu".to_string(),
        }
    }
}

#[cfg(feature = "native")]
mod native {
    use std::cell::Cell;
    use std::marker::PhantomData;
    use std::os::raw::c_int;

    use libloading::{Library, Symbol};

    use super::{check_buffers, Kernel, LuFn, NativeConfig, PluFn};
    use crate::error::{Error, Result};

    /// Factorization routines resolved from a shared library.
    ///
    /// The routines are not assumed to be re-entrant, so a `NativeLibrary`
    /// is not `Sync`.
    pub struct NativeLibrary {
        // Keeps the function pointers below valid.
        _lib: Option<Library>,
        lu: LuFn,
        plu: PluFn,
        _not_sync: PhantomData<Cell<()>>,
    }

    impl NativeLibrary {
        /// Opens the library at `config.path` and resolves both symbols.
        ///
        /// Any failure is reported as [`Error::BackendUnavailable`].
        pub fn load(config: &NativeConfig) -> Result<Self> {
            let unavailable = |cause: String| Error::BackendUnavailable {
                path: config.path.clone(),
                cause,
            };

            // Running the library initializers is inherent to dlopen.
            let lib = unsafe { Library::new(&config.path) }.map_err(|e| unavailable(e.to_string()))?;

            let lu = unsafe {
                let sym: Symbol<LuFn> = lib
                    .get(config.lu_symbol.as_bytes())
                    .map_err(|e| unavailable(format!("{}: {}", config.lu_symbol, e)))?;
                *sym
            };
            let plu = unsafe {
                let sym: Symbol<PluFn> = lib
                    .get(config.plu_symbol.as_bytes())
                    .map_err(|e| unavailable(format!("{}: {}", config.plu_symbol, e)))?;
                *sym
            };

            Ok(Self {
                _lib: Some(lib),
                lu,
                plu,
                _not_sync: PhantomData,
            })
        }

        /// Wraps routines that are already linked into the process.
        ///
        /// # Safety
        ///
        /// Both functions must honour the buffer contract of [`Kernel`]:
        /// read and write at most `n*n` doubles through `a` and `n` ints
        /// through `perm`, and keep no reference to either after returning.
        pub unsafe fn from_fns(lu: LuFn, plu: PluFn) -> Self {
            Self {
                _lib: None,
                lu,
                plu,
                _not_sync: PhantomData,
            }
        }
    }

    impl Kernel for NativeLibrary {
        fn lu(&self, n: usize, a: &mut [f64]) -> Result<()> {
            check_buffers(n, a, None)?;
            let n_c = c_int::try_from(n).map_err(|_| Error::TooLarge { n })?;
            // The buffer is n*n long, as the routine expects.
            unsafe { (self.lu)(n_c, a.as_mut_ptr()) };
            Ok(())
        }

        fn plu(&self, n: usize, a: &mut [f64], perm: &mut [c_int]) -> Result<()> {
            check_buffers(n, a, Some(perm))?;
            let n_c = c_int::try_from(n).map_err(|_| Error::TooLarge { n })?;
            unsafe { (self.plu)(n_c, a.as_mut_ptr(), perm.as_mut_ptr()) };
            Ok(())
        }
    }
}

/// LU decomposition through `kernel`.
///
/// The matrix is handed over as its row-major buffer and rebuilt from the
/// mutated buffer afterwards.
pub fn lu_with<K: Kernel + ?Sized>(kernel: &K, a: Matrix<f64>) -> Result<(Matrix<f64>, Matrix<f64>)> {
    let n = a.n();
    let mut buf = a.into_vec();
    kernel.lu(n, &mut buf)?;

    let a = Matrix::from_row_major(n, buf)?;
    Ok(unpack(&a))
}

/// PLU decomposition through `kernel`. The permutation it writes must be
/// a bijection, otherwise [`Error::InvalidPermutation`] is returned.
pub fn plu_with<K: Kernel + ?Sized>(
    kernel: &K,
    a: Matrix<f64>,
) -> Result<(Permutation, Matrix<f64>, Matrix<f64>)> {
    let n = a.n();
    let mut buf = a.into_vec();
    let mut perm: Vec<c_int> = vec![0; n];
    kernel.plu(n, &mut buf, &mut perm)?;

    let perm = Permutation::from_indices(&perm)?;
    let a = Matrix::from_row_major(n, buf)?;
    let (l_mat, u_mat) = unpack(&a);
    Ok((perm, l_mat, u_mat))
}

/// Selects where factorizations run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    InProcess,
    Native(NativeConfig),
}

impl Backend {
    pub fn from_flag(use_native: bool, config: NativeConfig) -> Self {
        if use_native {
            Backend::Native(config)
        } else {
            Backend::InProcess
        }
    }

    /// Instantiates the kernel, loading the native library if selected.
    pub fn kernel(&self) -> Result<Box<dyn Kernel>> {
        match self {
            Backend::InProcess => Ok(Box::new(InProcess)),
            #[cfg(feature = "native")]
            Backend::Native(config) => Ok(Box::new(NativeLibrary::load(config)?)),
            #[cfg(not(feature = "native"))]
            Backend::Native(config) => Err(Error::BackendUnavailable {
                path: config.path.clone(),
                cause: "built without the `native` feature".to_string(),
            }),
        }
    }

    pub fn lu(&self, a: Matrix<f64>) -> Result<(Matrix<f64>, Matrix<f64>)> {
        let kernel = self.kernel()?;
        lu_with(kernel.as_ref(), a)
    }

    pub fn plu(&self, a: Matrix<f64>) -> Result<(Permutation, Matrix<f64>, Matrix<f64>)> {
        let kernel = self.kernel()?;
        plu_with(kernel.as_ref(), a)
    }
}
