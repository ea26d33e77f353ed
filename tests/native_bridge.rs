//! Exercises the native-routine ABI with `extern "C"` functions linked into
//! the test binary, written against raw pointers the way a C library would.
#![cfg(feature = "native")]

use std::os::raw::c_int;

use approx::assert_abs_diff_eq;
use dlu::{lu_with, plu_with, Backend, Error, InProcess, Kernel, Matrix, NativeConfig, NativeLibrary};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

unsafe extern "C" fn c_lu_in_place(n: c_int, a: *mut f64) {
    let n = n as isize;
    let at = |i: isize, j: isize| a.offset(i * n + j);
    for k in 0..n {
        for i in k..n {
            for j in 0..k {
                *at(k, i) -= *at(k, j) * *at(j, i);
            }
        }
        for i in k + 1..n {
            for j in 0..k {
                *at(i, k) -= *at(i, j) * *at(j, k);
            }
            *at(i, k) /= *at(k, k);
        }
    }
}

unsafe extern "C" fn c_plu(n: c_int, a: *mut f64, p: *mut c_int) {
    let n = n as isize;
    let at = |i: isize, j: isize| a.offset(i * n + j);
    for i in 0..n {
        *p.offset(i) = i as c_int;
    }
    for k in 0..n {
        let mut max = 0.0;
        let mut imax = k;
        for i in k..n {
            if (*at(i, k)).abs() > max {
                max = (*at(i, k)).abs();
                imax = i;
            }
        }
        std::ptr::swap(p.offset(k), p.offset(imax));
        for j in 0..n {
            std::ptr::swap(at(k, j), at(imax, j));
        }
        for i in k + 1..n {
            *at(i, k) /= *at(k, k);
            for j in k + 1..n {
                *at(i, j) -= *at(i, k) * *at(k, j);
            }
        }
    }
}

/// Writes a permutation with a repeated entry.
unsafe extern "C" fn c_plu_broken(n: c_int, _a: *mut f64, p: *mut c_int) {
    for i in 0..n as isize {
        *p.offset(i) = 0;
    }
}

fn native() -> NativeLibrary {
    unsafe { NativeLibrary::from_fns(c_lu_in_place, c_plu) }
}

fn random_matrix(rng: &mut StdRng, n: usize) -> Matrix<f64> {
    Matrix::from_fn(n, |_, _| rng.gen_range(-10.0..10.0))
}

fn assert_close(lhs: &Matrix<f64>, rhs: &Matrix<f64>) {
    assert_eq!(lhs.n(), rhs.n());
    for (x, y) in lhs.as_slice().iter().zip(rhs.as_slice()) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-12);
    }
}

#[test]
fn test_lu_cross_backend() {
    let a = Matrix::from_rows(vec![
        vec![2.0, 3.0, -1.0],
        vec![4.0, 1.0, 2.0],
        vec![-2.0, 7.0, 2.0],
    ])
    .unwrap();

    let (l1, u1) = lu_with(&InProcess, a.clone()).unwrap();
    let (l2, u2) = lu_with(&native(), a).unwrap();
    assert_close(&l1, &l2);
    assert_close(&u1, &u2);
    assert_eq!(u2[(2, 2)], 9.0);
}

#[test]
fn test_plu_cross_backend_random() {
    let mut rng = StdRng::seed_from_u64(3);
    for n in [1, 4, 10, 30] {
        let a = random_matrix(&mut rng, n);
        let (p1, l1, u1) = plu_with(&InProcess, a.clone()).unwrap();
        let (p2, l2, u2) = plu_with(&native(), a).unwrap();
        assert_eq!(p1, p2, "n = {}", n);
        assert_close(&l1, &l2);
        assert_close(&u1, &u2);
    }
}

#[test]
fn test_plu_cross_backend_hilbert() {
    let h = Matrix::from_fn(20, |i, j| 1.0 / (i + j + 1) as f64);
    let (p1, l1, u1) = plu_with(&InProcess, h.clone()).unwrap();
    let (p2, l2, u2) = plu_with(&native(), h).unwrap();
    assert_eq!(p1, p2);
    assert_close(&l1, &l2);
    assert_close(&u1, &u2);
}

#[test]
fn test_dyn_kernel() {
    let kernels: Vec<Box<dyn Kernel>> = vec![Box::new(InProcess), Box::new(native())];
    for kernel in &kernels {
        let mut a = vec![0.0, 1.0, 2.0, 3.0];
        let mut perm = vec![0; 2];
        kernel.plu(2, &mut a, &mut perm).unwrap();
        assert_eq!(perm, vec![1, 0]);
        assert_eq!(a, vec![2.0, 3.0, 0.0, 1.0]);
    }
}

#[test]
fn test_invalid_permutation_is_rejected() {
    let broken = unsafe { NativeLibrary::from_fns(c_lu_in_place, c_plu_broken) };
    let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    match plu_with(&broken, a) {
        Err(Error::InvalidPermutation { n, indices }) => {
            assert_eq!(n, 2);
            assert_eq!(indices, vec![0, 0]);
        }
        r => panic!("unexpected result: {:?}", r.map(|_| ())),
    }
}

#[test]
fn test_load_failure() {
    let config = NativeConfig {
        path: "/nonexistent/libgauss.so".into(),
        ..Default::default()
    };
    assert!(matches!(
        NativeLibrary::load(&config),
        Err(Error::BackendUnavailable { .. })
    ));
    assert!(matches!(
        Backend::from_flag(true, config).plu(Matrix::identity(2)),
        Err(Error::BackendUnavailable { .. })
    ));
}

#[cfg(target_os = "linux")]
fn libm_config(lu_symbol: &str, plu_symbol: &str) -> NativeConfig {
    NativeConfig {
        path: "libm.so.6".into(),
        lu_symbol: lu_symbol.to_string(),
        plu_symbol: plu_symbol.to_string(),
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_load_resolves_symbols() {
    // Only resolution is checked: these routines are never called.
    let config = libm_config("cos", "sin");
    assert!(NativeLibrary::load(&config).is_ok());
    assert!(Backend::from_flag(true, config).kernel().is_ok());
}

#[cfg(target_os = "linux")]
#[test]
fn test_load_missing_symbol() {
    for config in [
        libm_config("lu_in_place_missing", "sin"),
        libm_config("cos", "plu_missing"),
    ] {
        let missing = if config.lu_symbol == "cos" {
            config.plu_symbol.clone()
        } else {
            config.lu_symbol.clone()
        };
        match NativeLibrary::load(&config) {
            Err(Error::BackendUnavailable { path, cause }) => {
                assert_eq!(path, config.path);
                assert!(cause.contains(&missing), "cause = {}", cause);
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("{} resolved", missing),
        }
    }
}
