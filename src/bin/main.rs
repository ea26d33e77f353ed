use anyhow::{format_err, Result};

use dlu::{Backend, Matrix, NativeConfig};

fn print_matrix(name: &str, m: &Matrix<f64>) {
    println!("{}:", name);
    for row in m.to_rows() {
        let cells: Vec<String> = row.iter().map(|x| format!("{:10.4}", x)).collect();
        println!("  {}", cells.join(" "));
    }
}

fn hilbert(n: usize) -> Matrix<f64> {
    Matrix::from_fn(n, |i, j| 1.0 / (i + j + 1) as f64)
}

// Usage: dlu [--native PATH] [--hilbert N]
fn main() -> Result<()> {
    let mut backend = Backend::InProcess;
    let mut hilbert_n = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--native" => {
                let path = args
                    .next()
                    .ok_or_else(|| format_err!("--native requires a library path"))?;
                backend = Backend::from_flag(
                    true,
                    NativeConfig {
                        path: path.into(),
                        ..Default::default()
                    },
                );
            }
            "--hilbert" => {
                let n = args
                    .next()
                    .ok_or_else(|| format_err!("--hilbert requires a dimension"))?;
                hilbert_n = Some(n.parse::<usize>()?);
            }
            _ => return Err(format_err!("unknown argument: {}", arg)),
        }
    }

    let a = Matrix::from_rows(vec![
        vec![2.0, 3.0, -1.0],
        vec![4.0, 1.0, 2.0],
        vec![-2.0, 7.0, 2.0],
    ])?;

    // Each call consumes its input.
    let (l_mat, u_mat) = backend.lu(a.clone())?;
    print_matrix("LU L", &l_mat);
    print_matrix("LU U", &u_mat);

    let (perm, l_mat, u_mat) = backend.plu(a)?;
    println!("PLU perm: {:?}", perm.as_slice());
    print_matrix("PLU L", &l_mat);
    print_matrix("PLU U", &u_mat);

    if let Some(n) = hilbert_n {
        let h = hilbert(n);
        let (perm, l_mat, u_mat) = backend.plu(h.clone())?;
        let err = l_mat
            .matmul(&u_mat)?
            .max_abs_diff(&perm.permute_rows(&h)?)
            .unwrap_or(0.0);
        println!("Hilbert({}) perm: {:?}", n, perm.as_slice());
        println!("Hilbert({}) max |LU - PA| = {:e}", n, err);
    }

    Ok(())
}
