#[cfg(feature = "debug")]
use std::io::Write;

#[cfg(feature = "debug")]
const MIN_WIDTH: usize = 5;

#[cfg(feature = "debug")]
const PADDING: usize = 1;

#[cfg(feature = "debug")]
const FLOAT_CONFIG: pretty_dtoa::FmtFloatConfig = pretty_dtoa::FmtFloatConfig::default()
    .add_point_zero(false)
    .max_significant_digits(6);

/// Renders a dense matrix as right-aligned columns.
#[cfg(feature = "debug")]
pub fn matrix_table<S: crate::Scalar>(m: &crate::Matrix<S>) -> String {
    buffer_table(m.n(), m.as_slice())
}

/// Same as [`matrix_table`] for a raw row-major buffer with stride `n`.
#[cfg(feature = "debug")]
pub(crate) fn buffer_table<S: crate::Scalar>(n: usize, a: &[S]) -> String {
    let mut tw = tabwriter::TabWriter::new(vec![])
        .minwidth(MIN_WIDTH)
        .padding(PADDING)
        .alignment(tabwriter::Alignment::Right);

    for row in a.chunks_exact(n.max(1)) {
        for x in row {
            let s = x.pretty_string(FLOAT_CONFIG);
            // Writes into a Vec cannot fail.
            let _ = tw.write_all(s.as_bytes());
            let _ = tw.write_all(b"\t");
        }
        let _ = tw.write_all(b"\n");
    }
    match tw.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

#[cfg(feature = "debug")]
macro_rules! debug {
    ($( $args:expr ),*) => { println!( $( $args ),* ); }
}

#[cfg(not(feature = "debug"))]
macro_rules! debug {
    ($( $args:expr ),*) => {};
}

pub(crate) use debug;
