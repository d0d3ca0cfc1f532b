use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use crate::traits::{LinalgScalar, Scalar};

use super::DynMatrix;

// ── Column manipulation ─────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Copy of the leading `k` columns.
    ///
    /// Panics if `k > ncols`.
    ///
    /// ```
    /// use densvd::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let lead = m.leading_columns(2);
    /// assert_eq!(lead.shape(), (2, 2));
    /// assert_eq!(lead[(1, 1)], 5.0);
    /// ```
    pub fn leading_columns(&self, k: usize) -> Self {
        assert!(k <= self.ncols, "requested {} of {} columns", k, self.ncols);
        DynMatrix::from_slice(self.nrows, k, &self.data[..k * self.nrows])
    }

    /// Column `j` as an owned vector.
    pub fn column(&self, j: usize) -> Vec<T> {
        self.data[j * self.nrows..(j + 1) * self.nrows].to_vec()
    }

    /// Multiply column `j` by `s` in place.
    pub fn scale_col(&mut self, j: usize, s: T) {
        let n = self.nrows;
        for x in &mut self.data[j * n..(j + 1) * n] {
            *x = *x * s;
        }
    }

    /// Multiply row `i` by `s` in place.
    pub fn scale_row(&mut self, i: usize, s: T) {
        let n = self.nrows;
        for j in 0..self.ncols {
            self.data[j * n + i] = self.data[j * n + i] * s;
        }
    }

    /// Main diagonal as an owned vector (length `min(nrows, ncols)`).
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.nrows.min(self.ncols)).map(|i| self[(i, i)]).collect()
    }
}

impl<T: LinalgScalar> DynMatrix<T> {
    /// Promote a real matrix into this element type.
    pub fn from_real(real: &DynMatrix<T::Real>) -> Self {
        DynMatrix::from_fn(real.nrows, real.ncols, |i, j| T::from_real(real[(i, j)]))
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display> fmt::Display for DynMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.nrows;
        let n = self.ncols;

        let mut widths: Vec<usize> = alloc::vec![0; n];
        for (j, width) in widths.iter_mut().enumerate() {
            for i in 0..m {
                let w = WriteCounting::count(|wc| write!(wc, "{}", self[(i, j)]));
                *width = (*width).max(w);
            }
        }

        for i in 0..m {
            write!(f, "│")?;
            for j in 0..n {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", self[(i, j)], width = widths[j])?;
            }
            write!(f, "│")?;
            if i + 1 < m {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.chars().count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn scale_columns_and_rows() {
        let mut m = DynMatrix::from_rows(2, 3, &[3.0, 2.0, 1.0, 6.0, 5.0, 4.0]);
        assert_eq!(m.column(0), [3.0, 6.0]);
        m.scale_col(0, -1.0);
        assert_eq!(m.column(0), [-3.0, -6.0]);
        m.scale_row(1, 2.0);
        assert_eq!(m[(1, 1)], 10.0);
    }

    #[test]
    fn diagonal_of_rectangular() {
        let m = DynMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.diagonal(), [1.0, 4.0]);
    }

    #[test]
    fn display_aligns_columns() {
        let m = DynMatrix::from_rows(2, 2, &[1.0, -20.0, 300.0, 4.0]);
        let s = m.to_string();
        assert_eq!(s, "│  1  -20│\n│300    4│");
    }
}
