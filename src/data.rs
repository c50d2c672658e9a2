use crate::errors::RuleError;
use std::fmt;

/// Contiguous column major feature matrix.
///
/// Holds the training rows used to find a representative route for
/// every leaf. Column `j` holds the values of the `j`th feature of the
/// schema, so a column major layout lets a dataframe column be passed
/// in without copying it.
///
/// # Type Parameters
/// * `T` - The type of the stored values, `f64` for feature data.
#[derive(Debug)]
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Indices into the data row-wise.
    pub index: Vec<usize>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix. The length of `data` is not checked here,
    /// use `try_new` for data coming from outside the crate.
    ///
    /// * `data` - Column major values, `rows * cols` long.
    /// * `rows` - Number of rows.
    /// * `cols` - Number of columns.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
        }
    }

    /// Create a new Matrix, checking that `data` holds exactly `rows * cols` values.
    pub fn try_new(data: &'a [T], rows: usize, cols: usize) -> Result<Self, RuleError> {
        let matrix = Matrix::new(data, rows, cols);
        matrix.validate_len()?;
        Ok(matrix)
    }

    /// Check the data length against the declared shape.
    pub fn validate_len(&self) -> Result<(), RuleError> {
        let expected = self.rows * self.cols;
        if self.data.len() != expected {
            return Err(RuleError::MismatchedShape(
                "data length".to_string(),
                expected,
                self.data.len(),
            ));
        }
        Ok(())
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[j * self.rows + i]
    }

    /// Get access to a row of the data, as an iterator.
    pub fn get_row_iter(&self, row: usize) -> std::iter::StepBy<std::iter::Skip<std::slice::Iter<'a, T>>> {
        self.data.iter().skip(row).step_by(self.rows)
    }
}

impl<'a, T> Matrix<'a, T>
where
    T: Copy,
{
    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        self.get_row_iter(row).copied().collect()
    }
}

impl<'a, T> fmt::Display for Matrix<'a, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut val = String::new();
        for i in 0..self.rows {
            for j in 0..self.cols {
                val.push_str(self.get(i, j).to_string().as_str());
                if j == (self.cols - 1) {
                    val.push('\n');
                } else {
                    val.push(' ');
                }
            }
        }
        write!(f, "{}", val)
    }
}
