/*!

A simple row-major matrix, used for `NetworkGrid::get_layer`'s bounded
2-D projection of a z-plane.

*/

#[derive(Debug, Clone)]
pub struct Matrix<T> {
	data: Vec<T>,
	num_columns: usize,
}

impl<T> Matrix<T> {
	/// Read a matrix entry.
	pub fn get(&self, row: usize, column: usize) -> &T {
		&self.data[row * self.num_columns + column]
	}

	/// Read/write a matrix entry.
	pub fn get_mut(&mut self, row: usize, column: usize) -> &mut T {
		&mut self.data[row * self.num_columns + column]
	}

	pub fn rows(&self) -> usize {
		if self.num_columns == 0 {
			0
		} else {
			self.data.len() / self.num_columns
		}
	}

	pub fn columns(&self) -> usize {
		self.num_columns
	}

	/// Every `(row, column, &value)` triple, in row-major order. Used by
	/// the CLI to render a layer without hand-nesting the row/column
	/// loops.
	pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
		itertools::iproduct!(0..self.rows(), 0..self.num_columns).map(move |(r, c)| (r, c, self.get(r, c)))
	}

	/// Builds a matrix with every cell set to `value`.
	pub fn constant(value: T, num_rows: usize, num_columns: usize) -> Matrix<T>
	where
		T: Clone,
	{
		Matrix {
			data: vec![value; num_rows * num_columns],
			num_columns,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn get_and_get_mut_round_trip() {
		let mut m: Matrix<Option<i32>> = Matrix::constant(None, 2, 3);
		*m.get_mut(1, 2) = Some(7);
		assert_eq!(*m.get(1, 2), Some(7));
		assert_eq!(*m.get(0, 0), None);
		assert_eq!(m.rows(), 2);
		assert_eq!(m.columns(), 3);
	}

	#[test]
	fn iter_covers_every_cell_in_row_major_order() {
		let mut m: Matrix<i32> = Matrix::constant(0, 2, 2);
		*m.get_mut(0, 1) = 1;
		*m.get_mut(1, 0) = 2;
		*m.get_mut(1, 1) = 3;
		let visited: Vec<(usize, usize, i32)> = m.iter().map(|(r, c, v)| (r, c, *v)).collect();
		assert_eq!(visited, vec![(0, 0, 0), (0, 1, 1), (1, 0, 2), (1, 1, 3)]);
	}
}
