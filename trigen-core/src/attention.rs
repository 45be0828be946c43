//! Scaled dot-product attention.
//!
//! A stand-alone numeric routine over small fixed matrices:
//!
//! ```text
//! scores = (Q @ K^T) / sqrt(depth)
//! attention_weights = softmax(scores + mask * -1e9)
//! output = attention_weights @ V
//! ```
//!
//! The routine is pure and stateless; it has no model lifecycle and is
//! consumed independently of the trigram model.

/// Additive penalty applied to masked positions before the softmax.
const MASK_PENALTY: f32 = -1e9;

/// A minimal row-major 3-D tensor backed by a flat `Vec<f32>`.
///
/// Shape is `[batch, rows, cols]`; element `(b, i, j)` lives at
/// `(b * rows + i) * cols + j`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
	/// Flat storage of all tensor elements.
	data: Vec<f32>,
	/// Dimensions: `[batch, rows, cols]`.
	shape: [usize; 3],
}

impl Tensor {
	/// Creates a tensor from flat data and a `[batch, rows, cols]` shape.
	///
	/// # Errors
	/// Returns an error if the data length does not match the shape.
	pub fn new(data: Vec<f32>, shape: [usize; 3]) -> Result<Self, String> {
		let expected: usize = shape.iter().product();
		if data.len() != expected {
			return Err(format!(
				"data length {} does not match shape {:?} (expected {})",
				data.len(),
				shape,
				expected
			));
		}
		Ok(Self { data, shape })
	}

	/// The `[batch, rows, cols]` dimensions.
	pub fn shape(&self) -> [usize; 3] {
		self.shape
	}

	/// Element at `(b, i, j)`.
	pub fn at(&self, b: usize, i: usize, j: usize) -> f32 {
		self.data[(b * self.shape[1] + i) * self.shape[2] + j]
	}

	/// Row `(b, i, ..)` as a slice.
	pub fn row(&self, b: usize, i: usize) -> &[f32] {
		let start = (b * self.shape[1] + i) * self.shape[2];
		&self.data[start..start + self.shape[2]]
	}

	fn at_mut(&mut self, b: usize, i: usize, j: usize) -> &mut f32 {
		&mut self.data[(b * self.shape[1] + i) * self.shape[2] + j]
	}

	fn zeros(shape: [usize; 3]) -> Self {
		Self { data: vec![0.0; shape.iter().product()], shape }
	}
}

/// Computes scaled dot-product attention.
///
/// `attention_weights` is the row-wise softmax of `Q·Kᵀ / sqrt(depth)`,
/// with masked positions penalized by a large negative additive bias
/// before the softmax, and `output = attention_weights · V`.
///
/// # Parameters
/// - `q`: queries, shape `(batch, seq_q, depth)`.
/// - `k`: keys, shape `(batch, seq_k, depth)`.
/// - `v`: values, shape `(batch, seq_k, depth_v)`.
/// - `mask`: optional additive mask of shape `(batch, seq_q, seq_k)`;
///   a batch dimension of 1 broadcasts over all batches. Positions with
///   value 1 are masked out.
///
/// # Returns
/// `(output, attention_weights)` with shapes `(batch, seq_q, depth_v)`
/// and `(batch, seq_q, seq_k)`.
///
/// # Errors
/// Returns an error if the tensor shapes are inconsistent. This is the
/// only failure mode; the computation itself is total.
pub fn scaled_dot_product_attention(
	q: &Tensor,
	k: &Tensor,
	v: &Tensor,
	mask: Option<&Tensor>,
) -> Result<(Tensor, Tensor), String> {
	let [batch, seq_q, depth] = q.shape();
	let [k_batch, seq_k, k_depth] = k.shape();
	let [v_batch, v_rows, depth_v] = v.shape();

	if k_batch != batch || v_batch != batch {
		return Err(format!("batch mismatch: q={}, k={}, v={}", batch, k_batch, v_batch));
	}
	if k_depth != depth {
		return Err(format!("depth mismatch: q={}, k={}", depth, k_depth));
	}
	if v_rows != seq_k {
		return Err(format!("v rows ({}) must match k rows ({})", v_rows, seq_k));
	}
	if let Some(m) = mask {
		let [m_batch, m_rows, m_cols] = m.shape();
		if (m_batch != batch && m_batch != 1) || m_rows != seq_q || m_cols != seq_k {
			return Err(format!(
				"mask shape {:?} not broadcastable to [{}, {}, {}]",
				m.shape(),
				batch,
				seq_q,
				seq_k
			));
		}
	}

	// Raw attention scores Q·Kᵀ, scaled by sqrt(depth)
	let scale = (depth as f32).sqrt();
	let mut weights = Tensor::zeros([batch, seq_q, seq_k]);
	for b in 0..batch {
		for i in 0..seq_q {
			for j in 0..seq_k {
				let mut score = 0.0;
				for d in 0..depth {
					score += q.at(b, i, d) * k.at(b, j, d);
				}
				score /= scale;
				if let Some(m) = mask {
					let mb = if m.shape()[0] == 1 { 0 } else { b };
					score += m.at(mb, i, j) * MASK_PENALTY;
				}
				*weights.at_mut(b, i, j) = score;
			}
		}
	}

	// Row-wise softmax, shifted by the row maximum
	for b in 0..batch {
		for i in 0..seq_q {
			let mut row_max = f32::NEG_INFINITY;
			for j in 0..seq_k {
				row_max = row_max.max(weights.at(b, i, j));
			}
			let mut sum = 0.0;
			for j in 0..seq_k {
				let e = (weights.at(b, i, j) - row_max).exp();
				*weights.at_mut(b, i, j) = e;
				sum += e;
			}
			for j in 0..seq_k {
				*weights.at_mut(b, i, j) /= sum;
			}
		}
	}

	// Weighted sum: attention_weights · V
	let mut output = Tensor::zeros([batch, seq_q, depth_v]);
	for b in 0..batch {
		for i in 0..seq_q {
			for e in 0..depth_v {
				let mut acc = 0.0;
				for j in 0..seq_k {
					acc += weights.at(b, i, j) * v.at(b, j, e);
				}
				*output.at_mut(b, i, e) = acc;
			}
		}
	}

	Ok((output, weights))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn demo_inputs() -> (Tensor, Tensor, Tensor) {
		let q = Tensor::new(
			vec![
				1.0, 0.0, 1.0, 0.0,
				0.0, 1.0, 0.0, 1.0,
				1.0, 1.0, 1.0, 1.0,
			],
			[1, 3, 4],
		)
		.unwrap();
		let k = q.clone();
		let v = Tensor::new(
			vec![
				10.0, 0.0, 10.0, 0.0,
				0.0, 10.0, 0.0, 10.0,
				5.0, 5.0, 5.0, 5.0,
			],
			[1, 3, 4],
		)
		.unwrap();
		(q, k, v)
	}

	#[test]
	fn weight_rows_sum_to_one() {
		let (q, k, v) = demo_inputs();
		let (_, weights) = scaled_dot_product_attention(&q, &k, &v, None).unwrap();
		for i in 0..3 {
			let sum: f32 = weights.row(0, i).iter().sum();
			assert!((sum - 1.0).abs() < 1e-5, "row {} sums to {}", i, sum);
		}
	}

	#[test]
	fn identical_scores_give_uniform_weights() {
		// One query against three identical keys
		let q = Tensor::new(vec![1.0, 1.0], [1, 1, 2]).unwrap();
		let k = Tensor::new(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0], [1, 3, 2]).unwrap();
		let v = Tensor::new(vec![3.0, 6.0, 9.0], [1, 3, 1]).unwrap();

		let (output, weights) = scaled_dot_product_attention(&q, &k, &v, None).unwrap();
		for j in 0..3 {
			assert!((weights.at(0, 0, j) - 1.0 / 3.0).abs() < 1e-5);
		}
		assert!((output.at(0, 0, 0) - 6.0).abs() < 1e-4);
	}

	#[test]
	fn masked_positions_get_vanishing_weight() {
		let (q, k, v) = demo_inputs();
		// Mask out the last key for every query
		let mask = Tensor::new(
			vec![
				0.0, 0.0, 1.0,
				0.0, 0.0, 1.0,
				0.0, 0.0, 1.0,
			],
			[1, 3, 3],
		)
		.unwrap();

		let (_, weights) = scaled_dot_product_attention(&q, &k, &v, Some(&mask)).unwrap();
		for i in 0..3 {
			assert!(weights.at(0, i, 2) < 1e-6);
			let sum: f32 = weights.row(0, i).iter().sum();
			assert!((sum - 1.0).abs() < 1e-5);
		}
	}

	#[test]
	fn depth_mismatch_is_rejected() {
		let q = Tensor::new(vec![1.0, 0.0], [1, 1, 2]).unwrap();
		let k = Tensor::new(vec![1.0, 0.0, 1.0], [1, 1, 3]).unwrap();
		let v = Tensor::new(vec![1.0], [1, 1, 1]).unwrap();
		assert!(scaled_dot_product_attention(&q, &k, &v, None).is_err());
	}

	#[test]
	fn wrong_data_length_is_rejected() {
		assert!(Tensor::new(vec![1.0, 2.0, 3.0], [1, 2, 2]).is_err());
	}
}
