use trigen_core::attention::{Tensor, scaled_dot_product_attention};
use trigen_core::model::trigram_model::{DEFAULT_MAX_LENGTH, TrigramModel};

/// Short training sample embedded in the demo.
const SAMPLE_TEXT: &str = "the cat sat on the mat. the dog sat on the rug. \
    the cat saw the dog and the dog saw the cat. \
    a bird flew over the mat and the cat watched the bird.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Train the trigram model on the embedded sample text
    let mut model = TrigramModel::new();
    model.fit(SAMPLE_TEXT);

    println!("Vocabulary size: {}", model.vocabulary().len());

    // Generate a handful of sequences with the default length cap
    for i in 0..5 {
        println!("Generated sequence {}: {}", i + 1, model.generate(DEFAULT_MAX_LENGTH));
    }

    // Fixed example inputs for the attention routine (batch=1, seq_len=3, depth=4)
    let q = Tensor::new(
        vec![
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
            1.0, 1.0, 1.0, 1.0,
        ],
        [1, 3, 4],
    )?;
    let k = Tensor::new(
        vec![
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
            1.0, 1.0, 1.0, 1.0,
        ],
        [1, 3, 4],
    )?;
    let v = Tensor::new(
        vec![
            10.0, 0.0, 10.0, 0.0,
            0.0, 10.0, 0.0, 10.0,
            5.0, 5.0, 5.0, 5.0,
        ],
        [1, 3, 4],
    )?;

    let (output, weights) = scaled_dot_product_attention(&q, &k, &v, None)?;

    println!("\nAttention weights:");
    print_batch(&weights);
    println!("\nOutput:");
    print_batch(&output);

    Ok(())
}

/// Prints the first batch of a tensor, one row per line.
fn print_batch(tensor: &Tensor) {
    let [_, rows, _] = tensor.shape();
    for i in 0..rows {
        let row: Vec<String> = tensor.row(0, i).iter().map(|x| format!("{:.4}", x)).collect();
        println!("[{}]", row.join(", "));
    }
}
