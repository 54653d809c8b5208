use rand::rngs::StdRng;
use rand::SeedableRng;

use magnetite::{
    mini_batch_gd, DataSplit, GdParams, History, LossType, Matrix, Network, StepKind,
};

/// Two Gaussian blobs in 4 dimensions, one sample per column.
fn blobs(n_per_class: usize, seed: u64) -> (Matrix, Matrix, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = 2 * n_per_class;
    let mut x = Matrix::gaussian(4, n, 1.0, &mut rng);
    let mut y = Matrix::zeros(2, n);
    let mut labels = Vec::with_capacity(n);
    for j in 0..n {
        let class = j % 2;
        let center = if class == 0 { -2.0 } else { 2.0 };
        for i in 0..4 {
            x.data[i][j] += center;
        }
        y.data[class][j] = 1.0;
        labels.push(class);
    }
    (x, y, labels)
}

fn main() -> magnetite::Result<()> {
    let (x_train, y_train, labels_train) = blobs(100, 0);
    let (x_val, y_val, labels_val) = blobs(50, 1);
    let data = DataSplit::new(x_train, y_train, labels_train, x_val, y_val, labels_val)?;

    // Single-layer softmax classifier: 4 features in, 2 classes out.
    let mut net = Network::new(&[4, 2], 0.001, LossType::CrossEntropy, 42)?;

    let mut params = GdParams::new(20, 20, 0.1);
    params.reshuffle = true;
    let mut history = History::new(StepKind::Epoch, true);

    mini_batch_gd(&mut net, &data, &params, &mut history)?;

    let final_point = history.last().expect("history has at least the baseline entry");
    println!(
        "final: train_acc={:.3} val_acc={:.3}",
        final_point.train_acc, final_point.val_acc
    );

    let key = params.run_key(net.lambda, net.seed);
    net.save_json(&format!("model_{key}.json"))?;
    history.save_json(&format!("history_{key}.json"))?;
    println!("saved model_{key}.json and history_{key}.json");
    Ok(())
}
