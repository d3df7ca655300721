use std::time::{Duration, Instant};

use clap::Parser;
use gnuplot::{AxesCommon, ColorType, Figure, PlotOption};
use peephole_lstm::{CellDescription, Gate, LstmCell, Vector};
use tracing::info;

/// Trains a 2-input, 1-output cell to be an AND gate.
#[derive(Debug, Parser)]
struct Args {
    /// Snapshots kept for the backward pass (0 = unbounded).
    #[arg(short, long, default_value_t = 0)]
    capacity: usize,
    /// Give up after this many epochs.
    #[arg(short, long, default_value_t = 10_000)]
    max_epochs: usize,
    /// Stop once the per-epoch sum of squared errors is at or below this.
    #[arg(short, long, default_value_t = 0.01)]
    threshold: f32,
    /// Plot the error curve to this SVG file.
    #[arg(long)]
    plot: Option<String>,
}

const SAMPLES: [([f32; 2], f32); 4] = [
    ([0., 0.], 0.),
    ([0., 1.], 0.),
    ([1., 0.], 0.),
    ([1., 1.], 1.),
];

fn time<T>(f: impl FnOnce() -> T) -> (Duration, T) {
    let before = Instant::now();
    let result = f();
    let after = Instant::now();
    (after.duration_since(before), result)
}

struct LossRecords {
    i_epochs_records: Vec<f32>,
    loss_records: Vec<f32>,
}

fn plot_loss(records: &LossRecords, output_path: &str) {
    info!("plotting error curve to {output_path:?}");
    let mut figure = Figure::new();
    figure.axes2d().set_y_log(Some(10.0)).lines(
        &records.i_epochs_records,
        &records.loss_records,
        &[
            PlotOption::Caption("Sum of squared errors"),
            PlotOption::Color(ColorType::Black),
        ],
    );
    figure.set_title("Sum of squared errors");
    figure.set_terminal("svg", output_path);
    if let Err(error) = figure.show() {
        tracing::warn!("gnuplot failed: {error}");
    }
}

fn train(cell: &mut LstmCell<2, 1>, args: &Args) -> LossRecords {
    let n_logs = 20;
    let mut records = LossRecords {
        i_epochs_records: Vec::new(),
        loss_records: Vec::new(),
    };
    for i_epoch in 0..args.max_epochs {
        let mut err_sum = 0.0f32;
        for (x, target) in SAMPLES {
            let y = cell.forward(&Vector::new(x))[0];
            let err = target - y;
            err_sum += err * err;
            cell.backward(&Vector::new([err]))
                .expect("forward was called just before");
        }
        records.i_epochs_records.push(i_epoch as f32);
        records.loss_records.push(err_sum);
        if i_epoch % (args.max_epochs / args.max_epochs.min(n_logs)).max(1) == 0 {
            info!(epoch = i_epoch, err_sum, "training");
        }
        if err_sum <= args.threshold {
            info!(epoch = i_epoch, err_sum, "reached threshold");
            break;
        }
    }
    records
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut cell = LstmCell::<2, 1>::new(CellDescription::new(args.capacity));

    let (training_duration, records) = time(|| train(&mut cell, &args));
    info!("training took {training_duration:?}");

    if let Some(path) = &args.plot {
        plot_loss(&records, path);
    }

    for gate in Gate::ALL {
        println!("{}", cell.pretty_print_gate(gate));
    }

    cell.reset_memory();
    for (x, target) in SAMPLES {
        let y = cell.forward(&Vector::new(x))[0];
        println!("{} and {} = {y:.4} (expected {target})", x[0], x[1]);
    }
}
