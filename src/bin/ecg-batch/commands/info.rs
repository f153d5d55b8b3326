use crate::cli::InfoArgs;
use crate::exit_codes;
use crate::input;
use crate::output;
use ndarray::Axis;
use serde::Serialize;

#[derive(Serialize)]
struct ChannelStats {
    channel: usize,
    min: f64,
    max: f64,
    mean: f64,
    std: f64,
}

#[derive(Serialize)]
struct InfoOutput {
    file: String,
    n_channels: usize,
    n_samples: usize,
    sampling_rate: Option<f64>,
    duration_secs: Option<f64>,
    channels: Vec<ChannelStats>,
}

pub fn execute(args: InfoArgs) -> i32 {
    let loaded = match input::load_signal(&args.input) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    let signal = &loaded.signal;
    let n_samples = signal.ncols();
    let channels = signal
        .axis_iter(Axis(0))
        .enumerate()
        .map(|(channel, row)| ChannelStats {
            channel,
            min: row.fold(f64::INFINITY, |a, &b| a.min(b)),
            max: row.fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
            mean: row.mean().unwrap_or(f64::NAN),
            std: row.std(0.0),
        })
        .collect();

    let info = InfoOutput {
        file: args.input.clone(),
        n_channels: signal.nrows(),
        n_samples,
        sampling_rate: loaded.sampling_rate,
        duration_secs: loaded.sampling_rate.map(|sr| n_samples as f64 / sr),
        channels,
    };

    if args.json {
        return output::emit(&info, false, None);
    }

    println!("File: {}", info.file);
    println!("Channels: {}", info.n_channels);
    println!("Samples: {}", info.n_samples);
    match (info.sampling_rate, info.duration_secs) {
        (Some(sr), Some(duration)) => {
            println!("Sampling rate: {} Hz", sr);
            println!("Duration: {:.3} s", duration);
        }
        _ => println!("Sampling rate: not specified"),
    }
    println!();
    println!(
        "  {:<8} {:>12} {:>12} {:>12} {:>12}",
        "Channel", "Min", "Max", "Mean", "Std"
    );
    println!("  {}", "-".repeat(60));
    for ch in &info.channels {
        println!(
            "  {:<8} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
            ch.channel, ch.min, ch.max, ch.mean, ch.std
        );
    }

    exit_codes::SUCCESS
}
