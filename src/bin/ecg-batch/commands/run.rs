use crate::cli::RunArgs;
use crate::exit_codes;
use crate::input::{self, ArrayOutput};
use crate::output;
use ecg_batch::profiling::ProfileScope;
use ecg_batch::PipelineConfig;
use serde::Serialize;

#[derive(Serialize)]
struct RunOutput {
    input: String,
    sampling_rate: f64,
    steps: Vec<&'static str>,
    elapsed_ms: f64,
    #[serde(flatten)]
    result: ArrayOutput,
}

pub fn execute(args: RunArgs) -> i32 {
    let loaded = match input::load_signal(&args.input) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    let mut config = match PipelineConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid pipeline config '{}': {}", args.config, e);
            return exit_codes::INPUT_ERROR;
        }
    };

    // --sr wins over the input file, which wins over the config
    if let Some(sr) = args.sr.or(loaded.sampling_rate) {
        config.sampling_rate = sr;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return exit_codes::INPUT_ERROR;
    }

    log::info!(
        "Running {} steps on {} channels x {} samples at {} Hz",
        config.steps.len(),
        loaded.signal.nrows(),
        loaded.signal.ncols(),
        config.sampling_rate
    );

    let scope = ProfileScope::new(format!("pipeline on {}", args.input));
    let result = match config.run(loaded.signal.into_dyn()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: pipeline failed: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };
    let elapsed_ms = scope.elapsed_ms();
    drop(scope);

    let out = RunOutput {
        input: args.input.clone(),
        sampling_rate: config.sampling_rate,
        steps: config.steps.iter().map(|s| s.name()).collect(),
        elapsed_ms,
        result: ArrayOutput::from(&result),
    };

    output::emit(&out, args.compact, args.output.as_deref())
}
