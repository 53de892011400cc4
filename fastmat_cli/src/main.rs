use std::io;
use std::process::ExitCode;

use clap::Parser;
use fastmat::FastMap;
use fastmat_cli::{read_points, write_embedding, CliError, Options};
use log::info;

fn run(options: Options) -> Result<(), CliError> {
    if let Some(threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let points = read_points(io::stdin().lock())?;
    info!(
        "Read {} points in {} dimensions",
        points.num_rows(),
        points.num_cols()
    );

    let output = FastMap::new(options.target_dim).reduce(&points);
    info!(
        "Extracted {} of {} axes",
        output.axes_extracted(),
        options.target_dim
    );

    write_embedding(io::stdout().lock(), &output.embedding)
}

pub fn main() -> ExitCode {
    env_logger::init();
    let options = Options::parse();

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fastmap_csv: {err}");
            ExitCode::FAILURE
        }
    }
}
