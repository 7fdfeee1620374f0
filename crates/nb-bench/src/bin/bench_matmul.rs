use std::io::{self, Write};
use std::process;

use log::{error, LevelFilter};
use nb_array::CpuBackend;
use nb_bench::sections::{self, matmul};
use nb_bench::{BenchConfig, Harness, Result};

fn run() -> Result<()> {
    let config = BenchConfig::default();
    config.validate()?;
    let backend = CpuBackend::new();
    let harness = Harness::new(&backend);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    sections::print_banner(&mut out, "matmul", &harness)?;
    matmul::run(&harness, &config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .init();
    if let Err(e) = run() {
        error!("benchmark failed: {e}");
        process::exit(1);
    }
}
