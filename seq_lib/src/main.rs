use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use anyhow::Context;
use clap::Parser;
use seq_lib::pulse_sequence::{Initialize, PulseSequence};
use seq_lib::tse::{Tse, TseParams};
use review::plot_error;
use review::timing_diagram::plot_sequence;

const FIGURE_TEMPLATE:&str = "Fig_3_template.svg";
const FIGURE_PDF:&str = "Fig_3_TSE_Pulseq.pdf";

/// Build the turbo spin echo of figure 3, check its timing and plot the first echoes
#[derive(clap::Parser,Debug)]
struct Fig3Args {
    /// json parameter file. Figure defaults are used when omitted
    #[clap(short, long)]
    params:Option<PathBuf>,
    /// write the default parameters to this file and exit
    #[clap(long)]
    write_default:Option<PathBuf>,
    /// directory for the timing diagrams and the composite figure
    #[clap(short, long, default_value = ".")]
    output_dir:PathBuf,
    /// do not call inkscape after plotting
    #[clap(long)]
    skip_composite:bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Fig3Args::parse();

    if let Some(file) = &args.write_default {
        TseParams::write_default(file).with_context(|| format!("cannot write {:?}",file))?;
        println!("default parameters written to {:?}",file);
        return Ok(())
    }

    let params = match &args.params {
        Some(file) => TseParams::load(file).with_context(|| format!("cannot load parameters from {:?}",file))?,
        None => TseParams::default()
    };
    log::debug!("{:?}",params);

    let tse = Tse::new(params)?;
    println!("{}",tse.echo_time_report());

    let seq = tse.compile()?;

    let report = seq.check_timing();
    if report.is_ok() {
        println!("Timing check passed successfully");
    }else {
        println!("Timing check failed. Error listing follows:");
        for e in report.errors.iter() {
            println!("{}",e);
        }
        log::warn!("{} timing violations in {}",report.errors.len(),tse.name());
    }

    create_dir_all(&args.output_dir).with_context(|| format!("cannot create {:?}",args.output_dir))?;
    let waveforms = seq.waveforms(tse.plot_time_range());
    plot_sequence(&waveforms,&args.output_dir,"TSE").map_err(plot_error)?;

    if !args.skip_composite {
        utils::inkscape_export(Path::new(FIGURE_TEMPLATE),Path::new(FIGURE_PDF),&args.output_dir);
    }
    Ok(())
}
