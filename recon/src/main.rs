use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use cs_table::sampling_mask::SamplingMask;
use mr_data::cfl;
use recon::bart_wrapper::BartToolbox;
use recon::brain_mask::{apply_mask, brain_masks, frame_mask, BrainMaskParams};
use recon::coil_combine::reconstruct;
use recon::metrics::{nrmse, nrmse_label};
use recon::recon_config::{ConfigFile, MaskingSettings};
use recon::whiten::self_whiten;
use review::image::{save_grayscale, save_mask};
use review::plot_error;

const FIGURE_TEMPLATE:&str = "Fig_7_template.svg";
const FIGURE_PDF:&str = "Fig_7_NRMSE_vs_mask.pdf";

/// Undersample fully sampled k-space and compare the reconstructions under different masks
#[derive(clap::Parser,Debug)]
struct Fig7Args {
    /// cfl base of the fully sampled k-space (read x phase x slice x coil)
    #[clap(short, long)]
    kspace:Option<PathBuf>,
    /// toml settings file. Figure defaults are used when omitted
    #[clap(short, long)]
    settings:Option<PathBuf>,
    /// write the default settings to this file and exit
    #[clap(long)]
    write_default:Option<PathBuf>,
    /// directory for the png panels and the composite figure
    #[clap(short, long, default_value = ".")]
    output_dir:PathBuf,
    /// do not call inkscape after plotting
    #[clap(long)]
    skip_composite:bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Fig7Args::parse();

    if let Some(file) = &args.write_default {
        MaskingSettings::default().to_file(file)?;
        println!("default settings written to {:?}",file);
        return Ok(())
    }

    let settings = match &args.settings {
        Some(file) => MaskingSettings::from_file(file)?,
        None => MaskingSettings::default()
    };
    settings.validate()?;
    let toolbox = BartToolbox::from_env()?;
    log::info!("bart toolbox at {:?}",toolbox.root());

    let kspace = args.kspace.clone().unwrap_or_else(|| settings.kspace.clone());
    let kspace = if kspace.is_relative() {utils::exe_dir().join(kspace)} else {kspace};

    let ksp_all = cfl::read_cfl(&kspace).with_context(|| format!("cannot read k-space {:?}",kspace))?;
    println!("{:?}",ksp_all.shape());
    let ksp = cfl::select_slice(&ksp_all,settings.slice)?;
    println!("{:?}",ksp.shape());

    let n_phase = ksp.shape()[1];
    let center_fraction = SamplingMask::center_fraction(settings.acceleration);
    let mask = match (settings.mask_offset,settings.mask_seed) {
        (Some(offset),_) => SamplingMask::equispaced(n_phase,settings.acceleration,center_fraction,offset)?,
        (None,Some(seed)) => SamplingMask::equispaced_random(n_phase,settings.acceleration,center_fraction,&mut StdRng::seed_from_u64(seed))?,
        (None,None) => SamplingMask::equispaced_random(n_phase,settings.acceleration,center_fraction,&mut rand::thread_rng())?,
    };
    log::info!("sampling {} of {} phase encodes ({:.2}x)",mask.n_sampled(),mask.len(),mask.acceleration());

    let ksp_white = self_whiten(&ksp)?;
    let r1_image = reconstruct(&ksp_white,settings.crop_vertical,settings.crop_horizontal);
    let r2_image = reconstruct(&mask.apply(&ksp_white)?,settings.crop_vertical,settings.crop_horizontal);

    let params = BrainMaskParams {
        threshold: settings.brain_threshold,
        hole_structure: settings.hole_structure,
        erosion_structure: settings.erosion_structure,
        loose_padding: settings.loose_padding,
    };
    let masks = brain_masks(&r1_image,&params);
    let no_mask = frame_mask(r1_image.dim(),settings.frame_width);

    let no_mask_nrmse = nrmse(&r2_image,&r1_image)?;
    let loose_mask_nrmse = nrmse(&apply_mask(&r2_image,&masks.loose)?,&apply_mask(&r1_image,&masks.loose)?)?;
    let tight_mask_nrmse = nrmse(&apply_mask(&r2_image,&masks.tight)?,&apply_mask(&r1_image,&masks.tight)?)?;

    println!("NRMSE with no mask: {:.3}",no_mask_nrmse);
    println!("NRMSE with loose mask: {:.3}",loose_mask_nrmse);
    println!("NRMSE with tight mask: {:.3}",tight_mask_nrmse);

    let out = &args.output_dir;
    create_dir_all(out).with_context(|| format!("cannot create {:?}",out))?;
    save_grayscale(&r1_image.mapv(f32::sqrt),&out.join("plot_1.png"),None).map_err(plot_error)?;
    save_grayscale(&r2_image.mapv(f32::sqrt),&out.join("plot_2.png"),None).map_err(plot_error)?;
    save_mask(&no_mask,&out.join("plot_3.png"),Some(&nrmse_label(no_mask_nrmse))).map_err(plot_error)?;
    save_mask(&masks.loose,&out.join("plot_4.png"),Some(&nrmse_label(loose_mask_nrmse))).map_err(plot_error)?;
    save_mask(&masks.tight,&out.join("plot_5.png"),Some(&nrmse_label(tight_mask_nrmse))).map_err(plot_error)?;

    if !args.skip_composite {
        utils::inkscape_export(Path::new(FIGURE_TEMPLATE),Path::new(FIGURE_PDF),out);
    }
    Ok(())
}
