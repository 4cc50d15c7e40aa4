use ndarray::{Array3, Array4, Axis};
use num_complex::Complex32;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use cs_table::sampling_mask::SamplingMask;
use mr_data::cfl;
use recon::brain_mask::{apply_mask, brain_masks, frame_mask, BrainMaskParams};
use recon::coil_combine::reconstruct;
use recon::metrics::nrmse;
use recon::whiten::self_whiten;

#[test]
fn figure_mask_on_ones() {
    let ones = Array3::from_elem((640,420,32),Complex32::new(1.0,0.0));
    let mask = SamplingMask::equispaced_random(420,2.0,SamplingMask::center_fraction(2.0),&mut StdRng::seed_from_u64(0)).unwrap();
    let undersampled = mask.apply(&ones).unwrap();
    assert_eq!(mask.center().len(),50);
    let kept:Vec<bool> = undersampled.index_axis(Axis(0),0).index_axis(Axis(1),0).iter().map(|v| v.re == 1.0).collect();
    assert_eq!(kept.as_slice(),mask.flags());
    assert!(kept[185..235].iter().all(|k| *k));
    let r = 420.0/kept.iter().filter(|k| **k).count() as f64;
    assert!((r - 2.0).abs() < 0.2,"acceleration {}",r);
}

fn synthetic_kspace() -> Array4<Complex32> {
    // smooth object with a few coils of different sensitivity, plus correlated noise
    let mut rng = StdRng::seed_from_u64(11);
    let (nr,np,nc) = (48,40,4);
    let mut img = Array3::<Complex32>::zeros((nr,np,nc));
    for ((r,p,c),v) in img.indexed_iter_mut() {
        let d = ((r as f32 - 24.0).powi(2) + (p as f32 - 20.0).powi(2)).sqrt();
        let object = if d < 12.0 {1.0 + 0.2*(r as f32/8.0).sin()} else {0.0};
        let sens = 1.0 + 0.3*c as f32*(p as f32/np as f32);
        *v = Complex32::new(object*sens,0.0);
    }
    let mut ksp = mr_data::fft::fft2c(&img);
    for mut x in ksp.lanes_mut(Axis(2)) {
        let n = Complex32::new(rng.gen_range(-0.5..0.5),rng.gen_range(-0.5..0.5));
        for c in 0..nc {
            let own = Complex32::new(rng.gen_range(-0.5..0.5),rng.gen_range(-0.5..0.5));
            x[c] += n*(c as f32 + 1.0) + own;
        }
    }
    ksp.insert_axis(Axis(2))
}

#[test]
fn masking_pipeline_from_cfl() {
    let base = std::env::temp_dir().join("recon_pipeline_kspace");
    cfl::write_cfl(&synthetic_kspace(),&base).unwrap();
    let ksp_all = cfl::read_cfl(&base).unwrap();
    assert_eq!(ksp_all.shape(),&[48,40,1,4]);
    let ksp = cfl::select_slice(&ksp_all,0).unwrap();
    let white = self_whiten(&ksp).unwrap();

    let r1 = reconstruct(&white,0.26,0.2);
    assert_eq!(r1.dim(),(48 - 2*12,40 - 2*8));

    // a fully sampled mask reproduces the reference exactly
    let full = SamplingMask::equispaced(40,1.0,SamplingMask::center_fraction(1.0),0).unwrap();
    let same = reconstruct(&full.apply(&white).unwrap(),0.26,0.2);
    assert_eq!(nrmse(&same,&r1).unwrap(),0.0);

    let mask = SamplingMask::equispaced(40,2.0,SamplingMask::center_fraction(2.0),1).unwrap();
    let r2 = reconstruct(&mask.apply(&white).unwrap(),0.26,0.2);
    let no_mask = nrmse(&r2,&r1).unwrap();
    assert!(no_mask > 0.0);

    let masks = brain_masks(&r1,&BrainMaskParams{hole_structure:5,erosion_structure:2,..BrainMaskParams::default()});
    let tight = nrmse(&apply_mask(&r2,&masks.tight).unwrap(),&apply_mask(&r1,&masks.tight).unwrap()).unwrap();
    let loose = nrmse(&apply_mask(&r2,&masks.loose).unwrap(),&apply_mask(&r1,&masks.loose).unwrap()).unwrap();
    assert!(tight >= 0.0 && loose >= 0.0);

    let frame = frame_mask(r1.dim(),3);
    assert_eq!(frame.dim(),r1.dim());
}
