use std::path::Path;
use ndarray::Array2;
use plotters::prelude::*;
use crate::PlotResult;

// pixels per image element
const UPSCALE:u32 = 2;
const CAPTION_HEIGHT:u32 = 40;

/// gray level (0-255) of a value inside the window, clipped at both ends
pub fn gray_level(value:f32,lo:f32,hi:f32) -> u8 {
    if hi <= lo {
        return 0
    }
    let t = ((value - lo)/(hi - lo)).clamp(0.0,1.0);
    (255.0*t).round() as u8
}

/// Save a 2-D array as a grayscale png scaled to its own min and max. Row 0 is drawn at the top.
/// An optional title is drawn above the image
pub fn save_grayscale(image:&Array2<f32>,file:&Path,title:Option<&str>) -> PlotResult {
    let (rows,cols) = image.dim();
    let lo = image.iter().cloned().fold(f32::INFINITY,f32::min);
    let hi = image.iter().cloned().fold(f32::NEG_INFINITY,f32::max);
    let caption = if title.is_some() {CAPTION_HEIGHT} else {0};
    let size = (cols as u32*UPSCALE,rows as u32*UPSCALE + caption);

    let root = BitMapBackend::new(file,size).into_drawing_area();
    root.fill(&WHITE)?;
    let canvas = match title {
        Some(t) => root.titled(t,("sans-serif",28))?,
        None => root.clone(),
    };
    for ((r,c),v) in image.indexed_iter() {
        let g = gray_level(*v,lo,hi);
        let x0 = c as i32*UPSCALE as i32;
        let y0 = r as i32*UPSCALE as i32;
        canvas.draw(&Rectangle::new(
            [(x0,y0),(x0 + UPSCALE as i32,y0 + UPSCALE as i32)],
            RGBColor(g,g,g).filled()
        ))?;
    }
    root.present()?;
    log::info!("wrote {:?}",file);
    Ok(())
}

/// boolean masks are drawn black and white
pub fn save_mask(mask:&Array2<bool>,file:&Path,title:Option<&str>) -> PlotResult {
    save_grayscale(&mask.mapv(|m| if m {1.0} else {0.0}),file,title)
}
