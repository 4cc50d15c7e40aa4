use std::path::Path;
use plotters::prelude::*;
use seq_tools::execution::{PlotTrace, SequenceWaveforms};
use crate::{padded_range, PlotResult};

const FIGURE_SIZE:(u32,u32) = (1200,900);

struct Panel<'a> {
    y_desc:&'a str,
    traces:Vec<&'a PlotTrace>,
    markers:Option<&'a [f64]>,
    y_scale:f64,
    color:RGBColor,
}

/// Render the rf/adc figure (`<prefix>_1.png`) and the gradient figure (`<prefix>_2.png`) for the
/// time window held by the waveforms. Times are shown in ms and gradients in kHz/m
pub fn plot_sequence(waveforms:&SequenceWaveforms,output_dir:&Path,prefix:&str) -> PlotResult {
    let rf_panels = vec![
        Panel {y_desc:"ADC",traces:vec![],markers:Some(&waveforms.adc),y_scale:1.0,color:RED},
        Panel {y_desc:"RF mag (Hz)",traces:vec![&waveforms.rf_magnitude],markers:None,y_scale:1.0,color:BLUE},
        Panel {y_desc:"RF/ADC phase (rad)",traces:waveforms.rf_phase.iter().collect(),markers:None,y_scale:1.0,color:BLUE},
    ];
    let grad_panels = vec![
        Panel {y_desc:"Gx (kHz/m)",traces:vec![&waveforms.gx],markers:None,y_scale:1E-3,color:BLUE},
        Panel {y_desc:"Gy (kHz/m)",traces:vec![&waveforms.gy],markers:None,y_scale:1E-3,color:BLUE},
        Panel {y_desc:"Gz (kHz/m)",traces:vec![&waveforms.gz],markers:None,y_scale:1E-3,color:BLUE},
    ];
    let rf_file = output_dir.join(format!("{}_1.png",prefix));
    let grad_file = output_dir.join(format!("{}_2.png",prefix));
    draw_panels(&rf_file,waveforms.time_range,&rf_panels)?;
    log::info!("wrote {:?}",rf_file);
    draw_panels(&grad_file,waveforms.time_range,&grad_panels)?;
    log::info!("wrote {:?}",grad_file);
    Ok(())
}

fn draw_panels(file:&Path,time_range:(f64,f64),panels:&[Panel]) -> PlotResult {
    let root = BitMapBackend::new(file,FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((panels.len(),1));
    let x_range = 1E3*time_range.0..1E3*time_range.1;

    for (panel,area) in panels.iter().zip(areas.iter()) {
        let (y_lo,y_hi) = padded_range(panel.traces.iter().flat_map(|t| t.y.iter().map(|y| y*panel.y_scale)));
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(),y_lo..y_hi)?;
        chart.configure_mesh()
            .disable_mesh()
            .x_desc("t (ms)")
            .y_desc(panel.y_desc)
            .draw()?;
        for trace in panel.traces.iter() {
            let points = trace.points()
                .filter(|(t,_)| *t >= time_range.0 && *t <= time_range.1)
                .map(|(t,y)| (1E3*t,y*panel.y_scale));
            chart.draw_series(LineSeries::new(points,&panel.color))?;
        }
        if let Some(markers) = panel.markers {
            let style = ShapeStyle::from(&panel.color).stroke_width(1);
            chart.draw_series(markers.iter()
                .filter(|t| **t >= time_range.0 && **t <= time_range.1)
                .map(|t| Cross::new((1E3*t,0.0),3,style)))?;
        }
    }
    root.present()?;
    Ok(())
}
