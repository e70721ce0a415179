use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use forecast_lib::DatedSeries;
use plotters::prelude::*;

pub struct PlottersPlotter{}

impl PlottersPlotter {
    pub fn create() -> anyhow::Result<PlottersPlotter> {
        Ok(PlottersPlotter{})
    }
}

impl forecast_lib::Plotter for PlottersPlotter {
    fn plot_lines(&mut self, series_list : &Vec<DatedSeries>, marker : Option<NaiveDate>,
                  title : &str, y_label : &str, filename : &str) -> anyhow::Result<()> {
        let (min_x, max_x, min_y, max_y) = PlottersPlotter::find_bounds(series_list)
            .ok_or_else(|| anyhow!("Nothing to plot for '{}'", title))?;

        let png_filename = format!("{}.png", filename);
        if let Some(parent) = std::path::Path::new(&png_filename).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let root_area =
            BitMapBackend::new(&png_filename, (1280, 512)).into_drawing_area();
        root_area.fill(&WHITE)?;

        let root_area = root_area.titled(title, ("sans-serif", 18))?;

        let mut cc = ChartBuilder::on(&root_area)
            .margin(5)
            .set_all_label_area_size(50)
            .build_cartesian_2d(min_x..max_x, min_y..max_y)?;

        cc.configure_mesh()
            .x_labels(10)
            .y_labels(10)
            .x_desc("Date")
            .y_desc(y_label)
            .x_label_formatter(&format_day_label)
            .draw()?;

        for (i, series) in series_list.iter().enumerate() {
            let color = PlottersPlotter::get_color(i);
            cc.draw_series(LineSeries::new(series.points.iter().map(|(date, value)| (to_day(*date), *value)), &color))?
                .label(&series.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        if let Some(marker) = marker {
            let x = to_day(marker);
            cc.draw_series(LineSeries::new(vec![(x, min_y), (x, max_y)], &BLACK))?
                .label(format!("Last observed ({})", marker))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));
        }

        cc.configure_series_labels().border_style(&BLACK).background_style(&WHITE).draw()?;
        root_area.present()?;

        Ok(())
    }
}

impl PlottersPlotter {
    fn get_color(i: usize) -> RGBColor {
        let color = match i {
            0 => BLUE,
            1 => RGBColor(255, 140, 0),
            2 => GREEN,
            3 => RED,
            4 => CYAN,
            _ => MAGENTA
        };
        color
    }

    // Day numbers for the x axis and a padded price range for the y axis.
    fn find_bounds(series_list : &[DatedSeries]) -> Option<(f64, f64, f64, f64)> {
        let mut points = series_list.iter().flat_map(|s| s.points.iter()).peekable();
        points.peek()?;

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (date, value) in points {
            min_x = min_x.min(to_day(*date));
            max_x = max_x.max(to_day(*date));
            min_y = min_y.min(*value);
            max_y = max_y.max(*value);
        }

        if max_x <= min_x {
            min_x -= 1.0;
            max_x += 1.0;
        }
        let padding = if max_y > min_y { (max_y - min_y) * 0.05 } else { 1.0 };

        Some((min_x, max_x, min_y - padding, max_y + padding))
    }
}

fn to_day(date : NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_day_label(day : &f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
